//! Flat `{ ok, ... }` results for UI callers.

use std::path::PathBuf;

use serde::Serialize;

use crate::controller::ServiceStatus;
use crate::error::{ErrorKind, ServiceError};

/// Structured result of a controller verb, as presented to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plist_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

/// Failure details carried by a [`ServiceOutcome`].
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeError {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ServiceOutcome {
    fn success() -> Self {
        Self {
            ok: true,
            loaded: None,
            running: None,
            pid: None,
            plist_path: None,
            output: None,
            error: None,
        }
    }

    /// Result of `install`.
    pub fn installed(result: Result<PathBuf, ServiceError>) -> Self {
        match result {
            Ok(path) => Self {
                plist_path: Some(path),
                ..Self::success()
            },
            Err(e) => e.into(),
        }
    }

    /// Result of `uninstall` or `restart`.
    pub fn completed(result: Result<(), ServiceError>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(e) => e.into(),
        }
    }
}

impl From<ServiceError> for ServiceOutcome {
    fn from(err: ServiceError) -> Self {
        Self {
            ok: false,
            error: Some(OutcomeError {
                kind: err.kind(),
                message: err.to_string(),
                retryable: err.is_retryable(),
            }),
            ..Self::success()
        }
    }
}

impl From<ServiceStatus> for ServiceOutcome {
    fn from(status: ServiceStatus) -> Self {
        Self {
            loaded: Some(status.loaded),
            running: Some(status.running),
            pid: status.pid,
            output: Some(status.output),
            ..Self::success()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_installed_outcome_json() {
        let outcome = ServiceOutcome::installed(Ok(PathBuf::from(
            "/Users/test/Library/LaunchAgents/com.pixdex.indexer.plist",
        )));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "ok": true,
                "plistPath": "/Users/test/Library/LaunchAgents/com.pixdex.indexer.plist"
            })
        );
    }

    #[test]
    fn test_error_outcome_json() {
        let outcome = ServiceOutcome::completed(Err(ServiceError::RestartFailed(
            "Bootstrap failed: 5: Input/output error".to_string(),
        )));
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["error"]["kind"], json!("RestartFailed"));
        assert_eq!(value["error"]["retryable"], json!(true));
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Input/output error"));
    }

    #[test]
    fn test_status_outcome_json() {
        let outcome = ServiceOutcome::from(ServiceStatus {
            loaded: false,
            running: false,
            pid: None,
            state: None,
            output: "Could not find service".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "ok": true,
                "loaded": false,
                "running": false,
                "output": "Could not find service"
            })
        );
    }
}
