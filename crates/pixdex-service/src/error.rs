//! Service lifecycle errors.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the service controller verbs.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Registration attempted outside a packaged application bundle.
    #[error(
        "Background service can only be installed from the packaged application; \
         in development the indexer runs in-process"
    )]
    UnsupportedContext,

    /// A path the worker needs is missing from the bundle.
    #[error("Required {what} not found at {path}")]
    PathResolution { what: &'static str, path: PathBuf },

    /// launchctl rejected the registration.
    #[error("Failed to register service: {0}")]
    RegistrationFailed(String),

    /// launchctl rejected the re-registration during restart.
    #[error("Failed to restart service: {0}")]
    RestartFailed(String),

    /// The descriptor file could not be written or removed.
    #[error("File system error at {path}: {reason}")]
    FileSystem { path: PathBuf, reason: String },
}

/// Error classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedContext,
    PathResolutionError,
    RegistrationFailed,
    RestartFailed,
    FileSystemError,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::UnsupportedContext => ErrorKind::UnsupportedContext,
            ServiceError::PathResolution { .. } => ErrorKind::PathResolutionError,
            ServiceError::RegistrationFailed(_) => ErrorKind::RegistrationFailed,
            ServiceError::RestartFailed(_) => ErrorKind::RestartFailed,
            ServiceError::FileSystem { .. } => ErrorKind::FileSystemError,
        }
    }

    /// Whether retrying after user action can succeed without rebuilding the app.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::RegistrationFailed(_)
                | ServiceError::RestartFailed(_)
                | ServiceError::FileSystem { .. }
        )
    }

    pub(crate) fn file_system(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ServiceError::FileSystem {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::UnsupportedContext => "UnsupportedContext",
            ErrorKind::PathResolutionError => "PathResolutionError",
            ErrorKind::RegistrationFailed => "RegistrationFailed",
            ErrorKind::RestartFailed => "RestartFailed",
            ErrorKind::FileSystemError => "FileSystemError",
        };
        f.write_str(s)
    }
}
