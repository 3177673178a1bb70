//! Service controller: the install / uninstall / restart / status verbs.
//!
//! Each verb is built from calls to a [`ServiceControl`] and direct file
//! operations on the descriptor. Cleanup steps whose failure does not change
//! the outcome run through [`best_effort`]; every other failure is returned.
//!
//! Mutating verbs hold a per-controller lock. Separate controllers (or
//! processes) acting on the same label are not serialized against each other.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use pixdex_config::ServiceConfig;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::descriptor;
use crate::error::ServiceError;
use crate::launchctl::{self, CommandOutput, Launchctl, ServiceControl};
use crate::paths::{PathResolver, ResolvedPaths};

/// Registration state reported by [`ServiceController::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub loaded: bool,
    pub running: bool,
    pub pid: Option<u32>,
    pub state: Option<String>,
    /// Raw utility output, for diagnostics.
    pub output: String,
}

/// Tail of the worker's stdout and stderr logs. `None` when a file does not exist.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceLogs {
    pub stdout_path: PathBuf,
    pub stdout: Option<Vec<String>>,
    pub stderr_path: PathBuf,
    pub stderr: Option<Vec<String>>,
}

/// Owns the descriptor file for one label and drives its registration.
#[derive(Debug)]
pub struct ServiceController<C: ServiceControl = Launchctl> {
    config: ServiceConfig,
    resolver: PathResolver,
    control: C,
    lock: Mutex<()>,
}

impl ServiceController<Launchctl> {
    /// Controller for the running executable, driving the real `launchctl`.
    pub fn from_config(config: ServiceConfig) -> Self {
        let resolver = PathResolver::from_env(&config);
        let control = Launchctl::new(config.legacy_launchctl);
        Self::new(config, resolver, control)
    }
}

impl<C: ServiceControl> ServiceController<C> {
    pub fn new(config: ServiceConfig, resolver: PathResolver, control: C) -> Self {
        Self {
            config,
            resolver,
            control,
            lock: Mutex::new(()),
        }
    }

    pub fn label(&self) -> &str {
        &self.config.label
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.resolver.descriptor_path()
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    /// Whether a descriptor file is present on disk.
    pub fn is_installed(&self) -> bool {
        self.descriptor_path().exists()
    }

    /// Query the registration state. Never fails: a non-zero exit, or a missing
    /// utility, reads as "not loaded".
    pub fn status(&self) -> ServiceStatus {
        match self.control.query(self.label()) {
            Ok(out) if out.success => {
                let pid = launchctl::parse_pid(&out.stdout);
                ServiceStatus {
                    loaded: true,
                    running: pid.is_some(),
                    pid,
                    state: launchctl::parse_state(&out.stdout),
                    output: out.combined(),
                }
            }
            Ok(out) => ServiceStatus {
                loaded: false,
                running: false,
                pid: None,
                state: None,
                output: out.combined(),
            },
            Err(e) => {
                warn!(label = %self.label(), error = %e, "Could not run launchctl for status");
                ServiceStatus {
                    loaded: false,
                    running: false,
                    pid: None,
                    state: None,
                    output: format!("could not run launchctl: {}", e),
                }
            }
        }
    }

    /// Write a fresh descriptor and (re)register it. Returns the descriptor path.
    pub fn install(&self) -> Result<PathBuf, ServiceError> {
        let _guard = self.lock.lock();

        let paths = self.packaged_paths()?;

        let agents_dir = self.resolver.agents_dir();
        fs::create_dir_all(&agents_dir).map_err(|e| ServiceError::file_system(&agents_dir, e))?;

        check_bundle_paths(&paths)?;

        let log_dir = self.resolver.log_dir();
        fs::create_dir_all(log_dir).map_err(|e| ServiceError::file_system(log_dir, e))?;

        let plist = descriptor::build(&paths, &self.config).to_plist();
        write_atomic(&paths.descriptor_path, &plist)?;
        info!("Wrote LaunchAgent plist at: {}", paths.descriptor_path.display());

        best_effort("unregister previous instance", || {
            self.control.unregister(&paths.descriptor_path)
        });

        let output = self
            .control
            .register(&paths.descriptor_path)
            .map_err(|e| ServiceError::RegistrationFailed(format!("could not run launchctl: {}", e)))?;
        if !output.success {
            return Err(ServiceError::RegistrationFailed(output.diagnostic()));
        }

        info!("Loaded LaunchAgent: {}", self.label());
        Ok(paths.descriptor_path)
    }

    /// Unregister the service and delete its descriptor. Succeeds when nothing
    /// is installed.
    pub fn uninstall(&self) -> Result<(), ServiceError> {
        let _guard = self.lock.lock();
        let plist_path = self.descriptor_path();

        best_effort("unregister", || self.control.unregister(&plist_path));

        match fs::remove_file(&plist_path) {
            Ok(()) => {
                info!("Removed LaunchAgent plist: {}", plist_path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No LaunchAgent plist at {}", plist_path.display());
                Ok(())
            }
            Err(e) => Err(ServiceError::file_system(&plist_path, e)),
        }
    }

    /// Unregister and re-register the descriptor already on disk. The
    /// descriptor is not rebuilt; run [`install`](Self::install) for that.
    pub fn restart(&self) -> Result<(), ServiceError> {
        let _guard = self.lock.lock();
        let plist_path = self.descriptor_path();

        best_effort("unregister before restart", || {
            self.control.unregister(&plist_path)
        });

        let output = self
            .control
            .register(&plist_path)
            .map_err(|e| ServiceError::RestartFailed(format!("could not run launchctl: {}", e)))?;
        if !output.success {
            return Err(ServiceError::RestartFailed(output.diagnostic()));
        }

        info!("Restarted LaunchAgent: {}", self.label());
        Ok(())
    }

    /// Render the descriptor `install` would write, without side effects.
    pub fn descriptor_preview(&self) -> Result<String, ServiceError> {
        let paths = self.packaged_paths()?;
        check_bundle_paths(&paths)?;
        Ok(descriptor::build(&paths, &self.config).to_plist())
    }

    /// Last `lines` lines of the worker's stdout and stderr logs.
    pub fn tail_logs(&self, lines: usize) -> Result<ServiceLogs, ServiceError> {
        let stdout_path = self.resolver.stdout_log();
        let stderr_path = self.resolver.stderr_log();

        Ok(ServiceLogs {
            stdout: tail_file(&stdout_path, lines)?,
            stdout_path,
            stderr: tail_file(&stderr_path, lines)?,
            stderr_path,
        })
    }

    fn packaged_paths(&self) -> Result<ResolvedPaths, ServiceError> {
        self.resolver.resolve().map_err(|e| {
            debug!(error = %e, "Refusing to register outside a packaged bundle");
            ServiceError::UnsupportedContext
        })
    }
}

/// Run a cleanup step whose failure must not affect the verb's outcome.
/// Failures are logged and discarded.
pub(crate) fn best_effort<F>(step: &'static str, op: F)
where
    F: FnOnce() -> io::Result<CommandOutput>,
{
    match op() {
        Ok(out) if out.success => debug!(step, "Best-effort step succeeded"),
        Ok(out) => warn!(
            step,
            status = ?out.status_code,
            detail = %out.diagnostic(),
            "Best-effort step failed (ignored)"
        ),
        Err(e) => warn!(step, error = %e, "Best-effort step could not run (ignored)"),
    }
}

fn check_bundle_paths(paths: &ResolvedPaths) -> Result<(), ServiceError> {
    if !paths.worker_entry.exists() {
        return Err(ServiceError::PathResolution {
            what: "worker entry point",
            path: paths.worker_entry.clone(),
        });
    }
    if !paths.bin_dir.is_dir() {
        return Err(ServiceError::PathResolution {
            what: "auxiliary binaries directory",
            path: paths.bin_dir.clone(),
        });
    }
    Ok(())
}

/// Replace `path` with `content` via a sibling temp file and rename, so launchd
/// never reads a truncated plist.
fn write_atomic(path: &Path, content: &str) -> Result<(), ServiceError> {
    let dir = path
        .parent()
        .ok_or_else(|| ServiceError::file_system(path, "descriptor path has no parent directory"))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ServiceError::file_system(dir, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| ServiceError::file_system(tmp.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| ServiceError::file_system(tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| ServiceError::file_system(path, e.error))?;
    Ok(())
}

fn tail_file(path: &Path, lines: usize) -> Result<Option<Vec<String>>, ServiceError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ServiceError::file_system(path, e)),
    };
    // The worker writes whatever it likes to these files.
    let content = String::from_utf8_lossy(&bytes);
    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    Ok(Some(all[start..].iter().map(|l| l.to_string()).collect()))
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
