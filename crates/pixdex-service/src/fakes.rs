//! In-memory stand-in for launchd, for testing controllers without touching
//! the host service manager.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::launchctl::{CommandOutput, ServiceControl};

/// A recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Query(String),
    Register(PathBuf),
    Unregister(PathBuf),
}

#[derive(Debug, Default)]
struct FakeState {
    loaded: BTreeSet<String>,
    calls: Vec<FakeCall>,
    register_failure: Option<String>,
    unavailable: bool,
}

/// Fake launchd: jobs are keyed by the descriptor's file stem, which matches
/// the label for descriptors written by the controller.
///
/// Registration fails like `launchctl bootstrap` does when the descriptor is
/// missing or the job is already loaded.
#[derive(Debug, Default)]
pub struct FakeLaunchd {
    state: Mutex<FakeState>,
}

impl FakeLaunchd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent register call exit non-zero with this stderr.
    pub fn fail_register_with(&self, stderr: impl Into<String>) {
        self.state.lock().register_failure = Some(stderr.into());
    }

    /// Simulate the utility being absent from the system.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    /// Mark a label as loaded without going through `register`.
    pub fn preload(&self, label: impl Into<String>) {
        self.state.lock().loaded.insert(label.into());
    }

    pub fn is_loaded(&self, label: &str) -> bool {
        self.state.lock().loaded.contains(label)
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.state.lock().calls.clone()
    }

    fn check_available(state: &FakeState) -> io::Result<()> {
        if state.unavailable {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory (os error 2)",
            ));
        }
        Ok(())
    }
}

fn job_label(descriptor: &Path) -> String {
    descriptor
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn finished(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        success: code == 0,
        status_code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

impl ServiceControl for FakeLaunchd {
    fn query(&self, label: &str) -> io::Result<CommandOutput> {
        let mut state = self.state.lock();
        state.calls.push(FakeCall::Query(label.to_string()));
        Self::check_available(&state)?;

        if state.loaded.contains(label) {
            let stdout = format!("gui/501/{} = {{\n\tstate = running\n\tpid = 4242\n}}\n", label);
            Ok(finished(0, &stdout, ""))
        } else {
            Ok(finished(
                113,
                "",
                &format!("Could not find service \"{}\" in domain for user gui: 501\n", label),
            ))
        }
    }

    fn register(&self, descriptor: &Path) -> io::Result<CommandOutput> {
        let mut state = self.state.lock();
        state.calls.push(FakeCall::Register(descriptor.to_path_buf()));
        Self::check_available(&state)?;

        if let Some(stderr) = state.register_failure.clone() {
            return Ok(finished(5, "", &stderr));
        }
        if !descriptor.exists() {
            return Ok(finished(5, "", "Bootstrap failed: 5: Input/output error\n"));
        }
        let label = job_label(descriptor);
        if !state.loaded.insert(label) {
            return Ok(finished(5, "", "Bootstrap failed: 5: Input/output error\n"));
        }
        Ok(finished(0, "", ""))
    }

    fn unregister(&self, descriptor: &Path) -> io::Result<CommandOutput> {
        let mut state = self.state.lock();
        state.calls.push(FakeCall::Unregister(descriptor.to_path_buf()));
        Self::check_available(&state)?;

        if state.loaded.remove(&job_label(descriptor)) {
            Ok(finished(0, "", ""))
        } else {
            Ok(finished(3, "", "Boot-out failed: 3: No such process\n"))
        }
    }
}
