//! The `launchctl` seam.
//!
//! [`ServiceControl`] is the narrow interface the controller drives; [`Launchctl`]
//! implements it by shelling out to the real utility.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Captured result of one utility invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Best available explanation of a failure: stderr, then stdout, then the exit code.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.status_code {
            Some(code) => format!("launchctl exited with status {}", code),
            None => "launchctl terminated without an exit status".to_string(),
        }
    }

    /// stdout and stderr joined for display.
    pub fn combined(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// Operations the controller needs from the OS service manager.
///
/// `Err` means the utility could not be run at all; a non-zero exit is an `Ok`
/// with `success == false`.
pub trait ServiceControl: Send + Sync {
    /// Query registration state for a label. Non-zero exit means "not loaded".
    fn query(&self, label: &str) -> io::Result<CommandOutput>;

    /// Register (load) a descriptor file.
    fn register(&self, descriptor: &Path) -> io::Result<CommandOutput>;

    /// Unregister (unload) a descriptor file.
    fn unregister(&self, descriptor: &Path) -> io::Result<CommandOutput>;
}

/// `launchctl` driven in the per-user GUI domain.
#[derive(Debug, Clone)]
pub struct Launchctl {
    program: PathBuf,
    domain: String,
    legacy: bool,
}

impl Launchctl {
    /// Use `bootstrap`/`bootout`/`print`, or `load`/`unload`/`list` when `legacy`.
    pub fn new(legacy: bool) -> Self {
        Self {
            program: PathBuf::from("launchctl"),
            domain: format!("gui/{}", current_uid()),
            legacy,
        }
    }

    /// Override the executable invoked (defaults to `launchctl` on `PATH`).
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn query_args(&self, label: &str) -> Vec<String> {
        if self.legacy {
            vec!["list".to_string(), label.to_string()]
        } else {
            vec!["print".to_string(), format!("{}/{}", self.domain, label)]
        }
    }

    fn register_args(&self, descriptor: &Path) -> Vec<String> {
        let path = descriptor.to_string_lossy().into_owned();
        if self.legacy {
            vec!["load".to_string(), "-w".to_string(), path]
        } else {
            vec!["bootstrap".to_string(), self.domain.clone(), path]
        }
    }

    fn unregister_args(&self, descriptor: &Path) -> Vec<String> {
        let path = descriptor.to_string_lossy().into_owned();
        if self.legacy {
            vec!["unload".to_string(), "-w".to_string(), path]
        } else {
            vec!["bootout".to_string(), self.domain.clone(), path]
        }
    }

    fn run(&self, args: &[String]) -> io::Result<CommandOutput> {
        debug!(program = %self.program.display(), args = ?args, "executing launchctl");
        let output = Command::new(&self.program).args(args).output()?;

        let result = CommandOutput {
            success: output.status.success(),
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            args = ?args,
            status = ?result.status_code,
            stderr = %result.stderr.trim(),
            "launchctl finished"
        );
        Ok(result)
    }
}

impl Default for Launchctl {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ServiceControl for Launchctl {
    fn query(&self, label: &str) -> io::Result<CommandOutput> {
        self.run(&self.query_args(label))
    }

    fn register(&self, descriptor: &Path) -> io::Result<CommandOutput> {
        self.run(&self.register_args(descriptor))
    }

    fn unregister(&self, descriptor: &Path) -> io::Result<CommandOutput> {
        self.run(&self.unregister_args(descriptor))
    }
}

#[cfg(unix)]
fn current_uid() -> u32 {
    nix::unistd::getuid().as_raw()
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

/// Parse the PID from `launchctl print` (`pid = 123`) or `launchctl list <label>`
/// (`"PID" = 123;`) output.
pub fn parse_pid(output: &str) -> Option<u32> {
    for line in output.lines() {
        let line = line.trim();
        if let Some(pid) = line.strip_prefix("pid = ") {
            return pid.parse().ok();
        }
        if let Some(pid) = line.strip_prefix("\"PID\" = ") {
            return pid.trim_end_matches(';').parse().ok();
        }
    }
    None
}

/// Parse the job state from `launchctl print` output.
pub fn parse_state(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("state = "))
        .map(str::to_string)
}

#[cfg(test)]
#[path = "launchctl_tests.rs"]
mod tests;
