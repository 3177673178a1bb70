//! Bundle path resolution.
//!
//! Everything here is path arithmetic over the executable location and the
//! home directory. Nothing touches the filesystem; callers check existence.

use std::path::{Path, PathBuf};

use pixdex_config::{BundleConfig, ConfigLoader, ServiceConfig};
use tracing::warn;

/// Absolute paths needed to register the worker. Recomputed on every install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Application executable, launched with the worker entry as its argument.
    pub executable: PathBuf,
    /// `<Name>.app/Contents/Resources`.
    pub resources_dir: PathBuf,
    pub worker_entry: PathBuf,
    /// Auxiliary binaries exported to the worker.
    pub bin_dir: PathBuf,
    pub descriptor_path: PathBuf,
    pub stdout_log: PathBuf,
    pub stderr_log: PathBuf,
}

/// The executable is not running from inside an application bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotPackaged {
    pub executable: PathBuf,
}

impl std::fmt::Display for NotPackaged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is not inside an application bundle (expected <Name>.app/Contents/MacOS/)",
            self.executable.display()
        )
    }
}

impl std::error::Error for NotPackaged {}

/// Derives [`ResolvedPaths`] from the bundle layout convention.
#[derive(Debug, Clone)]
pub struct PathResolver {
    executable: PathBuf,
    home: PathBuf,
    label: String,
    log_dir: PathBuf,
    bundle: BundleConfig,
}

impl PathResolver {
    /// Create a resolver for an explicit executable and home directory.
    pub fn new(
        executable: impl Into<PathBuf>,
        home: impl Into<PathBuf>,
        config: &ServiceConfig,
    ) -> Self {
        let home = home.into();
        let log_dir = match &config.log_dir {
            Some(dir) => PathBuf::from(ConfigLoader::expand_path(&dir.to_string_lossy())),
            None => home.join("Library").join("Logs").join(&config.app_name),
        };

        Self {
            executable: executable.into(),
            home,
            label: config.label.clone(),
            log_dir,
            bundle: config.bundle.clone(),
        }
    }

    /// Create a resolver for the running process.
    pub fn from_env(config: &ServiceConfig) -> Self {
        // An unknown executable resolves as "not packaged".
        let executable = std::env::current_exe().unwrap_or_default();
        Self::from_parts(executable, dirs::home_dir(), config)
    }

    /// Without a home directory there is no LaunchAgents directory launchd
    /// would read, so the context is treated as not packaged.
    pub(crate) fn from_parts(
        executable: PathBuf,
        home: Option<PathBuf>,
        config: &ServiceConfig,
    ) -> Self {
        match home {
            Some(home) => Self::new(executable, home, config),
            None => {
                warn!(
                    executable = %executable.display(),
                    "Home directory is unknown; service registration is unavailable"
                );
                Self::new(PathBuf::new(), PathBuf::from("/var/empty"), config)
            }
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `~/Library/LaunchAgents`.
    pub fn agents_dir(&self) -> PathBuf {
        self.home.join("Library").join("LaunchAgents")
    }

    /// Canonical descriptor location. Depends only on the label and home directory.
    pub fn descriptor_path(&self) -> PathBuf {
        self.agents_dir().join(format!("{}.plist", self.label))
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn stdout_log(&self) -> PathBuf {
        self.log_dir.join(format!("{}.out.log", self.label))
    }

    pub fn stderr_log(&self) -> PathBuf {
        self.log_dir.join(format!("{}.err.log", self.label))
    }

    /// Locate the bundle resources and the worker paths inside them.
    pub fn resolve(&self) -> Result<ResolvedPaths, NotPackaged> {
        let resources_dir = bundle_resources_dir(&self.executable).ok_or_else(|| NotPackaged {
            executable: self.executable.clone(),
        })?;

        Ok(ResolvedPaths {
            executable: self.executable.clone(),
            worker_entry: resources_dir.join(&self.bundle.worker_entry),
            bin_dir: resources_dir.join(&self.bundle.bin_dir),
            resources_dir,
            descriptor_path: self.descriptor_path(),
            stdout_log: self.stdout_log(),
            stderr_log: self.stderr_log(),
        })
    }

    /// Whether the executable lives inside an application bundle.
    pub fn is_packaged(&self) -> bool {
        bundle_resources_dir(&self.executable).is_some()
    }
}

/// `<Name>.app/Contents/MacOS/<exe>` -> `<Name>.app/Contents/Resources`.
fn bundle_resources_dir(executable: &Path) -> Option<PathBuf> {
    let macos = executable.parent()?;
    if macos.file_name()? != "MacOS" {
        return None;
    }
    let contents = macos.parent()?;
    if contents.file_name()? != "Contents" {
        return None;
    }
    let app = contents.parent()?;
    if app.extension()? != "app" {
        return None;
    }
    Some(contents.join("Resources"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
