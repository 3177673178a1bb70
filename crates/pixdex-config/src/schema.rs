//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Background indexer service registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service label (reverse domain notation). Also names the descriptor file.
    #[serde(default = "default_label")]
    pub label: String,

    /// Application name, used for the per-user log directory.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Environment variable through which the worker finds its helper binaries.
    #[serde(default = "default_bin_dir_env")]
    pub bin_dir_env: String,

    /// launchd process type (Background, Standard, Adaptive, Interactive).
    #[serde(default = "default_process_type")]
    pub process_type: String,

    /// Minimum seconds between relaunches of a crashing worker.
    #[serde(default = "default_throttle_interval")]
    pub throttle_interval: u32,

    /// Use `launchctl load`/`unload`/`list` instead of `bootstrap`/`bootout`/`print`.
    #[serde(default)]
    pub legacy_launchctl: bool,

    /// Override for the worker log directory (default `~/Library/Logs/<app_name>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    #[serde(default)]
    pub bundle: BundleConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            app_name: default_app_name(),
            bin_dir_env: default_bin_dir_env(),
            process_type: default_process_type(),
            throttle_interval: default_throttle_interval(),
            legacy_launchctl: false,
            log_dir: None,
            bundle: BundleConfig::default(),
        }
    }
}

fn default_label() -> String {
    "com.pixdex.indexer".to_string()
}

fn default_app_name() -> String {
    "pixdex".to_string()
}

fn default_bin_dir_env() -> String {
    "PIXDEX_BIN_DIR".to_string()
}

fn default_process_type() -> String {
    "Background".to_string()
}

fn default_throttle_interval() -> u32 {
    10
}

/// Layout of the packaged application bundle, relative to its resources directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Worker entry point.
    #[serde(default = "default_worker_entry")]
    pub worker_entry: PathBuf,

    /// Directory of auxiliary binaries the worker shells out to.
    #[serde(default = "default_bin_dir")]
    pub bin_dir: PathBuf,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            worker_entry: default_worker_entry(),
            bin_dir: default_bin_dir(),
        }
    }
}

fn default_worker_entry() -> PathBuf {
    PathBuf::from("indexer").join("worker.js")
}

fn default_bin_dir() -> PathBuf {
    PathBuf::from("bin")
}

/// CLI logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files (default `~/.pixdex/logs`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Number of daily log files to keep.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            max_files: default_max_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_files() -> usize {
    14
}
