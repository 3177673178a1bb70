//! # pixdex Service
//!
//! Keeps the pixdex background indexer registered as a macOS LaunchAgent.
//!
//! ## Components
//!
//! - [`PathResolver`]: locates the worker inside the packaged `.app` bundle
//! - [`descriptor`]: builds and renders the LaunchAgent plist
//! - [`ServiceControl`]: the `launchctl` seam, with [`Launchctl`] as the real
//!   implementation and [`fakes::FakeLaunchd`] for tests
//! - [`ServiceController`]: the install / uninstall / restart / status verbs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pixdex_config::ServiceConfig;
//! use pixdex_service::{ServiceController, ServiceOutcome};
//!
//! let controller = ServiceController::from_config(ServiceConfig::default());
//! let outcome = ServiceOutcome::installed(controller.install());
//! ```

pub mod controller;
pub mod descriptor;
pub mod error;
pub mod fakes;
pub mod launchctl;
pub mod outcome;
pub mod paths;

// Re-exports
pub use controller::{ServiceController, ServiceLogs, ServiceStatus};
pub use descriptor::ServiceDescriptor;
pub use error::{ErrorKind, ServiceError};
pub use launchctl::{CommandOutput, Launchctl, ServiceControl};
pub use outcome::{OutcomeError, ServiceOutcome};
pub use paths::{NotPackaged, PathResolver, ResolvedPaths};
