//! Configuration validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::loader::ConfigLoader;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

const PROCESS_TYPES: [&str; 4] = ["Background", "Standard", "Adaptive", "Interactive"];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_service(config, &mut result);
        Self::validate_bundle(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_service(config: &Config, result: &mut ValidationResult) {
        let service = &config.service;

        // The label doubles as the descriptor file name.
        if service.label.is_empty() {
            result.add_error(ValidationError::new("service.label", "Label cannot be empty"));
        } else if !service
            .label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        {
            result.add_error(ValidationError::new(
                "service.label",
                format!(
                    "Label '{}' may only contain ASCII letters, digits, '.', '-' and '_'",
                    service.label
                ),
            ));
        } else if !service.label.contains('.') {
            result.add_warning(ValidationWarning::new(
                "service.label",
                "Label is not in reverse domain notation (e.g. com.example.indexer)",
            ));
        }

        if service.app_name.trim().is_empty() {
            result.add_error(ValidationError::new("service.app_name", "App name cannot be empty"));
        }

        if !is_env_var_name(&service.bin_dir_env) {
            result.add_error(ValidationError::new(
                "service.bin_dir_env",
                format!("'{}' is not a valid environment variable name", service.bin_dir_env),
            ));
        }

        if !PROCESS_TYPES.contains(&service.process_type.as_str()) {
            result.add_error(ValidationError::new(
                "service.process_type",
                format!(
                    "Unknown process type '{}', valid values: {:?}",
                    service.process_type, PROCESS_TYPES
                ),
            ));
        }

        if service.throttle_interval == 0 {
            result.add_warning(ValidationWarning::new(
                "service.throttle_interval",
                "throttle_interval is 0, launchd will apply its own default",
            ));
        }

        // launchd resolves StandardOutPath against its own working directory.
        if let Some(dir) = &service.log_dir {
            let expanded = ConfigLoader::expand_path(&dir.to_string_lossy());
            if !Path::new(&expanded).is_absolute() {
                result.add_error(ValidationError::new(
                    "service.log_dir",
                    format!("Log directory '{}' must be an absolute path", dir.display()),
                ));
            }
        }
    }

    fn validate_bundle(config: &Config, result: &mut ValidationResult) {
        let bundle = &config.service.bundle;

        if bundle.worker_entry.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "service.bundle.worker_entry",
                "Worker entry point cannot be empty",
            ));
        } else if bundle.worker_entry.is_absolute() {
            result.add_error(ValidationError::new(
                "service.bundle.worker_entry",
                "Worker entry point must be relative to the bundle resources directory",
            ));
        }

        if bundle.bin_dir.is_absolute() {
            result.add_error(ValidationError::new(
                "service.bundle.bin_dir",
                "Binary directory must be relative to the bundle resources directory",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.max_files == 0 {
            result.add_error(ValidationError::new(
                "logging.max_files",
                "max_files must be greater than 0",
            ));
        }
    }
}

fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
