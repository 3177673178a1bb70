    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_empty_label() {
        let mut config = Config::default();
        config.service.label = String::new();

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "service.label"));
    }

    #[test]
    fn test_validate_label_with_path_separator() {
        let mut config = Config::default();
        config.service.label = "com.pixdex/../evil".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "service.label"));
    }

    #[test]
    fn test_validate_label_without_domain_warns() {
        let mut config = Config::default();
        config.service.label = "indexer".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "service.label"));
    }

    #[test]
    fn test_validate_bad_env_var_name() {
        let mut config = Config::default();
        config.service.bin_dir_env = "1BAD-NAME".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "service.bin_dir_env"));
    }

    #[test]
    fn test_validate_unknown_process_type() {
        let mut config = Config::default();
        config.service.process_type = "Realtime".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "service.process_type"));
    }

    #[test]
    fn test_validate_zero_throttle_warning() {
        let mut config = Config::default();
        config.service.throttle_interval = 0;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "service.throttle_interval"));
    }

    #[test]
    fn test_validate_absolute_bundle_paths() {
        let mut config = Config::default();
        config.service.bundle.worker_entry = PathBuf::from("/opt/worker.js");
        config.service.bundle.bin_dir = PathBuf::from("/usr/local/bin");

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "service.bundle.worker_entry"));
        assert!(result.errors.iter().any(|e| e.path == "service.bundle.bin_dir"));
    }

    #[test]
    fn test_validate_zero_max_files() {
        let mut config = Config::default();
        config.logging.max_files = 0;

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "logging.max_files"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = Config::default();
        config.service.label = String::new();

        let err = ConfigValidator::validate(&config).into_result().unwrap_err();
        assert!(err.to_string().contains("service.label"));
    }

    #[test]
    fn test_into_result_passes_warnings() {
        let mut config = Config::default();
        config.service.throttle_interval = 0;

        let warnings = ConfigValidator::validate(&config).into_result().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_validate_relative_log_dir() {
        let mut config = Config::default();
        config.service.log_dir = Some(PathBuf::from("logs"));

        let result = ConfigValidator::validate(&config);
        assert!(result.errors.iter().any(|e| e.path == "service.log_dir"));
    }

    #[test]
    fn test_validate_absolute_or_home_log_dir() {
        for dir in ["~/Library/Logs/pixdex", "/var/tmp/pixdex-logs"] {
            let mut config = Config::default();
            config.service.log_dir = Some(PathBuf::from(dir));

            let result = ConfigValidator::validate(&config);
            assert!(
                !result.errors.iter().any(|e| e.path == "service.log_dir"),
                "{} should be accepted",
                dir
            );
        }
    }
