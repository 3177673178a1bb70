use super::*;

const PRINT_RUNNING: &str = "gui/501/com.pixdex.indexer = {
	active count = 1
	path = /Users/test/Library/LaunchAgents/com.pixdex.indexer.plist
	state = running

	program = /Applications/Pixdex.app/Contents/MacOS/Pixdex
	pid = 4242
	immediate reason = speculative
}";

const LIST_RUNNING: &str = "{
	\"LimitLoadToSessionType\" = \"Aqua\";
	\"Label\" = \"com.pixdex.indexer\";
	\"OnDemand\" = false;
	\"LastExitStatus\" = 0;
	\"PID\" = 4242;
	\"Program\" = \"/Applications/Pixdex.app/Contents/MacOS/Pixdex\";
};";

#[test]
fn test_modern_args() {
    let launchctl = Launchctl::new(false);
    let domain = launchctl.domain().to_string();
    assert!(domain.starts_with("gui/"));

    let plist = Path::new("/Users/test/Library/LaunchAgents/com.pixdex.indexer.plist");
    assert_eq!(
        launchctl.query_args("com.pixdex.indexer"),
        vec!["print".to_string(), format!("{}/com.pixdex.indexer", domain)]
    );
    assert_eq!(
        launchctl.register_args(plist),
        vec!["bootstrap".to_string(), domain.clone(), plist.display().to_string()]
    );
    assert_eq!(
        launchctl.unregister_args(plist),
        vec!["bootout".to_string(), domain, plist.display().to_string()]
    );
}

#[test]
fn test_legacy_args() {
    let launchctl = Launchctl::new(true);
    let plist = Path::new("/tmp/com.test.plist");

    assert_eq!(launchctl.query_args("com.test"), vec!["list", "com.test"]);
    assert_eq!(launchctl.register_args(plist), vec!["load", "-w", "/tmp/com.test.plist"]);
    assert_eq!(launchctl.unregister_args(plist), vec!["unload", "-w", "/tmp/com.test.plist"]);
}

#[test]
fn test_missing_utility_is_io_error() {
    let launchctl = Launchctl::new(false).with_program("/nonexistent/bin/launchctl");
    assert!(launchctl.query("com.test").is_err());
    assert!(launchctl.register(Path::new("/tmp/com.test.plist")).is_err());
}

#[cfg(unix)]
#[test]
fn test_nonzero_exit_is_captured() {
    let launchctl = Launchctl::new(false).with_program("false");
    let output = launchctl.query("com.test").unwrap();
    assert!(!output.success);
    assert_eq!(output.status_code, Some(1));
}

#[cfg(unix)]
#[test]
fn test_zero_exit_is_success() {
    let launchctl = Launchctl::new(true).with_program("true");
    let output = launchctl.unregister(Path::new("/tmp/com.test.plist")).unwrap();
    assert!(output.success);
}

#[test]
fn test_diagnostic_prefers_stderr() {
    let output = CommandOutput {
        success: false,
        status_code: Some(5),
        stdout: "some stdout".to_string(),
        stderr: "Bootstrap failed: 5: Input/output error\n".to_string(),
    };
    assert_eq!(output.diagnostic(), "Bootstrap failed: 5: Input/output error");
}

#[test]
fn test_diagnostic_falls_back_to_stdout_then_generic() {
    let stdout_only = CommandOutput {
        success: false,
        status_code: Some(1),
        stdout: "Load failed".to_string(),
        stderr: "  ".to_string(),
    };
    assert_eq!(stdout_only.diagnostic(), "Load failed");

    let silent = CommandOutput {
        success: false,
        status_code: Some(113),
        ..Default::default()
    };
    assert_eq!(silent.diagnostic(), "launchctl exited with status 113");

    let killed = CommandOutput::default();
    assert!(killed.diagnostic().contains("without an exit status"));
}

#[test]
fn test_combined_output() {
    let output = CommandOutput {
        stdout: "out\n".to_string(),
        stderr: "err\n".to_string(),
        ..Default::default()
    };
    assert_eq!(output.combined(), "out\nerr");
}

#[test]
fn test_parse_pid_from_print() {
    assert_eq!(parse_pid(PRINT_RUNNING), Some(4242));
}

#[test]
fn test_parse_pid_from_list() {
    assert_eq!(parse_pid(LIST_RUNNING), Some(4242));
}

#[test]
fn test_parse_pid_absent() {
    assert_eq!(parse_pid("state = waiting\n"), None);
}

#[test]
fn test_parse_state() {
    assert_eq!(parse_state(PRINT_RUNNING).as_deref(), Some("running"));
    assert_eq!(parse_state(LIST_RUNNING), None);
}
