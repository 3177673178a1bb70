//! End-to-end lifecycle scenarios through the public API.
//!
//! These drive a controller against the in-memory launchd fake and check the
//! `{ ok, ... }` outcomes the UI receives.

use std::fs;
use std::path::{Path, PathBuf};

use pixdex_config::ConfigLoader;
use pixdex_service::fakes::FakeLaunchd;
use pixdex_service::{ErrorKind, PathResolver, ServiceController, ServiceOutcome};
use serde_json::{Value, json};
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

struct Machine {
    _dir: TempDir,
    home: PathBuf,
    app: PathBuf,
}

fn machine() -> Machine {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("Users").join("alex");
    let app = dir.path().join("Applications").join("Pixdex.app");
    let resources = app.join("Contents").join("Resources");

    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(app.join("Contents").join("MacOS")).unwrap();
    fs::write(app.join("Contents").join("MacOS").join("Pixdex"), "").unwrap();
    fs::create_dir_all(resources.join("worker")).unwrap();
    fs::write(resources.join("worker").join("main.js"), "").unwrap();
    fs::create_dir_all(resources.join("tools")).unwrap();

    Machine {
        _dir: dir,
        home,
        app,
    }
}

const CONFIG: &str = r#"
    [service]
    label = "com.example.pixdex.worker"
    bin_dir_env = "PIXDEX_TOOLS"

    [service.bundle]
    worker_entry = "worker/main.js"
    bin_dir = "tools"
"#;

fn controller(machine: &Machine, executable: &Path) -> ServiceController<FakeLaunchd> {
    let config = ConfigLoader::load_str(CONFIG).unwrap().service;
    let resolver = PathResolver::new(executable, &machine.home, &config);
    ServiceController::new(config, resolver, FakeLaunchd::new())
}

fn packaged(machine: &Machine) -> ServiceController<FakeLaunchd> {
    controller(machine, &machine.app.join("Contents").join("MacOS").join("Pixdex"))
}

fn to_json(outcome: ServiceOutcome) -> Value {
    serde_json::to_value(outcome).unwrap()
}

fn plist_path(machine: &Machine) -> PathBuf {
    machine
        .home
        .join("Library/LaunchAgents/com.example.pixdex.worker.plist")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn fresh_install_reports_plist_path_and_loads() {
    let m = machine();
    let controller = packaged(&m);

    let installed = to_json(ServiceOutcome::installed(controller.install()));
    assert_eq!(
        installed,
        json!({ "ok": true, "plistPath": plist_path(&m).display().to_string() })
    );

    let status = to_json(controller.status().into());
    assert_eq!(status["ok"], json!(true));
    assert_eq!(status["loaded"], json!(true));
}

#[test]
fn descriptor_carries_configured_worker_contract() {
    let m = machine();
    packaged(&m).install().unwrap();

    let plist = fs::read_to_string(plist_path(&m)).unwrap();
    let resources = m.app.join("Contents").join("Resources");
    assert!(plist.contains("<key>PIXDEX_TOOLS</key>"));
    assert!(plist.contains(&format!("<string>{}</string>", resources.join("tools").display())));
    assert!(plist.contains(&format!(
        "<string>{}</string>",
        resources.join("worker").join("main.js").display()
    )));
    assert!(plist.contains("com.example.pixdex.worker.out.log"));
}

#[test]
fn install_then_uninstall_leaves_nothing_behind() {
    let m = machine();
    let controller = packaged(&m);
    controller.install().unwrap();

    let removed = to_json(ServiceOutcome::completed(controller.uninstall()));
    assert_eq!(removed, json!({ "ok": true }));

    let status = to_json(controller.status().into());
    assert_eq!(status["ok"], json!(true));
    assert_eq!(status["loaded"], json!(false));
    assert!(!plist_path(&m).exists());
}

#[test]
fn uninstall_of_uninstalled_service_is_ok() {
    let m = machine();
    let outcome = to_json(ServiceOutcome::completed(packaged(&m).uninstall()));
    assert_eq!(outcome, json!({ "ok": true }));
}

#[test]
fn restart_before_install_is_a_hard_failure() {
    let m = machine();
    let outcome = to_json(ServiceOutcome::completed(packaged(&m).restart()));

    assert_eq!(outcome["ok"], json!(false));
    assert_eq!(outcome["error"]["kind"], json!("RestartFailed"));
}

#[test]
fn development_build_cannot_install() {
    let m = machine();
    let controller = controller(&m, &m.home.join("code/pixdex/target/debug/pixdex"));

    let err = controller.install().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedContext);
    assert!(controller.control().calls().is_empty());

    let outcome = to_json(err.into());
    assert_eq!(outcome["error"]["retryable"], json!(false));
}

#[test]
fn broken_bundle_does_not_write_descriptor() {
    let m = machine();
    fs::remove_file(m.app.join("Contents/Resources/worker/main.js")).unwrap();

    let outcome = to_json(ServiceOutcome::installed(packaged(&m).install()));
    assert_eq!(outcome["ok"], json!(false));
    assert_eq!(outcome["error"]["kind"], json!("PathResolutionError"));
    assert!(!plist_path(&m).exists());
}
