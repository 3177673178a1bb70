//! Service subcommand handlers for pixdex.

use tracing::{error, info};

use pixdex_config::ServiceConfig;
use pixdex_service::{ServiceController, ServiceLogs, ServiceOutcome};

use crate::cli::ServiceAction;

/// Handle service subcommands. Returns whether the verb succeeded.
pub(crate) fn handle_service_command(
    action: ServiceAction,
    config: ServiceConfig,
    json: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let controller = ServiceController::from_config(config);

    let outcome = match action {
        ServiceAction::Install => {
            info!("Installing LaunchAgent: {}", controller.label());
            ServiceOutcome::installed(controller.install())
        }
        ServiceAction::Uninstall => {
            info!("Uninstalling LaunchAgent: {}", controller.label());
            ServiceOutcome::completed(controller.uninstall())
        }
        ServiceAction::Restart => {
            info!("Restarting LaunchAgent: {}", controller.label());
            ServiceOutcome::completed(controller.restart())
        }
        ServiceAction::Status => controller.status().into(),
        ServiceAction::Print => {
            return match controller.descriptor_preview() {
                Ok(plist) => {
                    println!("# {}", controller.descriptor_path().display());
                    print!("{}", plist);
                    Ok(true)
                }
                Err(e) => report(&ServiceOutcome::from(e), json).map(|_| false),
            };
        }
        ServiceAction::Logs { lines } => {
            return match controller.tail_logs(lines) {
                Ok(logs) => {
                    print_logs(controller.label(), &logs, json)?;
                    Ok(true)
                }
                Err(e) => report(&ServiceOutcome::from(e), json).map(|_| false),
            };
        }
    };

    report(&outcome, json)?;
    Ok(outcome.ok)
}

fn report(outcome: &ServiceOutcome, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    if let Some(err) = &outcome.error {
        error!(kind = %err.kind, "{}", err.message);
        println!("FAILED ({}): {}", err.kind, err.message);
        if err.retryable {
            println!("Fix the cause above and try again.");
        }
        return Ok(());
    }

    if let Some(path) = &outcome.plist_path {
        println!("Indexer installed as LaunchAgent");
        println!("  plist: {}", path.display());
        println!("The indexer starts at login and is relaunched if it exits.");
    } else if let Some(loaded) = outcome.loaded {
        if loaded {
            match outcome.pid {
                Some(pid) => println!("Indexer is LOADED and RUNNING (PID: {})", pid),
                None => println!("Indexer is LOADED but not running"),
            }
        } else {
            println!("Indexer is NOT LOADED");
        }
        if let Some(output) = outcome.output.as_deref().filter(|o| !o.is_empty()) {
            println!("\n{}", output);
        }
    } else {
        println!("OK");
    }

    Ok(())
}

fn print_logs(label: &str, logs: &ServiceLogs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(logs)?);
        return Ok(());
    }

    println!("=== pixdex indexer logs (LaunchAgent: {}) ===\n", label);
    for (name, path, lines) in [
        ("stdout", &logs.stdout_path, &logs.stdout),
        ("stderr", &logs.stderr_path, &logs.stderr),
    ] {
        match lines {
            Some(lines) => {
                println!("--- {} ({}) ---", name, path.display());
                for line in lines {
                    println!("{}", line);
                }
            }
            None => println!("No {} log found at {}", name, path.display()),
        }
        println!();
    }

    Ok(())
}
