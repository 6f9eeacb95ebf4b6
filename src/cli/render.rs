//! .

use crate::cli::dispatch::Outcome;

use kmre_client::app::UninstallOutcome;
use std::io::Write;

/// Print `outcome`. An `Err` means the operation did not complete.
pub fn render(outcome: Outcome, as_json: bool) -> Result<(), String> {
    if as_json {
        let json = serde_json::to_vec_pretty(&outcome)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        write_stdout(&json)?;
        return completed(&outcome);
    }

    match &outcome {
        Outcome::Accepted { result: true } => println!("✔ accepted"),
        Outcome::Accepted { result: false } => eprintln!("Error: the service declined"),
        Outcome::Uninstalled {
            outcome: UninstallOutcome::Removed,
            ..
        } => println!("✔ removed"),
        Outcome::Uninstalled { outcome, code } => eprintln!("Error: {outcome:?} ({code})"),
        Outcome::Installed { apps } => {
            for app in apps {
                println!("{}\t{}\t{}", app.package_name, app.version_name, app.app_name);
            }
        }
        Outcome::Running { apps } => {
            for app in apps {
                println!("{}\t{}", app.package_name, app.app_name);
            }
        }
        Outcome::Sent => println!("✔ sent"),
        Outcome::Prop { value: Some(value) } => println!("{value}"),
        Outcome::Prop { value: None } => eprintln!("Error: no matching property in reply"),
        Outcome::Check { installed: true } => println!("installed"),
        Outcome::Check { installed: false } => println!("not installed"),
        Outcome::Failed { error } => eprintln!("Error: {error}"),
    }
    completed(&outcome)
}

fn completed(outcome: &Outcome) -> Result<(), String> {
    match outcome {
        Outcome::Accepted { result: false } => Err("Operation was declined".into()),
        Outcome::Uninstalled { outcome, .. } if *outcome != UninstallOutcome::Removed => {
            Err("Uninstall did not complete".into())
        }
        Outcome::Prop { value: None } => Err("Property not available".into()),
        Outcome::Check { installed: false } => Err("Not installed".into()),
        Outcome::Failed { .. } => Err("Service call failed".into()),
        _ => Ok(()),
    }
}

fn write_stdout(data: &[u8]) -> Result<(), String> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(data)
        .and_then(|()| stdout.write_all(b"\n"))
        .map_err(|e| format!("Failed to write to stdout: {e}"))
}
