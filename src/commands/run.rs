//! Implementation of the `ocfleet run` command.
//!
//! Loads the configuration, expands every template, then hands the command
//! list to the executor. The run's start and its terminal state (complete or
//! aborted) bracket everything else in the log.

use super::load_config;
use crate::cli::RunArgs;
use crate::credentials::{EnvSecretStore, SecretStore};
use crate::error::Result;
use crate::events::{Event, EventAction, EventLog};
use crate::executor::{RunReport, execute_commands_by_cluster};
use crate::expand::expand_commands;
use crate::runner::{CommandRunner, ProcessRunner};
use serde_json::json;
use std::path::Path;

/// Execute the `ocfleet run` command against real clusters.
pub fn cmd_run(args: RunArgs) -> Result<()> {
    let log = EventLog::new(&args.log_file);
    let mut runner = ProcessRunner::new(log.clone());

    let report = run_config(&args.config_file, &EnvSecretStore, &mut runner, &log)?;

    println!(
        "Ran {} command(s) on {} cluster(s) ({} invocations including logins).",
        report.commands,
        report.clusters,
        report.invocations()
    );
    println!("Log: {}", log.path().display());
    Ok(())
}

/// Load, expand and execute, recording the terminal state in the log.
pub(crate) fn run_config<S, R>(
    config_file: &Path,
    store: &S,
    runner: &mut R,
    log: &EventLog,
) -> Result<RunReport>
where
    S: SecretStore + ?Sized,
    R: CommandRunner + ?Sized,
{
    log.append(&Event::info(EventAction::RunStart).with_details(json!({
        "message": "ocfleet process starting...",
        "config_file": config_file.display().to_string(),
    })))?;

    let result = load_config(config_file, log).and_then(|config| {
        let commands = expand_commands(&config.commands, log)?;
        execute_commands_by_cluster(&commands, &config.clusters, store, runner, log)
    });

    match &result {
        Ok(report) => {
            log.append(&Event::info(EventAction::RunComplete).with_details(json!({
                "clusters": report.clusters,
                "logins": report.logins,
                "commands": report.commands,
            })))?;
        }
        Err(e) => {
            // The run error is what the caller needs; a second log
            // failure here must not replace it.
            let _ = log.append(&Event::error(EventAction::RunAborted).with_details(json!({
                "error": e.to_string(),
                "exit_code": e.exit_code(),
            })));
        }
    }

    result
}
