//! Multi-cluster execution.
//!
//! Clusters are visited strictly in order. For each one the executor resolves
//! the token, logs in, then runs every expanded command. The first failure
//! aborts the whole run: nothing further is attempted on the current cluster
//! or any later one, and nothing already applied is undone.

use crate::config::ClusterSpec;
use crate::credentials::{SecretStore, resolve_token};
use crate::error::Result;
use crate::events::{Event, EventAction, EventLog};
use crate::runner::CommandRunner;
use serde_json::json;

/// Counts for a run in which every cluster and every command succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Clusters fully processed.
    pub clusters: usize,
    /// Login commands executed.
    pub logins: usize,
    /// Payload commands executed, across all clusters.
    pub commands: usize,
}

impl RunReport {
    /// Total number of runner invocations.
    pub fn invocations(&self) -> usize {
        self.logins + self.commands
    }
}

/// Build the `oc login` command for a cluster.
///
/// The token is embedded verbatim and therefore appears in the process log.
pub fn login_command(url: &str, token: &str) -> String {
    format!("oc login {} --token={}", url, token)
}

/// Run `commands` against every cluster in `clusters`.
///
/// # Returns
///
/// * `Ok(RunReport)` - Every login and command succeeded on every cluster
/// * `Err(FleetError::TokenMissing)` - A cluster had no token; nothing ran on it
/// * `Err(FleetError::CommandExecution)` - A login or command failed
pub fn execute_commands_by_cluster<S, R>(
    commands: &[String],
    clusters: &[ClusterSpec],
    store: &S,
    runner: &mut R,
    log: &EventLog,
) -> Result<RunReport>
where
    S: SecretStore + ?Sized,
    R: CommandRunner + ?Sized,
{
    log.append(&Event::info(EventAction::Execute).with_details(json!({
        "message": "executing commands...",
        "clusters": clusters.len(),
        "commands": commands.len(),
    })))?;

    let mut report = RunReport::default();

    for cluster in clusters {
        let token = resolve_token(store, &cluster.name, log)?;

        runner.run(&login_command(&cluster.url, &token))?;
        report.logins += 1;

        for command in commands {
            runner.run(command)?;
            report.commands += 1;
        }

        report.clusters += 1;
    }

    Ok(report)
}
