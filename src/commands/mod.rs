//! Command implementations for ocfleet.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod expand;
mod run;

use crate::cli::Command;
use crate::config::FleetConfig;
use crate::error::Result;
use crate::events::{Event, EventAction, EventLog};
use serde_json::json;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Expand(args) => expand::cmd_expand(args),
    }
}

/// Load the configuration file, logging where it came from and what it holds.
fn load_config(config_file: &Path, log: &EventLog) -> Result<FleetConfig> {
    log.append(&Event::info(EventAction::ConfigLoad).with_details(json!({
        "message": format!("getting configuration file from {}", config_file.display()),
        "config_file": config_file.display().to_string(),
    })))?;

    match FleetConfig::load(config_file) {
        Ok(config) => {
            log.append(&Event::info(EventAction::ConfigLoad).with_details(json!({
                "clusters": config.clusters.len(),
                "commands": config.commands.len(),
            })))?;
            Ok(config)
        }
        Err(e) => {
            log.append(&Event::error(EventAction::ConfigLoad).with_details(json!({
                "config_file": config_file.display().to_string(),
                "error": e.to_string(),
            })))?;
            Err(e)
        }
    }
}
