//! Implementation of the `ocfleet expand` command.

use super::load_config;
use crate::cli::ExpandArgs;
use crate::error::Result;
use crate::events::EventLog;
use crate::expand::expand_commands;
use std::io::Write;
use std::path::Path;

/// Print every expanded command, one per line.
pub fn cmd_expand(args: ExpandArgs) -> Result<()> {
    let log = EventLog::new(&args.log_file);
    let commands = expanded_commands(&args.config_file, &log)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for command in &commands {
        // A closed pipe (e.g. `| head`) is not an error worth reporting.
        if writeln!(out, "{}", command).is_err() {
            break;
        }
    }

    Ok(())
}

fn expanded_commands(config_file: &Path, log: &EventLog) -> Result<Vec<String>> {
    let config = load_config(config_file, log)?;
    expand_commands(&config.commands, log)
}
