//! CLI argument parsing for ocfleet.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::events::DEFAULT_LOG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ocfleet: run templated `oc` commands against a fleet of OpenShift clusters.
///
/// The configuration file lists clusters and command templates. Each cluster
/// is logged into with the token found in `TOKEN_<CLUSTER NAME>` and then
/// receives every expanded command, in order. The first failure stops the run.
#[derive(Parser, Debug)]
#[command(name = "ocfleet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for ocfleet.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log into every cluster and run every expanded command.
    ///
    /// Clusters are processed in file order. A missing token or a failing
    /// command aborts the run; work already applied is not rolled back.
    Run(RunArgs),

    /// Print the expanded commands without touching any cluster.
    ///
    /// Parameter groups that don't fit their template are skipped and
    /// recorded in the log, exactly as `run` would.
    Expand(ExpandArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// YAML configuration file with `clusters` and `commands`.
    pub config_file: PathBuf,

    /// Append-only NDJSON log file.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

/// Arguments for the `expand` command.
#[derive(Parser, Debug)]
pub struct ExpandArgs {
    /// YAML configuration file with `clusters` and `commands`.
    pub config_file: PathBuf,

    /// Append-only NDJSON log file.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
