//! Process log for ocfleet.
//!
//! Every step of a run (config load, expansion, token lookup, each command
//! and its output) is appended to a single log file in NDJSON format, one
//! JSON object per line. The log is append-only: nothing is ever rewritten,
//! so consecutive runs accumulate in the same file.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `level`: `info` or `error`
//! - `action`: what was happening (`token_lookup`, `execute`, ...)
//! - `actor`: the invoking user as `user@HOST`
//! - `cluster`: optional cluster name for cluster-scoped events
//! - `details`: freeform object with action-specific details
//!
//! Login commands are logged verbatim, bearer token included.

use crate::error::{FleetError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "ocfleet.log";

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Error,
}

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Process started
    RunStart,
    /// Configuration file read and parsed
    ConfigLoad,
    /// Starting expansion of one command template
    Gather,
    /// One parameter group expanded (or failed to)
    Expand,
    /// Secret store lookup for a cluster token
    TokenLookup,
    /// Command about to be executed
    Execute,
    /// Captured output of a successful command
    CommandOutput,
    /// Command exited non-zero or could not be started
    CommandFailed,
    /// Every cluster and every command succeeded
    RunComplete,
    /// Run stopped at the first failure
    RunAborted,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::RunStart => write!(f, "run_start"),
            EventAction::ConfigLoad => write!(f, "config_load"),
            EventAction::Gather => write!(f, "gather"),
            EventAction::Expand => write!(f, "expand"),
            EventAction::TokenLookup => write!(f, "token_lookup"),
            EventAction::Execute => write!(f, "execute"),
            EventAction::CommandOutput => write!(f, "command_output"),
            EventAction::CommandFailed => write!(f, "command_failed"),
            EventAction::RunComplete => write!(f, "run_complete"),
            EventAction::RunAborted => write!(f, "run_aborted"),
        }
    }
}

/// A single record in the process log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    pub level: Level,

    pub action: EventAction,

    /// The user who ran the process (e.g., `user@HOST`).
    pub actor: String,

    /// Cluster the event relates to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given level and action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(level: Level, action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            level,
            action,
            actor: get_actor_string(),
            cluster: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Create an informational event.
    pub fn info(action: EventAction) -> Self {
        Self::new(Level::Info, action)
    }

    /// Create an error-level event.
    pub fn error(action: EventAction) -> Self {
        Self::new(Level::Error, action)
    }

    /// Set the cluster name for this event.
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| FleetError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only NDJSON log file.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event as a single JSON line.
    ///
    /// The file and its parent directory are created if missing. Each append
    /// is synced before returning, so a crash mid-run still leaves every
    /// record up to the failing step on disk.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                FleetError::UserError(format!(
                    "failed to create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                FleetError::UserError(format!(
                    "failed to open log file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json_line).map_err(|e| {
            FleetError::UserError(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            FleetError::UserError(format!(
                "failed to sync log file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Read every record back, in append order.
    #[cfg(test)]
    pub fn read_all(&self) -> Result<Vec<Event>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            FleetError::UserError(format!(
                "failed to read log file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    FleetError::UserError(format!(
                        "invalid log record in '{}': {}",
                        self.path.display(),
                        e
                    ))
                })
            })
            .collect()
    }
}
