//! Error types for the ocfleet CLI.
//!
//! Uses thiserror for derive macros. Every variant is fatal to a run and maps
//! to its own exit code. Template substitution failures are not errors at
//! this level: the expander logs and skips them.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for ocfleet operations.
#[derive(Error, Debug)]
pub enum FleetError {
    /// Invalid invocation or an I/O failure outside the pipeline proper.
    #[error("{0}")]
    UserError(String),

    /// A required configuration field is absent or invalid.
    #[error("malformed configuration: {0}")]
    ConfigMalformed(String),

    /// The secret store has no entry for a cluster's token key.
    #[error("env var {key} is not defined")]
    TokenMissing {
        /// The lookup key, e.g. `TOKEN_CLUSTER1`.
        key: String,
    },

    /// An external command exited non-zero or could not be started.
    #[error("command \"{command}\" failed{}: {output}", format_exit_code(.exit_code))]
    CommandExecution {
        /// The command line as it was about to be executed.
        command: String,
        /// Exit code, `None` if the process never ran or was killed by a signal.
        exit_code: Option<i32>,
        /// Captured stdout and stderr in write order, or the spawn error.
        output: String,
    },
}

fn format_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit code {})", code),
        None => String::new(),
    }
}

impl FleetError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FleetError::UserError(_) => exit_codes::USER_ERROR,
            FleetError::ConfigMalformed(_) => exit_codes::CONFIG_MALFORMED,
            FleetError::TokenMissing { .. } => exit_codes::TOKEN_MISSING,
            FleetError::CommandExecution { .. } => exit_codes::COMMAND_FAILURE,
        }
    }
}

/// Result type alias for ocfleet operations.
pub type Result<T> = std::result::Result<T, FleetError>;
