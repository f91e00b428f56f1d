//! Exit code constants for the ocfleet CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable file, log write failure)
//! - 2: Malformed configuration (missing or invalid field)
//! - 3: Cluster token missing from the secret store
//! - 4: External command exited non-zero or could not be started

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unreadable files, or log I/O failure.
pub const USER_ERROR: i32 = 1;

/// Configuration is structurally invalid.
pub const CONFIG_MALFORMED: i32 = 2;

/// No credential could be found for a cluster.
pub const TOKEN_MISSING: i32 = 3;

/// A login or payload command failed.
pub const COMMAND_FAILURE: i32 = 4;
