//! External command execution.
//!
//! Commands are plain strings split on whitespace into a program and its
//! arguments. There is no shell and no quoting: an argument containing a
//! space cannot be expressed. Every run blocks until the process exits;
//! there is no timeout.

use crate::error::{FleetError, Result};
use crate::events::{Event, EventAction, EventLog};
use serde_json::json;
use std::io::Read;
use std::process::{Command, ExitStatus};

/// Something that can execute a command line and return its output.
pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// Returns the combined output on success and
    /// `FleetError::CommandExecution` on a non-zero exit.
    fn run(&mut self, command: &str) -> Result<String>;
}

/// Runs commands as local subprocesses, logging each one.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    log: EventLog,
}

impl ProcessRunner {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }

    /// Record `err` and hand it back. A failed log write does not replace it.
    fn fail(&self, err: FleetError) -> Result<String> {
        let mut details = json!({"message": err.to_string()});
        if let FleetError::CommandExecution {
            command,
            exit_code,
            output,
        } = &err
        {
            details["command"] = json!(command);
            details["exit_code"] = json!(exit_code);
            details["output"] = json!(output);
        }
        let _ = self
            .log
            .append(&Event::error(EventAction::CommandFailed).with_details(details));
        Err(err)
    }
}

/// Spawn `program` with stdout and stderr sharing one pipe, so the output
/// keeps the order in which the process wrote it. Lossily decoded.
fn run_combined(program: &str, args: &[&str]) -> std::io::Result<(ExitStatus, String)> {
    let (mut reader, writer) = std::io::pipe()?;
    let stderr = writer.try_clone()?;

    // The builder holds the parent's write ends until the end of this
    // statement. They must be closed before reading to reach EOF.
    let mut child = Command::new(program)
        .args(args)
        .stdout(writer)
        .stderr(stderr)
        .spawn()?;

    let mut buf = Vec::new();
    let read = reader.read_to_end(&mut buf);
    let status = child.wait()?;
    read?;

    Ok((status, String::from_utf8_lossy(&buf).into_owned()))
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, command: &str) -> Result<String> {
        self.log.append(&Event::info(EventAction::Execute).with_details(json!({
            "message": format!("executing command \"{}\"", command),
            "command": command,
        })))?;

        let args: Vec<&str> = command.split_whitespace().collect();
        let Some((program, rest)) = args.split_first() else {
            return self.fail(FleetError::CommandExecution {
                command: command.to_string(),
                exit_code: None,
                output: "command is empty".to_string(),
            });
        };

        let (status, combined) = match run_combined(program, rest) {
            Ok(result) => result,
            Err(e) => {
                return self.fail(FleetError::CommandExecution {
                    command: command.to_string(),
                    exit_code: None,
                    output: format!("failed to execute '{}': {}", program, e),
                });
            }
        };

        if status.success() {
            self.log.append(&Event::info(EventAction::CommandOutput).with_details(json!({
                "message": format!("command output is \"{}\"", combined.trim_end()),
                "command": command,
                "output": combined,
            })))?;
            Ok(combined)
        } else {
            self.fail(FleetError::CommandExecution {
                command: command.to_string(),
                exit_code: status.code(),
                output: combined,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Level;
    use crate::test_support::temp_log;

    #[cfg(not(windows))]
    #[test]
    fn test_run_captures_stdout() {
        let (_temp_dir, log) = temp_log();
        let mut runner = ProcessRunner::new(log.clone());

        let output = runner.run("echo hello   fleet").unwrap();
        assert_eq!(output, "hello fleet\n");

        let events = log.read_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, EventAction::Execute);
        assert_eq!(
            events[0].details["message"],
            "executing command \"echo hello   fleet\""
        );
        assert_eq!(events[1].action, EventAction::CommandOutput);
        assert_eq!(events[1].details["output"], "hello fleet\n");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_run_nonzero_exit() {
        let (_temp_dir, log) = temp_log();
        let mut runner = ProcessRunner::new(log.clone());

        let err = runner.run("false").unwrap_err();
        match err {
            FleetError::CommandExecution {
                command, exit_code, ..
            } => {
                assert_eq!(command, "false");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("expected CommandExecution, got {:?}", other),
        }

        let last = log.read_all().unwrap().pop().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.action, EventAction::CommandFailed);
        assert_eq!(last.details["exit_code"], 1);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_run_captures_stderr_on_failure() {
        let (_temp_dir, log) = temp_log();
        let mut runner = ProcessRunner::new(log.clone());

        let err = runner.run("ls /ocfleet/definitely/missing/path").unwrap_err();
        match err {
            FleetError::CommandExecution {
                exit_code, output, ..
            } => {
                assert_ne!(exit_code, Some(0));
                assert!(output.contains("/ocfleet/definitely/missing/path"));
            }
            other => panic!("expected CommandExecution, got {:?}", other),
        }

        let last = log.read_all().unwrap().pop().unwrap();
        assert_eq!(last.level, Level::Error);
        assert_eq!(last.action, EventAction::CommandFailed);
        assert_eq!(last.details["command"], "ls /ocfleet/definitely/missing/path");
        assert!(
            last.details["output"]
                .as_str()
                .unwrap()
                .contains("/ocfleet/definitely/missing/path")
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn test_output_streams_share_one_pipe() {
        let (_temp_dir, log) = temp_log();
        let mut runner = ProcessRunner::new(log);

        // stdout and stderr both reach the caller from a single process.
        let err = runner
            .run("ls / /ocfleet/definitely/missing/path")
            .unwrap_err();
        match err {
            FleetError::CommandExecution { output, .. } => {
                assert!(output.contains("/ocfleet/definitely/missing/path"));
                assert!(output.contains("usr") || output.contains("etc"));
            }
            other => panic!("expected CommandExecution, got {:?}", other),
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn test_failure_survives_unwritable_log() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        // A regular file where the log's parent directory should be.
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut runner = ProcessRunner::new(EventLog::new(blocker.join("ocfleet.log")));

        // The initial `execute` record fails first, so exercise the failure
        // path directly.
        let err = runner
            .fail(FleetError::CommandExecution {
                command: "false".to_string(),
                exit_code: Some(1),
                output: String::new(),
            })
            .unwrap_err();

        assert!(matches!(
            err,
            FleetError::CommandExecution {
                exit_code: Some(1),
                ..
            }
        ));
        assert_eq!(err.exit_code(), crate::exit_codes::COMMAND_FAILURE);
    }

    #[test]
    fn test_run_missing_program() {
        let (_temp_dir, log) = temp_log();
        let mut runner = ProcessRunner::new(log);

        let err = runner.run("nonexistent_command_xyz_123 --flag").unwrap_err();
        match err {
            FleetError::CommandExecution {
                exit_code, output, ..
            } => {
                assert_eq!(exit_code, None);
                assert!(output.contains("failed to execute 'nonexistent_command_xyz_123'"));
            }
            other => panic!("expected CommandExecution, got {:?}", other),
        }
    }

    #[test]
    fn test_run_empty_command() {
        let (_temp_dir, log) = temp_log();
        let mut runner = ProcessRunner::new(log.clone());

        let err = runner.run("   ").unwrap_err();
        assert!(err.to_string().contains("command is empty"));

        let events = log.read_all().unwrap();
        assert_eq!(events.last().unwrap().action, EventAction::CommandFailed);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_quotes_are_not_interpreted() {
        let (_temp_dir, log) = temp_log();
        let mut runner = ProcessRunner::new(log);

        let output = runner.run("echo \"a b\"").unwrap();
        assert_eq!(output, "\"a b\"\n");
    }
}
