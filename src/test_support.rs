use crate::error::{FleetError, Result};
use crate::events::EventLog;
use crate::runner::CommandRunner;
use std::collections::HashMap;
use tempfile::TempDir;

pub(crate) const SAMPLE_CONFIG: &str = r#"
clusters:
  - name: cluster1
    url: https://cluster1:8443
  - name: cluster2
    url: https://cluster2:8443

commands:
  - name: env
    template: oc set env dc {} TZ=America/Argentina/Buenos_Aires -n prod
    parameterGroups:
      - parameters: [app1]
      - parameters: [app2]
  - name: rollout
    template: oc rollout latest dc {} -n prod
    parameterGroups:
      - parameters: [app1]
      - parameters: [app2]
"#;

/// A log file inside a fresh temp dir. Keep the `TempDir` alive for the test.
pub(crate) fn temp_log() -> (TempDir, EventLog) {
    let temp_dir = TempDir::new().unwrap();
    let log = EventLog::new(temp_dir.path().join("ocfleet.log"));
    (temp_dir, log)
}

pub(crate) fn secrets<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Records every command instead of running it, optionally failing on the
/// n-th invocation (zero-based).
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub(crate) executed: Vec<String>,
    fail_at: Option<usize>,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_at(index: usize) -> Self {
        Self {
            executed: Vec::new(),
            fail_at: Some(index),
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, command: &str) -> Result<String> {
        let index = self.executed.len();
        self.executed.push(command.to_string());

        if self.fail_at == Some(index) {
            return Err(FleetError::CommandExecution {
                command: command.to_string(),
                exit_code: Some(1),
                output: "simulated failure".to_string(),
            });
        }

        Ok(String::new())
    }
}
