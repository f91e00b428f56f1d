//! Fleet configuration model.
//!
//! The configuration document lists the clusters to visit and the command
//! templates to expand, both in execution order:
//!
//! ```yaml
//! clusters:
//!   - name: cluster1
//!     url: https://cluster1:8443
//!
//! commands:
//!   - name: env
//!     template: oc set env dc {} TZ=America/Argentina/Buenos_Aires -n prod
//!     parameterGroups:
//!       - parameters: [app1]
//!       - parameters: [app2]
//! ```
//!
//! Required fields are enforced once, here, so the rest of the pipeline can
//! treat every record as well formed. Unknown keys are ignored for forward
//! compatibility.

use crate::error::{FleetError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A target control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    /// Cluster identifier, also used to derive the token lookup key.
    pub name: String,
    /// API endpoint passed to `oc login`.
    pub url: String,
}

/// One set of positional values for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterGroup {
    pub parameters: Vec<String>,
}

/// A command template and the parameter groups it is expanded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTemplate {
    pub name: String,
    /// Command line with positional placeholders (`{}` or `{0}`).
    pub template: String,
    pub parameter_groups: Vec<ParameterGroup>,
}

/// The parsed configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetConfig {
    pub clusters: Vec<ClusterSpec>,
    pub commands: Vec<CommandTemplate>,
}

impl FleetConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(FleetConfig)` - Successfully loaded config
    /// * `Err(FleetError::UserError)` - The file could not be read
    /// * `Err(FleetError::ConfigMalformed)` - A required field is missing or mistyped
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            FleetError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// A missing required field is reported with the parser's location, e.g.
    /// `commands[1]: missing field `parameterGroups` at line 7 column 5`.
    /// Field values are taken as written: empty strings and repeated cluster
    /// names are accepted.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| FleetError::ConfigMalformed(e.to_string()))
    }
}
