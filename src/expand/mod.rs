//! Command expansion.
//!
//! Turns the configured command templates into the flat, ordered list of
//! command lines that will be executed on every cluster:
//!
//! - templates are visited in configuration order
//! - within a template, parameter groups are visited in configuration order
//! - each group that fits the template yields exactly one command
//!
//! Expansion is lenient. A group whose parameters don't fit the template is
//! logged and dropped while its siblings continue. A template that cannot be
//! parsed at all is logged once and contributes nothing; later templates
//! still expand.

mod template;


pub use template::{Template, TemplateError};

use crate::config::CommandTemplate;
use crate::error::Result;
use crate::events::{Event, EventAction, EventLog};
use serde_json::json;

/// Expand every template into concrete command lines.
///
/// Only a log write failure makes this return an error; template problems are
/// recorded in the log and skipped.
pub fn expand_commands(templates: &[CommandTemplate], log: &EventLog) -> Result<Vec<String>> {
    let mut commands = Vec::new();

    for command in templates {
        let parsed = Template::parse(&command.template);

        log.append(&Event::info(EventAction::Gather).with_details(json!({
            "message": format!("gathering commands for {}", command.name),
            "template": command.name,
            "groups": command.parameter_groups.len(),
            "placeholders": parsed.as_ref().ok().map(Template::required_parameters),
        })))?;

        let template = match parsed {
            Ok(template) => template,
            Err(e) => {
                log.append(&Event::error(EventAction::Expand).with_details(json!({
                    "template": command.name,
                    "error": e.to_string(),
                    "skipped_groups": command.parameter_groups.len(),
                })))?;
                continue;
            }
        };

        for (index, group) in command.parameter_groups.iter().enumerate() {
            match template.render(&group.parameters) {
                Ok(rendered) => {
                    log.append(&Event::info(EventAction::Expand).with_details(json!({
                        "template": command.name,
                        "group": index,
                        "command": rendered,
                    })))?;
                    commands.push(rendered);
                }
                Err(e) => {
                    log.append(&Event::error(EventAction::Expand).with_details(json!({
                        "template": command.name,
                        "group": index,
                        "parameters": group.parameters,
                        "error": e.to_string(),
                    })))?;
                }
            }
        }
    }

    Ok(commands)
}
