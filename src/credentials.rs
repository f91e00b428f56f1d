//! Cluster credential resolution.
//!
//! Each cluster authenticates with a bearer token looked up under a key
//! derived from its name: `TOKEN_` followed by the upper-cased cluster name.
//! The store is injected so callers decide where secrets come from; the CLI
//! uses the process environment.

use crate::error::{FleetError, Result};
use crate::events::{Event, EventAction, EventLog};
use serde_json::json;
use std::collections::HashMap;

/// Prefix for every token lookup key.
pub const TOKEN_KEY_PREFIX: &str = "TOKEN_";

/// A read-only key/value secret lookup.
pub trait SecretStore {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn lookup(&self, key: &str) -> Option<String> {
        // Non-Unicode values are treated as missing.
        std::env::var(key).ok()
    }
}

impl SecretStore for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Lookup key for a cluster's token.
pub fn token_key(cluster: &str) -> String {
    format!("{}{}", TOKEN_KEY_PREFIX, cluster.to_uppercase())
}

/// Resolve the token for `cluster`.
///
/// Resolution is never cached: every call consults the store again.
///
/// # Returns
///
/// * `Ok(String)` - The token
/// * `Err(FleetError::TokenMissing)` - The store has no value for the key
/// * `Err(FleetError::UserError)` - The log could not be written
pub fn resolve_token<S: SecretStore + ?Sized>(
    store: &S,
    cluster: &str,
    log: &EventLog,
) -> Result<String> {
    let key = token_key(cluster);

    log.append(
        &Event::info(EventAction::TokenLookup)
            .with_cluster(cluster)
            .with_details(json!({"message": format!("looking for env var {} in os", key)})),
    )?;

    match store.lookup(&key) {
        Some(token) => {
            log.append(
                &Event::info(EventAction::TokenLookup)
                    .with_cluster(cluster)
                    .with_details(json!({"message": format!("env var {} found in os", key)})),
            )?;
            Ok(token)
        }
        None => {
            let err = FleetError::TokenMissing { key };
            log.append(
                &Event::error(EventAction::TokenLookup)
                    .with_cluster(cluster)
                    .with_details(json!({"message": err.to_string()})),
            )?;
            Err(err)
        }
    }
}
