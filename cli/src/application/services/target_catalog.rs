//! Application service: inspect configured targets.

use crate::application::ports::TargetStore;
use crate::domain::{ConfigError, Lookup, TargetRow, TargetSummary};

/// Every configured target, resolved where possible.
///
/// A target that fails to resolve is listed with its error instead of
/// failing the whole listing.
///
/// # Errors
///
/// `ConfigError::Unreadable` if the targets file cannot be loaded.
pub fn list(store: &impl TargetStore, env: &impl Lookup) -> Result<Vec<TargetRow>, ConfigError> {
    let config = store.load()?;
    Ok(config
        .names()
        .map(|name| match config.resolve(name, env) {
            Ok(params) => TargetRow::Valid(TargetSummary::from(&params)),
            Err(e) => TargetRow::Invalid {
                name: name.to_string(),
                error: e.to_string(),
            },
        })
        .collect())
}

/// One target's resolved settings, credentials described but never shown.
///
/// # Errors
///
/// `ConfigError::NotFound` or `ConfigError::Invalid` as from resolution.
pub fn show(store: &impl TargetStore, name: &str) -> Result<TargetSummary, ConfigError> {
    store.resolve(name).map(|params| TargetSummary::from(&params))
}
