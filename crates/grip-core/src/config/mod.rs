//! Configuration for the analysis client
//!
//! Settings come from a YAML file (typically `grip.yaml`), then environment
//! overrides, then whatever the caller sets explicitly.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests;

use crate::errors::AnalysisError;
use std::path::Path;

/// Load and validate a configuration.
///
/// An explicit `path` must exist; without one, `grip.yaml` in the working
/// directory is used when present. Validation runs once, after `overrides`.
pub async fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<GripConfig, AnalysisError> {
    let mut config = match path {
        Some(path) => ConfigLoader::from_file(path).await?,
        None => ConfigLoader::from_optional_file(DEFAULT_CONFIG_FILE).await?,
    };

    overrides.apply(&mut config);
    config.validate()?;

    Ok(config)
}
