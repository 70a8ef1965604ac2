//! Configuration loader for YAML files and environment overrides

use crate::config::types::GripConfig;
use crate::errors::AnalysisError;
use std::env;
use std::path::Path;
use tokio::fs;

pub const ENDPOINT_ENV: &str = "GRIP_ANALYSIS_ENDPOINT";
pub const TIMEOUT_ENV: &str = "GRIP_ANALYSIS_TIMEOUT_SECS";
pub const DEFAULT_CONFIG_FILE: &str = "grip.yaml";

/// Values set explicitly by the caller, e.g. from command-line flags.
/// They win over both the file and the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut GripConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.analysis.endpoint = endpoint.trim().to_string();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.analysis.timeout_secs = timeout_secs;
        }
    }
}

/// Configuration loader with environment resolution
///
/// Loaded configurations are not validated; callers apply their own
/// overrides first and then call [`GripConfig::validate`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<GripConfig, AnalysisError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            AnalysisError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load from `path` when it exists, otherwise start from defaults.
    pub async fn from_optional_file<P: AsRef<Path>>(path: P) -> Result<GripConfig, AnalysisError> {
        let path = path.as_ref();
        if fs::try_exists(path).await.unwrap_or(false) {
            log::info!("Loading configuration from file: {}", path.display());
            Self::from_file(path).await
        } else {
            log::debug!(
                "No configuration file at {}, using defaults",
                path.display()
            );
            let mut config = GripConfig::default();
            Self::resolve_environment(&mut config)?;
            Ok(config)
        }
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<GripConfig, AnalysisError> {
        let mut config: GripConfig = if content.trim().is_empty() {
            GripConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                AnalysisError::ConfigError(format!("Failed to parse YAML config: {}", e))
            })?
        };

        Self::resolve_environment(&mut config)?;

        Ok(config)
    }

    fn resolve_environment(config: &mut GripConfig) -> Result<(), AnalysisError> {
        Self::apply_overrides(config, |key| env::var(key).ok())
    }

    /// Apply `GRIP_ANALYSIS_*` overrides using the given variable lookup.
    pub fn apply_overrides<F>(config: &mut GripConfig, lookup: F) -> Result<(), AnalysisError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            log::debug!("Analysis endpoint overridden by {}", ENDPOINT_ENV);
            config.analysis.endpoint = endpoint.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            config.analysis.timeout_secs = raw.trim().parse().map_err(|_| {
                AnalysisError::ConfigError(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    TIMEOUT_ENV, raw
                ))
            })?;
        }

        Ok(())
    }
}
