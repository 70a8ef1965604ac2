//! Error types for the contract-analysis client
//!
//! Every way a submission can fail is captured by a single enum so the session
//! client can hand failures back to the caller as values. The variants follow
//! where the failure originated: the caller's input, the network, the remote
//! service, or local configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Server error: {0}")]
    ApplicationError(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("I/O error: {0}")]
    IoError(String),
}

impl AnalysisError {
    /// Bare message text, without the category prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            AnalysisError::ValidationError(msg)
            | AnalysisError::TransportError(msg)
            | AnalysisError::ApplicationError(msg)
            | AnalysisError::ConfigError(msg)
            | AnalysisError::IoError(msg) => msg,
            AnalysisError::Timeout => "timeout",
        }
    }

    /// Whether the failure was raised locally, before any request went out.
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::ValidationError(_))
    }

    /// Network-level failures: unreachable host, bad status, timeout.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AnalysisError::TransportError(_) | AnalysisError::Timeout
        )
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::Timeout
        } else {
            AnalysisError::TransportError(err.to_string())
        }
    }
}

impl From<serde_yaml::Error> for AnalysisError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalysisError::ConfigError(err.to_string())
    }
}
