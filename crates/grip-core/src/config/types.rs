//! Configuration type definitions
//!
//! Every section is optional in YAML; missing fields fall back to the defaults
//! below so an empty file (or no file at all) yields a working local setup.

use crate::errors::AnalysisError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GripConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub documents: DocumentPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote analysis endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Multipart field name carrying the uploaded document
    #[serde(default = "default_document_field")]
    pub document_field: String,
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            document_field: default_document_field(),
        }
    }
}

/// Rules an uploaded document must satisfy before it is sent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentPolicy {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
    #[serde(default = "default_question")]
    pub default_question: String,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            allowed_content_types: default_allowed_content_types(),
            default_question: default_question(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl GripConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let endpoint = self.analysis.endpoint.trim();
        if endpoint.is_empty() {
            return Err(AnalysisError::ConfigError(
                "Analysis endpoint cannot be empty".to_string(),
            ));
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(AnalysisError::ConfigError(format!(
                "Analysis endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }
        if self.analysis.timeout_secs == 0 {
            return Err(AnalysisError::ConfigError(
                "Analysis timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.analysis.document_field.trim().is_empty() {
            return Err(AnalysisError::ConfigError(
                "Analysis document_field cannot be empty".to_string(),
            ));
        }
        if self.documents.max_bytes == 0 {
            return Err(AnalysisError::ConfigError(
                "Document max_bytes must be greater than 0".to_string(),
            ));
        }
        if self.documents.default_question.trim().is_empty() {
            return Err(AnalysisError::ConfigError(
                "Document default_question cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_endpoint() -> String { "http://127.0.0.1:8002/ask".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_document_field() -> String { "pdf_file".to_string() }
fn default_max_bytes() -> u64 { 10 * 1024 * 1024 }
fn default_allowed_content_types() -> Vec<String> { vec![PDF_CONTENT_TYPE.to_string()] }
fn default_question() -> String {
    "Please analyze this contract for risks and opportunities.".to_string()
}
fn default_log_level() -> String { "info".to_string() }
