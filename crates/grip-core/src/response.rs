//! Responses from the analysis endpoint
//!
//! The service returns a loosely shaped JSON object. Every field is optional
//! and `advice` may be plain text or a nested structure, so the raw fields are
//! kept as `Value` and interpreted here.

use crate::errors::AnalysisError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Value>>,
}

/// A successful response, reduced to what the session client needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub advice: String,
    pub session_id: Option<String>,
    pub filename: Option<String>,
    pub sources: Vec<Value>,
}

impl AnalysisResponse {
    pub fn advice(advice: impl Into<String>) -> Self {
        Self {
            advice: Some(Value::String(advice.into())),
            ..Default::default()
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(Value::String(session_id.into()));
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(Value::String(filename.into()));
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(message.into())),
            ..Default::default()
        }
    }

    /// Parse a response body.
    pub fn from_body(body: &str) -> Result<Self, AnalysisError> {
        serde_json::from_str(body).map_err(|e| {
            AnalysisError::TransportError(format!("Invalid response from analysis service: {}", e))
        })
    }

    /// The application-level error carried by this response, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .filter(|value| is_truthy(value))
            .map(render_text)
    }

    /// Split into a successful analysis or the error the service reported.
    pub fn into_analysis(self) -> Result<Analysis, AnalysisError> {
        if let Some(message) = self.error_message() {
            return Err(AnalysisError::ApplicationError(message));
        }

        Ok(Analysis {
            advice: self.advice.as_ref().map(render_text).unwrap_or_default(),
            session_id: self.session_id.as_ref().and_then(non_empty_text),
            filename: self.filename.as_ref().and_then(non_empty_text),
            sources: self.sources.unwrap_or_default(),
        })
    }
}

/// Render a JSON value as display text.
///
/// Strings pass through untouched; anything else is pretty-printed. Object
/// keys come out sorted, so the same value always renders the same way.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

// An empty string, zero, false or null does not count as a reported error.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
