use async_trait::async_trait;
use grip_core::submission::FollowUpBody;
use grip_core::{
    AnalysisConfig, AnalysisError, AnalysisResponse, AnalysisTransport, Document,
    SubmissionRequest,
};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// HTTP transport for the remote `/ask` endpoint
pub struct HttpAnalysisTransport {
    endpoint: String,
    client: reqwest::Client,
    document_field: String,
    timeout: Duration,
}

impl HttpAnalysisTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::from_config(&AnalysisConfig {
            endpoint: endpoint.into(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim().to_string(),
            client: reqwest::Client::new(),
            document_field: config.document_field.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn document_field(&self) -> &str {
        &self.document_field
    }

    fn build_form(&self, question: &str, document: &Document) -> Result<Form, AnalysisError> {
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.filename.clone())
            .mime_str(&document.content_type)
            .map_err(|e| {
                AnalysisError::ValidationError(format!(
                    "Invalid content type '{}' for {}: {}",
                    document.content_type, document.filename, e
                ))
            })?;

        Ok(Form::new()
            .text("question", question.to_string())
            .part(self.document_field.clone(), part))
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisTransport {
    async fn send(&self, request: &SubmissionRequest) -> Result<AnalysisResponse, AnalysisError> {
        let builder = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let builder = match request {
            SubmissionRequest::Upload { question, document } => {
                log::debug!(
                    "POST {} multipart ({} = {}, {} bytes)",
                    self.endpoint,
                    self.document_field,
                    document.filename,
                    document.len()
                );
                builder.multipart(self.build_form(question, document)?)
            }
            SubmissionRequest::FollowUp {
                question,
                session_id,
            } => {
                log::debug!("POST {} json (session {})", self.endpoint, session_id);
                builder.json(&FollowUpBody {
                    question,
                    session_id,
                })
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        log::debug!("Analysis service response ({}): {}", status, body);

        if !status.is_success() {
            // An `error` body is still the service talking; let the caller see it.
            if let Ok(parsed) = AnalysisResponse::from_body(&body) {
                if parsed.error_message().is_some() {
                    return Ok(parsed);
                }
            }
            return Err(AnalysisError::TransportError(format!(
                "HTTP error! status: {}",
                status
            )));
        }

        AnalysisResponse::from_body(&body)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_from_config() {
        let config = AnalysisConfig {
            endpoint: " http://localhost:9000/ask ".to_string(),
            timeout_secs: 5,
            document_field: "contract".to_string(),
        };
        let transport = HttpAnalysisTransport::from_config(&config);
        assert_eq!(transport.endpoint(), "http://localhost:9000/ask");
        assert_eq!(transport.document_field(), "contract");
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_new_uses_default_field() {
        let transport = HttpAnalysisTransport::new("http://127.0.0.1:8002/ask")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(transport.document_field(), "pdf_file");
        assert_eq!(transport.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_mime_rejected() {
        let transport = HttpAnalysisTransport::new("http://127.0.0.1:8002/ask");
        let document = Document::new("f.pdf", vec![1]).with_content_type("not a mime");
        let err = transport.build_form("q", &document).unwrap_err();
        assert!(err.is_validation());
    }
}
