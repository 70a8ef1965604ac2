//! One-shot question mode

use grip_analysis_client::SessionClient;
use grip_core::{AnalysisError, AnalysisTransport, Document, SubmissionResult};

use crate::chat::format_sources;

#[derive(Debug, Clone, PartialEq)]
pub struct AskOutput {
    pub advice: String,
    pub sources: Vec<String>,
    pub session_id: Option<String>,
    pub document_name: Option<String>,
}

impl AskOutput {
    /// Session line printed on stderr so scripts can chain follow-ups.
    pub fn session_line(&self) -> String {
        let mut line = format!("session: {}", self.session_id.as_deref().unwrap_or("(none)"));
        if let Some(name) = &self.document_name {
            line.push_str(&format!(" (document: {})", name));
        }
        line
    }
}

/// Ask one question. With a document and no question, the default question
/// is used.
pub async fn run_ask<T: AnalysisTransport>(
    client: &mut SessionClient<T>,
    document: Option<Document>,
    question: &str,
) -> Result<AskOutput, AnalysisError> {
    let result = match document {
        Some(document) if question.trim().is_empty() => {
            client.analyze_document(document, None).await
        }
        document => client.submit(question, document).await,
    };

    match result {
        SubmissionResult::Success {
            advice,
            session_id,
            document_name,
            sources,
        } => Ok(AskOutput {
            advice,
            sources: format_sources(&sources),
            session_id,
            document_name,
        }),
        SubmissionResult::Failure(err) => Err(err),
    }
}
