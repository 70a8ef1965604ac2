//! Outbound submissions and their results

use crate::document::Document;
use crate::errors::AnalysisError;
use serde::Serialize;
use serde_json::Value;

/// One request to the analysis endpoint.
///
/// The first question of a session carries the document and goes out as a
/// multipart upload; follow-ups carry only the session id and go out as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRequest {
    Upload { question: String, document: Document },
    FollowUp { question: String, session_id: String },
}

/// JSON body of a follow-up question.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FollowUpBody<'a> {
    pub question: &'a str,
    pub session_id: &'a str,
}

impl SubmissionRequest {
    /// Validate the caller's input and pick the encoding.
    ///
    /// A supplied document always wins over an existing session id, which is
    /// how a caller replaces the active contract.
    pub fn build(
        question: &str,
        document: Option<Document>,
        session_id: Option<&str>,
    ) -> Result<Self, AnalysisError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AnalysisError::ValidationError(
                "Please enter a question.".to_string(),
            ));
        }

        match (document, session_id) {
            (Some(document), _) => Ok(SubmissionRequest::Upload {
                question: question.to_string(),
                document,
            }),
            (None, Some(session_id)) => Ok(SubmissionRequest::FollowUp {
                question: question.to_string(),
                session_id: session_id.to_string(),
            }),
            (None, None) => Err(AnalysisError::ValidationError(
                "Please upload a PDF contract before asking a question.".to_string(),
            )),
        }
    }

    pub fn question(&self) -> &str {
        match self {
            SubmissionRequest::Upload { question, .. }
            | SubmissionRequest::FollowUp { question, .. } => question,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        match self {
            SubmissionRequest::Upload { document, .. } => Some(document),
            SubmissionRequest::FollowUp { .. } => None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            SubmissionRequest::Upload { .. } => None,
            SubmissionRequest::FollowUp { session_id, .. } => Some(session_id),
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, SubmissionRequest::Upload { .. })
    }

    /// Body for the JSON encoding; `None` for uploads.
    pub fn follow_up_body(&self) -> Option<FollowUpBody<'_>> {
        match self {
            SubmissionRequest::FollowUp {
                question,
                session_id,
            } => Some(FollowUpBody {
                question,
                session_id,
            }),
            SubmissionRequest::Upload { .. } => None,
        }
    }
}

/// Outcome of `submit`, returned as a value in every case.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    /// `session_id` and `document_name` are the session's values after the
    /// response was applied.
    Success {
        advice: String,
        session_id: Option<String>,
        document_name: Option<String>,
        sources: Vec<Value>,
    },
    Failure(AnalysisError),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success { .. })
    }

    pub fn advice(&self) -> Option<&str> {
        match self {
            SubmissionResult::Success { advice, .. } => Some(advice),
            SubmissionResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&AnalysisError> {
        match self {
            SubmissionResult::Failure(err) => Some(err),
            SubmissionResult::Success { .. } => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure().map(AnalysisError::message)
    }
}

impl From<AnalysisError> for SubmissionResult {
    fn from(err: AnalysisError) -> Self {
        SubmissionResult::Failure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> Document {
        Document::new("f.pdf", b"%PDF-1.4".to_vec())
    }

    #[test]
    fn test_blank_question_rejected() {
        for question in ["", "   ", "\n\t"] {
            let err = SubmissionRequest::build(question, Some(pdf()), None).unwrap_err();
            assert!(err.is_validation(), "{question:?} should be rejected");
        }
    }

    #[test]
    fn test_missing_document_and_session_rejected() {
        let err = SubmissionRequest::build("What are the risks?", None, None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_document_selects_upload() {
        let request = SubmissionRequest::build("  risks?  ", Some(pdf()), Some("s1")).unwrap();
        assert!(request.is_upload());
        assert_eq!(request.question(), "risks?");
        assert_eq!(request.session_id(), None);
        assert_eq!(request.document().map(|d| d.filename.as_str()), Some("f.pdf"));
        assert!(request.follow_up_body().is_none());
    }

    #[test]
    fn test_session_selects_follow_up() {
        let request = SubmissionRequest::build("termination?", None, Some("s1")).unwrap();
        let body = serde_json::to_value(request.follow_up_body().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"question": "termination?", "session_id": "s1"})
        );
    }

    #[test]
    fn test_result_accessors() {
        let ok = SubmissionResult::Success {
            advice: "X".into(),
            session_id: Some("s1".into()),
            document_name: None,
            sources: Vec::new(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.advice(), Some("X"));
        assert_eq!(ok.failure_message(), None);

        let failed: SubmissionResult = AnalysisError::ApplicationError("bad pdf".into()).into();
        assert_eq!(failed.failure_message(), Some("bad pdf"));
        assert!(!failed.is_success());
        assert_eq!(failed.advice(), None);
    }
}
