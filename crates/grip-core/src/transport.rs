use async_trait::async_trait;

use crate::errors::AnalysisError;
use crate::response::AnalysisResponse;
use crate::submission::SubmissionRequest;

/// Carries one submission to the analysis service.
///
/// Implementations return the decoded response whenever the service answered
/// with a body, including bodies that report an `error`; interpreting that
/// field is left to the session client.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn send(&self, request: &SubmissionRequest) -> Result<AnalysisResponse, AnalysisError>;

    /// Short label for logs.
    fn name(&self) -> &str {
        "transport"
    }
}
