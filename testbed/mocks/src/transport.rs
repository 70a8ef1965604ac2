//! Scripted in-memory transport

use async_trait::async_trait;
use grip_core::{AnalysisError, AnalysisResponse, AnalysisTransport, SubmissionRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A transport that replays queued replies and records every request.
///
/// Clones share the same queue and log, so a test can keep a handle after
/// moving the transport into a client.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Result<AnalysisResponse, AnalysisError>>>>,
    requests: Arc<Mutex<Vec<SubmissionRequest>>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<Result<AnalysisResponse, AnalysisError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Default::default()
        }
    }

    /// Wait this long before answering, to exercise client timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_reply(&self, reply: Result<AnalysisResponse, AnalysisError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<SubmissionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalysisTransport for MockTransport {
    async fn send(&self, request: &SubmissionRequest) -> Result<AnalysisResponse, AnalysisError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| {
            Err(AnalysisError::TransportError(
                "mock transport ran out of replies".to_string(),
            ))
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
