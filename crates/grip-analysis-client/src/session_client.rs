use grip_core::{
    AnalysisError, AnalysisResponse, AnalysisSession, AnalysisTransport, Document,
    DocumentPolicy, SessionState, SubmissionRequest, SubmissionResult,
};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives one analysis conversation.
///
/// `submit` takes `&mut self`, so a conversation can only have one request in
/// flight. Independent conversations each own their own client.
pub struct SessionClient<T: AnalysisTransport> {
    transport: T,
    session: AnalysisSession,
    timeout: Duration,
    policy: DocumentPolicy,
}

impl<T: AnalysisTransport> SessionClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: AnalysisSession::new(),
            timeout: DEFAULT_TIMEOUT,
            policy: DocumentPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_document_policy(mut self, policy: DocumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_session(mut self, session: AnalysisSession) -> Self {
        self.session = session;
        self
    }

    /// Ask a question, optionally attaching a (new) document.
    ///
    /// Never panics and never returns early with an error: every failure is a
    /// `SubmissionResult::Failure`, and a failure leaves the session untouched.
    pub async fn submit(&mut self, question: &str, document: Option<Document>) -> SubmissionResult {
        let request =
            match SubmissionRequest::build(question, document, self.session.session_id()) {
                Ok(request) => request,
                Err(err) => {
                    log::warn!("Rejected submission: {}", err);
                    return err.into();
                }
            };

        if let Some(document) = request.document() {
            if let Err(err) = document.check(&self.policy) {
                log::warn!("Rejected document {}: {}", document.filename, err);
                return err.into();
            }
        }

        let submitted_name = request.document().map(|d| d.filename.clone());
        match &submitted_name {
            Some(name) => log::info!(
                "Uploading {} to analysis service via {}",
                name,
                self.transport.name()
            ),
            None => log::info!(
                "Sending follow-up question for session {}",
                request.session_id().unwrap_or_default()
            ),
        }

        let analysis = match self.dispatch(&request).await {
            Ok(analysis) => analysis,
            Err(err) => {
                log::warn!("Submission failed: {}", err);
                return err.into();
            }
        };

        self.session.apply_success(
            analysis.session_id,
            analysis.filename,
            submitted_name.as_deref(),
        );
        log::debug!(
            "Submission succeeded; session {:?}, document {:?}",
            self.session.session_id(),
            self.session.active_document_name()
        );

        SubmissionResult::Success {
            advice: analysis.advice,
            session_id: self.session.session_id().map(str::to_string),
            document_name: self.session.active_document_name().map(str::to_string),
            sources: analysis.sources,
        }
    }

    /// Upload a document, asking the configured default question when none
    /// (or only whitespace) is given.
    pub async fn analyze_document(
        &mut self,
        document: Document,
        question: Option<&str>,
    ) -> SubmissionResult {
        let question = match question.map(str::trim).filter(|q| !q.is_empty()) {
            Some(question) => question.to_string(),
            None => self.policy.default_question.clone(),
        };
        self.submit(&question, Some(document)).await
    }

    /// Drop the active document label ahead of uploading a replacement.
    ///
    /// The session id is kept until a later successful response replaces it.
    pub fn reset_session(&mut self) {
        log::debug!(
            "Clearing active document {:?}; session id {:?} retained",
            self.session.active_document_name(),
            self.session.session_id()
        );
        self.session.reset();
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.session.session_id()
    }

    pub fn current_document_name(&self) -> Option<&str> {
        self.session.active_document_name()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn document_policy(&self) -> &DocumentPolicy {
        &self.policy
    }

    async fn dispatch(
        &self,
        request: &SubmissionRequest,
    ) -> Result<grip_core::Analysis, AnalysisError> {
        let response = tokio::time::timeout(self.timeout, self.transport.send(request))
            .await
            .map_err(|_| AnalysisError::Timeout)??;
        AnalysisResponse::into_analysis(response)
    }
}
