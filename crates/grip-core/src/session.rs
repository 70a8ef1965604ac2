//! Per-conversation session state

use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SessionState {
    /// No session id has been issued yet; the next submission needs a document.
    Unbound,
    /// Follow-up questions can ride on the stored session id.
    Bound,
}

/// What the client remembers between submissions.
///
/// Only a successful response moves this forward. `reset` clears the document
/// label but keeps the session id until a new one arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSession {
    session_id: Option<String>,
    active_document_name: Option<String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a session whose id was issued earlier, e.g. by a previous run.
    pub fn resume(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            active_document_name: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn active_document_name(&self) -> Option<&str> {
        self.active_document_name.as_deref()
    }

    pub fn state(&self) -> SessionState {
        if self.session_id.is_some() {
            SessionState::Bound
        } else {
            SessionState::Unbound
        }
    }

    /// Record a successful response.
    ///
    /// A returned id or filename overwrites the stored one. Without a returned
    /// filename, the uploaded document's own name is used; a follow-up with
    /// neither leaves the label alone.
    pub fn apply_success(
        &mut self,
        session_id: Option<String>,
        filename: Option<String>,
        submitted_document: Option<&str>,
    ) {
        if let Some(id) = session_id {
            if self.session_id.as_deref() != Some(id.as_str()) {
                log::debug!("Session bound to id {}", id);
            }
            self.session_id = Some(id);
        }

        if let Some(name) = filename.or_else(|| submitted_document.map(str::to_string)) {
            self.active_document_name = Some(name);
        }
    }

    pub fn reset(&mut self) {
        self.active_document_name = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_unbound() {
        let session = AnalysisSession::new();
        assert_eq!(session.state(), SessionState::Unbound);
        assert_eq!(session.session_id(), None);
        assert_eq!(session.active_document_name(), None);
    }

    #[test]
    fn test_upload_binds_session() {
        let mut session = AnalysisSession::new();
        session.apply_success(Some("s1".into()), Some("f.pdf".into()), Some("local.pdf"));
        assert_eq!(session.state(), SessionState::Bound);
        assert_eq!(session.session_id(), Some("s1"));
        assert_eq!(session.active_document_name(), Some("f.pdf"));
    }

    #[test]
    fn test_falls_back_to_submitted_filename() {
        let mut session = AnalysisSession::new();
        session.apply_success(Some("s1".into()), None, Some("local.pdf"));
        assert_eq!(session.active_document_name(), Some("local.pdf"));
    }

    #[test]
    fn test_follow_up_keeps_document_name() {
        let mut session = AnalysisSession::new();
        session.apply_success(Some("s1".into()), Some("f.pdf".into()), None);
        session.apply_success(Some("s2".into()), None, None);
        assert_eq!(session.session_id(), Some("s2"));
        assert_eq!(session.active_document_name(), Some("f.pdf"));
    }

    #[test]
    fn test_reset_keeps_session_id() {
        let mut session = AnalysisSession::new();
        session.apply_success(Some("s1".into()), Some("f.pdf".into()), None);
        session.reset();
        assert_eq!(session.active_document_name(), None);
        assert_eq!(session.session_id(), Some("s1"));
        assert_eq!(session.state(), SessionState::Bound);
    }

    #[test]
    fn test_resume_is_bound_without_document() {
        let session = AnalysisSession::resume("s7");
        assert_eq!(session.state(), SessionState::Bound);
        assert_eq!(session.session_id(), Some("s7"));
        assert_eq!(session.active_document_name(), None);
    }

    #[test]
    fn test_reset_on_unbound_is_noop() {
        let mut session = AnalysisSession::new();
        session.reset();
        assert_eq!(session, AnalysisSession::new());
    }
}
