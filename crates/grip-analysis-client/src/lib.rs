//! Session client for the contract-analysis service
//!
//! The first question of a conversation uploads the contract; the service
//! answers with a session id that later questions reuse instead of sending the
//! document again. [`SessionClient`] owns that bookkeeping and is generic over
//! the transport, so the same state machine runs against the real HTTP
//! endpoint or an in-memory mock.

pub mod http_client;
pub mod session_client;

pub use grip_core::{
    AnalysisError, AnalysisSession, AnalysisTransport, Document, SessionState, SubmissionResult,
};
pub use http_client::HttpAnalysisTransport;
pub use session_client::{SessionClient, DEFAULT_TIMEOUT};

use grip_core::GripConfig;

pub type HttpSessionClient = SessionClient<HttpAnalysisTransport>;

/// Factory for creating SessionClient instances
pub struct AnalysisClientFactory;

impl AnalysisClientFactory {
    /// Create a client that talks to the configured HTTP endpoint
    pub fn create_http_client(config: &GripConfig) -> HttpSessionClient {
        log::info!("Analysis endpoint: {}", config.analysis.endpoint);
        Self::create_with_transport(HttpAnalysisTransport::from_config(&config.analysis), config)
    }

    /// Create a client over any transport, applying the configured limits
    pub fn create_with_transport<T: AnalysisTransport>(
        transport: T,
        config: &GripConfig,
    ) -> SessionClient<T> {
        SessionClient::new(transport)
            .with_timeout(config.analysis.timeout())
            .with_document_policy(config.documents.clone())
    }
}
