//! Core types for the Grip contract-analysis client.
//!
//! A user uploads a contract together with a question; the analysis service
//! answers and hands back a session id so later questions about the same
//! contract can skip the upload. This crate holds everything about that
//! exchange that does not depend on how bytes reach the service:
//!
//! - **Session state**: the session id and active document label
//! - **Submissions**: validation and the upload / follow-up encodings
//! - **Responses**: decoding and advice rendering
//! - **Transport seam**: the trait the HTTP client and test mocks implement
//! - **Configuration**: YAML loading with environment overrides
//! - **Transcript**: the chat history a presentation layer renders

pub mod config;
pub mod document;
pub mod errors;
pub mod response;
pub mod session;
pub mod submission;
pub mod transcript;
pub mod transport;

pub use config::*;
pub use document::Document;
pub use errors::AnalysisError;
pub use response::{Analysis, AnalysisResponse};
pub use session::{AnalysisSession, SessionState};
pub use submission::{SubmissionRequest, SubmissionResult};
pub use transcript::{Author, Message, MessageType, Transcript};
pub use transport::AnalysisTransport;
