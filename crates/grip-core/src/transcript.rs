//! Chat transcript shown by the contract strategist

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use uuid::Uuid;

use crate::errors::AnalysisError;

pub const GREETING: &str = "Hello! I'm your Contract Strategist AI. I can help you analyze contracts, identify risks, suggest improvements, and optimize partnership terms. What would you like to work on today?";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, Default)]
pub enum Author {
    User,
    #[default]
    Strategist,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MessageType {
    #[default]
    Normal,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    pub message_type: MessageType,
    pub timestamp: DateTime<Local>,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        Message::new_with_type(author, MessageType::Normal, text)
    }

    pub fn new_with_type(author: Author, message_type: MessageType, text: &str) -> Message {
        Message {
            id: Uuid::new_v4(),
            author,
            text: text.replace('\t', "  "),
            message_type,
            timestamp: Local::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.message_type == MessageType::Error
    }

    /// `HH:MM:SS`, as shown next to each message.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Message for a failed submission, phrased for the chat view.
pub fn describe_failure(err: &AnalysisError) -> String {
    match err {
        AnalysisError::ApplicationError(msg) => format!("Server error: {}", msg),
        err if err.is_transport() => format!("Network error: {}", err.message()),
        other => other.message().to_string(),
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A transcript opened with the strategist's greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::new(Author::Strategist, GREETING)],
        }
    }

    pub fn push_user(&mut self, text: &str) -> &Message {
        self.push(Message::new(Author::User, text))
    }

    pub fn push_strategist(&mut self, text: &str) -> &Message {
        self.push(Message::new(Author::Strategist, text))
    }

    pub fn push_error(&mut self, err: &AnalysisError) -> &Message {
        self.push(Message::new_with_type(
            Author::Strategist,
            MessageType::Error,
            &describe_failure(err),
        ))
    }

    /// Record an upload the way the chat shows it.
    pub fn push_upload(&mut self, filename: &str, question: Option<&str>) -> &Message {
        let text = format!(
            "Uploaded contract: {}\nQuestion: {}",
            filename,
            question.filter(|q| !q.trim().is_empty()).unwrap_or("(no question)")
        );
        self.push_user(&text)
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        // just pushed
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
