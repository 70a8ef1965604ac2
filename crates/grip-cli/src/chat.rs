//! Interactive contract-strategist chat
//!
//! Each input line becomes a [`ChatCommand`]; the [`ChatShell`] runs it
//! against its session client and records the exchange in a transcript.

use grip_analysis_client::SessionClient;
use grip_core::{AnalysisTransport, Author, Document, Message, SubmissionResult, Transcript};
use std::path::PathBuf;
use strum_macros::{Display, EnumIter};

pub const HELP: &str = "Commands:
  <question>                 ask about the active contract
  /upload <path> [question]  analyze a new contract
  /replace                   clear the active contract before uploading another
  /risks /optimize /compliance  quick actions
  /session                   show the session id and active contract
  /help                      show this help
  /quit                      leave the chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum QuickAction {
    Risks,
    Optimize,
    Compliance,
}

impl QuickAction {
    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::Risks => {
                "Please review the current risk alerts and provide recommendations."
            }
            QuickAction::Optimize => {
                "Can you generate an optimization report for our contract portfolio?"
            }
            QuickAction::Compliance => "I need to run a compliance check on our active contracts.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Ask(String),
    Upload {
        path: PathBuf,
        question: Option<String>,
    },
    Replace,
    Quick(QuickAction),
    Session,
    Help,
    Quit,
    Empty,
}

impl ChatCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ChatCommand::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(ChatCommand::Ask(line.to_string()));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name {
            "upload" => {
                if args.is_empty() {
                    return Err("Usage: /upload <path> [question]".to_string());
                }
                let (path, question) = match args.split_once(char::is_whitespace) {
                    Some((path, question)) => (path, Some(question.trim().to_string())),
                    None => (args, None),
                };
                Ok(ChatCommand::Upload {
                    path: PathBuf::from(path),
                    question: question.filter(|q| !q.is_empty()),
                })
            }
            "replace" => Ok(ChatCommand::Replace),
            "risks" => Ok(ChatCommand::Quick(QuickAction::Risks)),
            "optimize" => Ok(ChatCommand::Quick(QuickAction::Optimize)),
            "compliance" => Ok(ChatCommand::Quick(QuickAction::Compliance)),
            "session" => Ok(ChatCommand::Session),
            "help" | "?" => Ok(ChatCommand::Help),
            "quit" | "exit" | "q" => Ok(ChatCommand::Quit),
            other => Err(format!("Unknown command /{}. Type /help for commands.", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFlow {
    Continue,
    Quit,
}

type Notifier = Box<dyn Fn(&str) + Send + Sync>;

pub struct ChatShell<T: AnalysisTransport> {
    client: SessionClient<T>,
    transcript: Transcript,
    notify: Option<Notifier>,
}

impl<T: AnalysisTransport> ChatShell<T> {
    pub fn new(client: SessionClient<T>) -> Self {
        Self {
            client,
            transcript: Transcript::new(),
            notify: None,
        }
    }

    /// Receive progress notices (e.g. "Analyzing ...") as they happen,
    /// before the exchange they belong to is finished.
    pub fn with_notifier(mut self, notify: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.notify = Some(Box::new(notify));
        self
    }

    pub fn client(&self) -> &SessionClient<T> {
        &self.client
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn handle_line(&mut self, line: &str) -> ChatFlow {
        match ChatCommand::parse(line) {
            Ok(command) => self.handle(command).await,
            Err(usage) => {
                self.transcript.push_strategist(&usage);
                ChatFlow::Continue
            }
        }
    }

    pub async fn handle(&mut self, command: ChatCommand) -> ChatFlow {
        match command {
            ChatCommand::Empty => {}
            ChatCommand::Quit => return ChatFlow::Quit,
            ChatCommand::Help => {
                self.transcript.push_strategist(HELP);
            }
            ChatCommand::Session => {
                let text = self.session_summary();
                self.transcript.push_strategist(&text);
            }
            ChatCommand::Replace => {
                self.client.reset_session();
                self.transcript
                    .push_strategist("Active contract cleared. Upload a replacement with /upload <path>.");
            }
            ChatCommand::Ask(question) => self.ask(&question).await,
            ChatCommand::Quick(action) => self.ask(action.prompt()).await,
            ChatCommand::Upload { path, question } => self.upload(path, question).await,
        }
        ChatFlow::Continue
    }

    pub fn session_summary(&self) -> String {
        format!(
            "Session: {}\nActive contract: {}",
            self.client.current_session_id().unwrap_or("(none)"),
            self.client.current_document_name().unwrap_or("(none)")
        )
    }

    async fn ask(&mut self, question: &str) {
        self.transcript.push_user(question);
        let result = self.client.submit(question, None).await;
        self.record(result);
    }

    async fn upload(&mut self, path: PathBuf, question: Option<String>) {
        let document = match Document::from_path(&path).await {
            Ok(document) => document,
            Err(err) => {
                self.transcript.push_error(&err);
                return;
            }
        };

        self.transcript
            .push_upload(&document.filename, question.as_deref());
        if let Some(notify) = &self.notify {
            if document.check(self.client.document_policy()).is_ok() {
                notify(&analyzing_notice(&document));
            }
        }
        let result = self
            .client
            .analyze_document(document, question.as_deref())
            .await;
        self.record(result);
    }

    fn record(&mut self, result: SubmissionResult) {
        match result {
            SubmissionResult::Success {
                advice, sources, ..
            } => {
                let mut text = advice;
                let sources = format_sources(&sources);
                if !sources.is_empty() {
                    text.push_str("\n\nSources Referenced:\n");
                    text.push_str(&sources.join("\n"));
                }
                self.transcript.push_strategist(&text);
            }
            SubmissionResult::Failure(err) => {
                self.transcript.push_error(&err);
            }
        }
    }
}

pub fn analyzing_notice(document: &Document) -> String {
    format!(
        "Analyzing {} ({})... This may take a moment.",
        document.filename,
        document.display_size()
    )
}

pub fn format_sources(sources: &[serde_json::Value]) -> Vec<String> {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| {
            format!(
                "Source {}: {}",
                index + 1,
                grip_core::response::render_text(source)
            )
        })
        .collect()
}

pub fn render_message(message: &Message) -> String {
    let author = match message.author {
        Author::User => "You",
        Author::Strategist => "Strategist",
    };
    let marker = if message.is_error() { " [error]" } else { "" };
    format!(
        "[{}] {}{}: {}",
        message.time_label(),
        author,
        marker,
        message.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_plain_question() {
        assert_eq!(
            ChatCommand::parse("  What are my termination options? "),
            Ok(ChatCommand::Ask("What are my termination options?".to_string()))
        );
        assert_eq!(ChatCommand::parse("   "), Ok(ChatCommand::Empty));
    }

    #[test]
    fn test_parse_upload() {
        assert_eq!(
            ChatCommand::parse("/upload lease.pdf What should I negotiate?"),
            Ok(ChatCommand::Upload {
                path: PathBuf::from("lease.pdf"),
                question: Some("What should I negotiate?".to_string()),
            })
        );
        assert_eq!(
            ChatCommand::parse("/upload lease.pdf"),
            Ok(ChatCommand::Upload {
                path: PathBuf::from("lease.pdf"),
                question: None,
            })
        );
        assert!(ChatCommand::parse("/upload").is_err());
    }

    #[test]
    fn test_parse_quick_actions() {
        for action in QuickAction::iter() {
            let line = format!("/{}", action);
            assert_eq!(ChatCommand::parse(&line), Ok(ChatCommand::Quick(action)));
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = ChatCommand::parse("/dance").unwrap_err();
        assert!(err.contains("/dance"));
    }

    #[test]
    fn test_format_sources() {
        let sources = vec![serde_json::json!({"page": 2}), serde_json::json!("appendix")];
        assert_eq!(
            format_sources(&sources),
            vec![
                "Source 1: {\n  \"page\": 2\n}".to_string(),
                "Source 2: appendix".to_string()
            ]
        );
    }

    #[test]
    fn test_analyzing_notice_shows_size() {
        let document = Document::new("lease.pdf", vec![0; 1536]);
        assert_eq!(
            analyzing_notice(&document),
            "Analyzing lease.pdf (1.5 KB)... This may take a moment."
        );
    }

    #[test]
    fn test_render_error_message() {
        let message = Message::new_with_type(
            Author::Strategist,
            grip_core::MessageType::Error,
            "Server error: bad pdf",
        );
        let rendered = render_message(&message);
        assert!(rendered.ends_with("Strategist [error]: Server error: bad pdf"));
    }
}
