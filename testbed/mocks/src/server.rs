//! A local HTTP stand-in for the analysis service
//!
//! Accepts both encodings on `POST /ask`, records what arrived, and answers
//! with scripted replies in order.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(body: Value) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    /// A reply whose body is sent verbatim, e.g. an HTML error page.
    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFile {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedRequest {
    pub content_type: String,
    pub question: Option<String>,
    pub session_id: Option<String>,
    pub files: Vec<RecordedFile>,
}

impl RecordedRequest {
    pub fn is_multipart(&self) -> bool {
        self.content_type.starts_with("multipart/form-data")
    }

    pub fn is_json(&self) -> bool {
        self.content_type.starts_with("application/json")
    }
}

#[derive(Clone)]
struct MockServerState {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn ask_handler(State(state): State<MockServerState>, request: Request) -> Response {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let recorded = if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(request, &state).await {
            Ok(multipart) => read_multipart(content_type, multipart).await,
            Err(rejection) => return rejection.into_response(),
        }
    } else {
        match Bytes::from_request(request, &state).await {
            Ok(body) => Ok(read_json(content_type, &body)),
            Err(rejection) => return rejection.into_response(),
        }
    };

    let recorded = match recorded {
        Ok(recorded) => recorded,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };
    log::debug!("Mock analysis server received: {:?}", recorded);
    state.requests.lock().unwrap().push(recorded);

    let reply = state.replies.lock().unwrap().pop_front();
    match reply {
        Some(reply) => {
            if let Some(delay) = reply.delay {
                tokio::time::sleep(delay).await;
            }
            let status =
                StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(CONTENT_TYPE, "application/json")], reply.body).into_response()
        }
        None => {
            log::error!("Mock analysis server ran out of replies!");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

async fn read_multipart(
    content_type: String,
    mut multipart: Multipart,
) -> Result<RecordedRequest, String> {
    let mut recorded = RecordedRequest {
        content_type,
        ..Default::default()
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let field_type = field.content_type().map(str::to_string);

        if filename.is_some() {
            let data = field.bytes().await.map_err(|e| e.to_string())?;
            recorded.files.push(RecordedFile {
                field: name,
                filename,
                content_type: field_type,
                len: data.len(),
            });
        } else {
            let text = field.text().await.map_err(|e| e.to_string())?;
            match name.as_str() {
                "question" => recorded.question = Some(text),
                "session_id" => recorded.session_id = Some(text),
                other => log::warn!("Mock analysis server ignoring field {}", other),
            }
        }
    }

    Ok(recorded)
}

fn read_json(content_type: String, body: &[u8]) -> RecordedRequest {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    RecordedRequest {
        content_type,
        question: value["question"].as_str().map(str::to_string),
        session_id: value["session_id"].as_str().map(str::to_string),
        files: Vec::new(),
    }
}

pub struct MockAnalysisServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockAnalysisServer {
    pub async fn start(replies: Vec<MockReply>) -> Self {
        let state = MockServerState {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let replies = state.replies.clone();
        let requests = state.requests.clone();

        let app = Router::new()
            .route("/ask", post(ask_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock server to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock analysis server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock analysis server error: {}", e);
                });
        });

        MockAnalysisServer {
            addr,
            shutdown_tx,
            replies,
            requests,
        }
    }

    /// Full URL of the `/ask` route.
    pub fn endpoint(&self) -> String {
        format!("http://{}/ask", self.addr)
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock analysis server already stopped.");
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
