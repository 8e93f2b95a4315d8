//! Generation service trait and implementations.
//!
//! The completion is modeled as a lazy, finite, non-restartable sequence of
//! text increments. `OpenAiGeneration` drives the OpenAI chat completions
//! endpoint with `stream: true` and decodes the SSE byte stream into deltas;
//! `MockGeneration` replays scripted chunks and records the message list it
//! was called with.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use lectern_core::error::LecternError;
use lectern_core::types::ConversationMessage;

/// A finite stream of incremental completion text.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String, LecternError>> + Send>>;

/// Service producing streamed chat completions.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Start a streamed completion for the given message list.
    ///
    /// The returned stream yields text increments in model emission order.
    /// An `Err` item terminates the stream; items already yielded are not
    /// retracted.
    async fn stream_complete(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<CompletionStream, LecternError>;
}

// ---------------------------------------------------------------------------
// OpenAiGeneration - streamed chat completions over SSE
// ---------------------------------------------------------------------------

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-backed streamed chat completion service.
#[derive(Debug, Clone)]
pub struct OpenAiGeneration {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiGeneration {
    pub fn new(api_key: String, model: String) -> Result<Self, LecternError> {
        // No overall timeout: a completion stream legitimately stays open for
        // the full generation. Connect failures still surface promptly.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LecternError::Generation(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ConversationMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// One decoded server-sent event line.
#[derive(Debug, PartialEq)]
enum SseEvent {
    /// Non-empty incremental text.
    Delta(String),
    /// The `[DONE]` terminator.
    Done,
    /// Comment, blank line, empty delta, or unparseable payload.
    Ignore,
}

/// Decode a single SSE line from the chat completions stream.
fn parse_sse_line(line: &str) -> SseEvent {
    let Some(payload) = line.strip_prefix("data:") else {
        return SseEvent::Ignore;
    };
    let payload = payload.trim();
    if payload == "[DONE]" {
        return SseEvent::Done;
    }
    match serde_json::from_str::<ChatChunk>(payload) {
        Ok(chunk) => {
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta.content)
                .unwrap_or_default();
            if content.is_empty() {
                SseEvent::Ignore
            } else {
                SseEvent::Delta(content)
            }
        }
        Err(_) => SseEvent::Ignore,
    }
}

struct SseDecoder {
    bytes: Pin<Box<dyn Stream<Item = reqwest::Result<bytes::Bytes>> + Send>>,
    buffer: String,
    ready: VecDeque<String>,
    finished: bool,
}

impl SseDecoder {
    fn decode_buffered_lines(&mut self) {
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            match parse_sse_line(line.trim_end()) {
                SseEvent::Delta(text) => self.ready.push_back(text),
                SseEvent::Done => self.finished = true,
                SseEvent::Ignore => {}
            }
        }
    }
}

#[async_trait]
impl GenerationService for OpenAiGeneration {
    async fn stream_complete(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<CompletionStream, LecternError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(self.api_key.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| LecternError::Generation(format!("completion request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(LecternError::Generation(format!(
                "completions API returned {}: {}",
                status, text
            )));
        }

        debug!(model = %self.model, count = messages.len(), "Completion stream opened");

        let decoder = SseDecoder {
            bytes: Box::pin(resp.bytes_stream()),
            buffer: String::new(),
            ready: VecDeque::new(),
            finished: false,
        };

        let stream = futures_util::stream::unfold(decoder, |mut decoder| async move {
            loop {
                if let Some(delta) = decoder.ready.pop_front() {
                    return Some((Ok(delta), decoder));
                }
                if decoder.finished {
                    return None;
                }
                match decoder.bytes.next().await {
                    Some(Ok(chunk)) => {
                        decoder.buffer.push_str(&String::from_utf8_lossy(&chunk));
                        decoder.decode_buffered_lines();
                    }
                    Some(Err(e)) => {
                        decoder.finished = true;
                        return Some((
                            Err(LecternError::Generation(format!(
                                "completion stream failed: {}",
                                e
                            ))),
                            decoder,
                        ));
                    }
                    None => return None,
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

// ---------------------------------------------------------------------------
// MockGeneration - scripted chunks for testing
// ---------------------------------------------------------------------------

/// Mock generation service replaying a fixed chunk sequence.
///
/// Records every message list passed to `stream_complete`, so tests can
/// assert on prompt assembly. An optional trailing error simulates a
/// mid-stream upstream failure.
#[derive(Debug, Default)]
pub struct MockGeneration {
    chunks: Vec<String>,
    trailing_error: Option<String>,
    calls: Mutex<Vec<Vec<ConversationMessage>>>,
}

impl MockGeneration {
    pub fn new(chunks: Vec<&str>) -> Self {
        Self {
            chunks: chunks.into_iter().map(String::from).collect(),
            trailing_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// After emitting all chunks, end the stream with an error.
    pub fn with_trailing_error(mut self, message: &str) -> Self {
        self.trailing_error = Some(message.to_string());
        self
    }

    /// The message list from the most recent `stream_complete` call.
    pub fn last_messages(&self) -> Option<Vec<ConversationMessage>> {
        self.calls
            .lock()
            .ok()
            .and_then(|calls| calls.last().cloned())
    }
}

#[async_trait]
impl GenerationService for MockGeneration {
    async fn stream_complete(
        &self,
        messages: &[ConversationMessage],
    ) -> Result<CompletionStream, LecternError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }

        let mut items: Vec<Result<String, LecternError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        if let Some(msg) = &self.trailing_error {
            items.push(Err(LecternError::Generation(msg.clone())));
        }

        Ok(Box::pin(futures_util::stream::iter(items)))
    }
}
