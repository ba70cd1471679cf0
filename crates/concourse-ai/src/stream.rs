//! Streaming event types

use crate::types::{FinishReason, Usage};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_stream::Stream;

/// Events emitted while streaming a completion.
///
/// Streaming requests never declare tools, so there are no tool-call events:
/// the stream is text deltas followed by exactly one terminal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text fragment
    TextDelta { delta: String },
    /// Stream completed; `content` is the full accumulated text
    Done {
        content: String,
        finish_reason: FinishReason,
        usage: Usage,
    },
    /// Stream failed
    Error { message: String },
}

impl StreamEvent {
    /// Check if this is a terminal event (Done or Error)
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done { .. } | StreamEvent::Error { .. })
    }
}

/// A finite, non-restartable stream of completion events
pub type CompletionEventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;
