//! concourse-ai: OpenAI-compatible chat completion client
//!
//! This crate speaks the chat-completions wire protocol of any
//! OpenAI-compatible endpoint: send a message sequence plus optional tool
//! declarations, get back text or tool-call requests, optionally as an SSE
//! stream of text deltas.

pub mod client;
pub mod error;
pub mod provider;
pub mod stream;
pub mod types;

pub use client::ChatClient;
pub use error::{Error, Result};
pub use provider::CompletionProvider;
pub use stream::{CompletionEventStream, StreamEvent};
pub use types::*;
