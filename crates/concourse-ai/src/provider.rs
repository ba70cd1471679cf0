//! Completion provider trait

use crate::{
    error::Result,
    stream::CompletionEventStream,
    types::{CompletionRequest, CompletionResponse},
};
use async_trait::async_trait;

/// Trait for completion providers.
///
/// `ChatClient` is the real implementation; tests substitute a scripted one.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Send a request and stream back text deltas.
    ///
    /// Callers must not declare tools on a streaming request.
    async fn stream(&self, request: CompletionRequest) -> Result<CompletionEventStream>;
}
