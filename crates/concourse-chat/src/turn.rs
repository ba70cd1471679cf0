//! The chat turn: one user message in, one assistant reply out

use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;
use tokio_stream::Stream;
use tracing::debug;

use concourse_ai::{
    CompletionProvider, CompletionRequest, Message, Role, StreamEvent, ToolSpec,
};

use crate::{
    error::{Error, Result},
    session::SessionHandle,
    store::SessionStore,
    tool::ToolCatalog,
};

/// A lazy, finite, non-restartable stream of cumulative reply snapshots
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Produces the assistant's reply for one user message.
///
/// Tool-augmented turns run at most one round of tool-call resolution:
/// model call, tool execution, one more model call without tool
/// declarations. Streaming turns never declare tools.
pub struct ChatTurn {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    system_prompt: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    catalog: ToolCatalog,
    session: Option<(SessionHandle, Arc<SessionStore>)>,
}

impl ChatTurn {
    /// Create a turn runner with an empty tool catalog
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            system_prompt: system_prompt.into(),
            temperature: None,
            max_tokens: None,
            catalog: ToolCatalog::new(),
            session: None,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the response length
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Attach a tool catalog
    pub fn with_catalog(mut self, catalog: ToolCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Attach a session so saved conversations grow with every turn
    pub fn with_session(mut self, handle: SessionHandle, store: Arc<SessionStore>) -> Self {
        self.session = Some((handle, store));
        self
    }

    /// The tool catalog in use
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    fn request(&self, messages: Vec<Message>, tools: Vec<ToolSpec>) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages,
            tools,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn build_sequence(&self, user_message: &str, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(history.iter().cloned());
        messages.push(Message::user(user_message));
        messages
    }

    /// Run one non-streaming turn and return the final assistant text.
    pub async fn respond(&self, user_message: &str, history: &[Message]) -> Result<String> {
        let mut messages = self.build_sequence(user_message, history);

        let first = self
            .provider
            .complete(self.request(messages.clone(), self.catalog.specs()))
            .await?;

        let answer = if first.has_tool_calls() {
            debug!(count = first.tool_calls.len(), "resolving tool calls");

            messages.push(Message::assistant_with_tool_calls(
                first.content.clone(),
                first.tool_calls.clone(),
            ));

            for call in &first.tool_calls {
                let tool = self
                    .catalog
                    .get(&call.name)
                    .ok_or_else(|| Error::UnknownTool(call.name.clone()))?;
                let args = self.catalog.parse_arguments(&call.name, &call.arguments)?;

                debug!(tool = %call.name, id = %call.id, "executing tool");
                let result = tool.execute(args).await;
                if result.is_error {
                    debug!(tool = %call.name, "tool reported an error result");
                }

                messages.push(Message::tool_result(&call.id, result.content));
            }

            // One round only: the second call carries no tool declarations,
            // and any tool calls it still requests are not acted upon.
            let second = self.provider.complete(self.request(messages, vec![])).await?;
            second.content
        } else {
            first.content
        };

        self.persist_turn(user_message, &answer)?;

        Ok(answer)
    }

    /// Run one streaming turn, yielding cumulative text snapshots.
    ///
    /// Fails with `StreamingUnsupported` when the catalog declares tools.
    pub async fn stream_response(
        &self,
        user_message: &str,
        history: &[Message],
    ) -> Result<SnapshotStream> {
        if !self.catalog.is_empty() {
            return Err(Error::StreamingUnsupported);
        }

        let messages = self.build_sequence(user_message, history);
        let mut events = self.provider.stream(self.request(messages, vec![])).await?;

        let session = self.session.clone();
        let user_message = user_message.to_string();

        Ok(Box::pin(stream! {
            let mut snapshot = String::new();

            while let Some(event) = events.next().await {
                match event {
                    StreamEvent::TextDelta { delta } => {
                        snapshot.push_str(&delta);
                        yield Ok(snapshot.clone());
                    }
                    StreamEvent::Done { content, .. } => {
                        if let Err(e) = persist_pair(&session, &user_message, &content) {
                            yield Err(e);
                        }
                        break;
                    }
                    StreamEvent::Error { message } => {
                        yield Err(Error::Provider(concourse_ai::Error::Sse(message)));
                        break;
                    }
                }
            }
        }))
    }

    fn persist_turn(&self, user_message: &str, answer: &str) -> Result<()> {
        persist_pair(&self.session, user_message, answer)
    }
}

/// Append the turn's (user, assistant) pair once the session is saved.
fn persist_pair(
    session: &Option<(SessionHandle, Arc<SessionStore>)>,
    user_message: &str,
    answer: &str,
) -> Result<()> {
    if let Some((handle, store)) = session {
        let state = handle.state();
        if state.is_saved {
            let id = state.id.to_string();
            store.append_message(&id, Role::User, user_message)?;
            store.append_message(&id, Role::Assistant, answer)?;
            debug!(session_id = %id, "turn appended to saved conversation");
        }
    }
    Ok(())
}
