//! Session management tools: save, list, load, start new

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::session::{SessionHandle, SessionState};
use crate::store::SessionStore;
use crate::tool::{Tool, ToolResult};

/// Notice returned when saving an already-saved conversation.
pub const ALREADY_SAVED_NOTICE: &str = "This conversation is already saved.";

/// Sentinel returned by `list_conversations` on an empty store.
pub const NO_SAVED_CONVERSATIONS: &str = "No saved conversations.";

/// Notice returned for an out-of-range conversation index.
pub const INVALID_INDEX_NOTICE: &str = "No conversation found at that position.";

fn empty_object_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

/// Persist the current conversation under a name and summary.
///
/// Saving is idempotent per session: once `is_saved` is set, further calls
/// return the already-saved notice without touching the store.
pub struct SaveConversationTool {
    handle: SessionHandle,
    store: Arc<SessionStore>,
}

impl SaveConversationTool {
    pub fn new(handle: SessionHandle, store: Arc<SessionStore>) -> Self {
        Self { handle, store }
    }
}

#[async_trait]
impl Tool for SaveConversationTool {
    fn name(&self) -> &str {
        "save_conversation"
    }

    fn description(&self) -> &str {
        "Save the current conversation so it can be resumed later."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "A short name for the conversation",
                },
                "summary": {
                    "type": "string",
                    "description": "A one-sentence summary of the conversation",
                },
            },
            "required": ["name", "summary"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        if self.handle.state().is_saved {
            return ToolResult::text(ALREADY_SAVED_NOTICE);
        }

        let name = arguments
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let summary = arguments
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let session_id = self.handle.state().id.to_string();
        let history = self.handle.history();
        if let Err(e) = self
            .store
            .save_conversation(&session_id, name, summary, &history)
        {
            return ToolResult::error(format!("Failed to save conversation: {}", e));
        }

        self.handle.mark_saved();
        ToolResult::text(format!("Conversation saved as '{}'.", name))
    }
}

/// List saved conversations, newest first, as a numbered list.
pub struct ListConversationsTool {
    store: Arc<SessionStore>,
}

impl ListConversationsTool {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListConversationsTool {
    fn name(&self) -> &str {
        "list_conversations"
    }

    fn description(&self) -> &str {
        "List all saved conversations, most recent first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        empty_object_schema()
    }

    async fn execute(&self, _arguments: serde_json::Value) -> ToolResult {
        let records = match self.store.list_conversations() {
            Ok(records) => records,
            Err(e) => return ToolResult::error(format!("Failed to list conversations: {}", e)),
        };

        if records.is_empty() {
            return ToolResult::text(NO_SAVED_CONVERSATIONS);
        }

        let lines: Vec<String> = records
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {} — {}", i + 1, r.name, r.summary))
            .collect();
        ToolResult::text(lines.join("\n"))
    }
}

/// Switch the active session to a previously saved conversation.
///
/// The index is 1-based into the list `list_conversations` produces. On
/// success the session id is swapped and a reload is requested so the
/// surface repopulates visible history from the store; the loaded history
/// is not injected into the turn already in flight.
pub struct LoadConversationTool {
    handle: SessionHandle,
    store: Arc<SessionStore>,
}

impl LoadConversationTool {
    pub fn new(handle: SessionHandle, store: Arc<SessionStore>) -> Self {
        Self { handle, store }
    }
}

#[async_trait]
impl Tool for LoadConversationTool {
    fn name(&self) -> &str {
        "load_conversation"
    }

    fn description(&self) -> &str {
        "Load a saved conversation by its position in the conversation list."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "index": {
                    "type": "integer",
                    "description": "1-based position in the saved conversation list",
                },
            },
            "required": ["index"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> ToolResult {
        let index = arguments.get("index").and_then(|v| v.as_i64()).unwrap_or(0);

        let records = match self.store.list_conversations() {
            Ok(records) => records,
            Err(e) => return ToolResult::error(format!("Failed to list conversations: {}", e)),
        };

        if index < 1 || index as usize > records.len() {
            return ToolResult::text(INVALID_INDEX_NOTICE);
        }
        let record = &records[index as usize - 1];

        let id = match uuid::Uuid::parse_str(&record.session_id) {
            Ok(id) => id,
            Err(e) => {
                return ToolResult::error(format!(
                    "Stored session id '{}' is not a UUID: {}",
                    record.session_id, e
                ));
            }
        };

        self.handle.set_state(SessionState { id, is_saved: true });
        self.handle.request_reload();
        debug!(session_id = %record.session_id, name = %record.name, "conversation loaded");

        ToolResult::text(format!("Loaded conversation '{}'.", record.name))
    }
}

/// Start a fresh, unsaved session.
///
/// Only the session identity changes; neither the store nor the visible
/// history is touched.
pub struct StartNewConversationTool {
    handle: SessionHandle,
}

impl StartNewConversationTool {
    pub fn new(handle: SessionHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl Tool for StartNewConversationTool {
    fn name(&self) -> &str {
        "start_new_conversation"
    }

    fn description(&self) -> &str {
        "Start a new conversation with a fresh session."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        empty_object_schema()
    }

    async fn execute(&self, _arguments: serde_json::Value) -> ToolResult {
        self.handle.set_state(SessionState::new());
        ToolResult::text("Started a new conversation.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concourse_ai::Role;

    fn setup() -> (SessionHandle, Arc<SessionStore>) {
        let handle = SessionHandle::new();
        handle.push_history(Role::User, "How much to Paris?");
        handle.push_history(Role::Assistant, "The price of a ticket to Paris is $899");
        (handle, Arc::new(SessionStore::in_memory().unwrap()))
    }

    fn save_args(name: &str, summary: &str) -> serde_json::Value {
        serde_json::json!({ "name": name, "summary": summary })
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let (_, store) = setup();
        let result = ListConversationsTool::new(store)
            .execute(serde_json::json!({}))
            .await;
        assert_eq!(result.content, NO_SAVED_CONVERSATIONS);
    }

    #[tokio::test]
    async fn test_save_then_list_line_format() {
        let (handle, store) = setup();
        let result = SaveConversationTool::new(handle, store.clone())
            .execute(save_args("N1", "S1"))
            .await;
        assert_eq!(result.content, "Conversation saved as 'N1'.");

        let listed = ListConversationsTool::new(store)
            .execute(serde_json::json!({}))
            .await;
        assert_eq!(listed.content, "1. N1 — S1");
    }

    #[tokio::test]
    async fn test_save_persists_prior_history() {
        let (handle, store) = setup();
        let id = handle.state().id.to_string();
        SaveConversationTool::new(handle, store.clone())
            .execute(save_args("N1", "S1"))
            .await;

        let rows = store.load_messages(&id).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].role, Role::User);
        assert_eq!(rows[0].content, "How much to Paris?");
        assert_eq!(rows[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_second_save_is_a_noop() {
        let (handle, store) = setup();
        let tool = SaveConversationTool::new(handle.clone(), store.clone());
        tool.execute(save_args("N1", "S1")).await;
        let id = handle.state().id.to_string();
        let rows_before = store.count_messages(&id).unwrap();

        let second = tool.execute(save_args("N2", "S2")).await;
        assert_eq!(second.content, ALREADY_SAVED_NOTICE);
        assert_eq!(store.count_messages(&id).unwrap(), rows_before);
        assert_eq!(store.list_conversations().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_invalid_index_leaves_state_unchanged() {
        let (handle, store) = setup();
        SaveConversationTool::new(handle.clone(), store.clone())
            .execute(save_args("N1", "S1"))
            .await;
        let state_before = handle.state();

        let tool = LoadConversationTool::new(handle.clone(), store);
        for index in [0i64, -1, 2] {
            let result = tool.execute(serde_json::json!({ "index": index })).await;
            assert_eq!(result.content, INVALID_INDEX_NOTICE);
            assert!(!result.is_error);
        }
        assert_eq!(handle.state(), state_before);
        assert!(!handle.take_reload_request());
    }

    #[tokio::test]
    async fn test_load_swaps_session_and_requests_reload() {
        let (saved_handle, store) = setup();
        let saved_id = saved_handle.state().id;
        SaveConversationTool::new(saved_handle, store.clone())
            .execute(save_args("N1", "S1"))
            .await;

        let fresh = SessionHandle::new();
        let result = LoadConversationTool::new(fresh.clone(), store)
            .execute(serde_json::json!({ "index": 1 }))
            .await;

        assert_eq!(result.content, "Loaded conversation 'N1'.");
        assert_eq!(fresh.state().id, saved_id);
        assert!(fresh.state().is_saved);
        assert!(fresh.take_reload_request());
    }

    #[tokio::test]
    async fn test_load_picks_newest_first_ordering() {
        let (handle_a, store) = setup();
        SaveConversationTool::new(handle_a, store.clone())
            .execute(save_args("older", "a"))
            .await;

        let handle_b = SessionHandle::new();
        let newer_id = handle_b.state().id;
        SaveConversationTool::new(handle_b, store.clone())
            .execute(save_args("newer", "b"))
            .await;

        let fresh = SessionHandle::new();
        let result = LoadConversationTool::new(fresh.clone(), store)
            .execute(serde_json::json!({ "index": 1 }))
            .await;
        assert_eq!(result.content, "Loaded conversation 'newer'.");
        assert_eq!(fresh.state().id, newer_id);
    }

    #[tokio::test]
    async fn test_start_new_resets_identity_even_after_save() {
        let (handle, store) = setup();
        SaveConversationTool::new(handle.clone(), store.clone())
            .execute(save_args("N1", "S1"))
            .await;
        let saved_id = handle.state().id;
        assert!(handle.state().is_saved);

        StartNewConversationTool::new(handle.clone())
            .execute(serde_json::json!({}))
            .await;

        assert_ne!(handle.state().id, saved_id);
        assert!(!handle.state().is_saved);
        // The store is untouched.
        assert_eq!(store.list_conversations().unwrap().len(), 1);
        // The visible history is untouched too.
        assert_eq!(handle.history().len(), 2);
    }

    #[tokio::test]
    async fn test_round_trip_save_then_load_messages() {
        let (handle, store) = setup();
        let visible = handle.history();
        let id = handle.state().id.to_string();
        SaveConversationTool::new(handle, store.clone())
            .execute(save_args("N1", "S1"))
            .await;

        let reloaded = store.load_messages(&id).unwrap();
        let pairs: Vec<(Role, String)> = reloaded
            .into_iter()
            .map(|m| (m.role, m.content))
            .collect();
        let expected: Vec<(Role, String)> = visible
            .into_iter()
            .map(|e| (e.role, e.content))
            .collect();
        assert_eq!(pairs, expected);
    }
}
