//! Session identity and shared in-memory conversation state

use concourse_ai::Role;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of the active session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    /// Session identifier, replaced wholesale on "start new"
    pub id: Uuid,
    /// Once true, every turn's user/assistant pair is appended to the store
    pub is_saved: bool,
}

impl SessionState {
    /// Create a fresh, unsaved session
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            is_saved: false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// One visible (role, content) pair of the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

struct Shared {
    state: SessionState,
    history: Vec<HistoryEntry>,
    reload_requested: bool,
}

/// Cloneable handle to the session state shared between the UI surface,
/// the chat turn, and the session tools.
///
/// The surface owns the lifecycle: it appends the (user, assistant) pair
/// after each turn and repopulates history when a load was requested.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Shared>>,
}

impl SessionHandle {
    /// Create a handle around a fresh session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Shared {
                state: SessionState::new(),
                history: vec![],
                reload_requested: false,
            })),
        }
    }

    /// Snapshot of the current session identity
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Replace the session identity
    pub fn set_state(&self, state: SessionState) {
        self.inner.lock().state = state;
    }

    /// Mark the current session as persisted
    pub fn mark_saved(&self) {
        self.inner.lock().state.is_saved = true;
    }

    /// Snapshot of the visible history
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.lock().history.clone()
    }

    /// Append one (role, content) pair to the visible history
    pub fn push_history(&self, role: Role, content: impl Into<String>) {
        self.inner.lock().history.push(HistoryEntry {
            role,
            content: content.into(),
        });
    }

    /// Replace the visible history wholesale
    pub fn replace_history(&self, history: Vec<HistoryEntry>) {
        self.inner.lock().history = history;
    }

    /// Discard the visible history (the surface's "clear" affordance)
    pub fn clear_history(&self) {
        self.inner.lock().history.clear();
    }

    /// Ask the surface to repopulate visible history from the store.
    ///
    /// Raised by `load_conversation`; the loaded history is deliberately not
    /// merged into the message sequence already in flight for the current
    /// turn.
    pub fn request_reload(&self) {
        self.inner.lock().reload_requested = true;
    }

    /// Consume a pending reload request, if any
    pub fn take_reload_request(&self) -> bool {
        std::mem::take(&mut self.inner.lock().reload_requested)
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}
