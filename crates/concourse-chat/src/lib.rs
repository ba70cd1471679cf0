//! concourse-chat: tool-augmented chat turns with session persistence
//!
//! The core contract is `ChatTurn`: given a user message and prior history,
//! produce the assistant's reply, executing at most one round of tool calls
//! along the way. Session tools persist conversations to a SQLite store.

pub mod error;
pub mod session;
pub mod store;
pub mod tool;
pub mod tools;
pub mod turn;

pub use error::{Error, Result};
pub use session::{HistoryEntry, SessionHandle, SessionState};
pub use store::{ConversationRecord, SessionStore, StoredMessage};
pub use tool::{Tool, ToolCatalog, ToolResult};
pub use turn::{ChatTurn, SnapshotStream};
