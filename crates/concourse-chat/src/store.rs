//! SQLite-backed conversation store

use parking_lot::Mutex;
use rusqlite::{Connection, params};
use tracing::info;

use concourse_ai::Role;

use crate::session::HistoryEntry;

/// A saved conversation, one row per save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRecord {
    pub session_id: String,
    pub name: String,
    pub summary: String,
    pub created_at: String,
}

/// One persisted message row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub role: Role,
    pub content: String,
}

/// Append-only store of conversations and their messages.
///
/// Statements are individually atomic; a whole turn is deliberately not
/// wrapped in a transaction.
pub struct SessionStore {
    conn: Mutex<Connection>,
}

impl SessionStore {
    /// Open or create the store at the given path
    pub fn open(path: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!(path = %path, "Session store opened");
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.lock().execute_batch(
            "CREATE TABLE IF NOT EXISTS conversations (
                session_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                summary TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )
    }

    /// Create (or overwrite) the conversation record and persist the given
    /// history as message rows.
    pub fn save_conversation(
        &self,
        session_id: &str,
        name: &str,
        summary: &str,
        history: &[HistoryEntry],
    ) -> rusqlite::Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        {
            let conn = self.conn.lock();
            conn.execute(
                "INSERT OR REPLACE INTO conversations (session_id, name, summary, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![session_id, name, summary, now],
            )?;
        }
        for entry in history {
            self.append_message(session_id, entry.role, &entry.content)?;
        }
        info!(session_id = %session_id, name = %name, "Conversation saved");
        Ok(())
    }

    /// Append one message row under a session
    pub fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> rusqlite::Result<()> {
        self.conn.lock().execute(
            "INSERT INTO messages (session_id, role, content, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session_id,
                role.as_str(),
                content,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// All saved conversations, newest first
    pub fn list_conversations(&self) -> rusqlite::Result<Vec<ConversationRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT session_id, name, summary, created_at
             FROM conversations ORDER BY created_at DESC, rowid DESC",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(ConversationRecord {
                    session_id: row.get(0)?,
                    name: row.get(1)?,
                    summary: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// Ordered messages of a session, as they were saved
    pub fn load_messages(&self, session_id: &str) -> rusqlite::Result<Vec<StoredMessage>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT role, content FROM messages WHERE session_id = ?1 ORDER BY id ASC",
        )?;

        let messages = stmt
            .query_map(params![session_id], |row| {
                let role: String = row.get(0)?;
                let content: String = row.get(1)?;
                Ok((role, content))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(role, content)| {
                Some(StoredMessage {
                    role: role.parse::<Role>().ok()?,
                    content,
                })
            })
            .collect();

        Ok(messages)
    }

    /// Number of message rows under a session
    pub fn count_messages(&self, session_id: &str) -> rusqlite::Result<usize> {
        let count: usize = self.conn.lock().query_row(
            "SELECT COUNT(*) FROM messages WHERE session_id = ?1",
            params![session_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry {
                role: Role::User,
                content: "How much to Paris?".into(),
            },
            HistoryEntry {
                role: Role::Assistant,
                content: "The price of a ticket to Paris is $899".into(),
            },
        ]
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = SessionStore::in_memory().unwrap();
        assert!(store.list_conversations().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_list() {
        let store = SessionStore::in_memory().unwrap();
        store
            .save_conversation("s1", "Paris trip", "Ticket pricing", &history())
            .unwrap();

        let records = store.list_conversations().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session_id, "s1");
        assert_eq!(records[0].name, "Paris trip");
        assert_eq!(records[0].summary, "Ticket pricing");
    }

    #[test]
    fn test_list_orders_newest_first() {
        let store = SessionStore::in_memory().unwrap();
        store.save_conversation("s1", "first", "a", &[]).unwrap();
        store.save_conversation("s2", "second", "b", &[]).unwrap();

        let records = store.list_conversations().unwrap();
        assert_eq!(records[0].name, "second");
        assert_eq!(records[1].name, "first");
    }

    #[test]
    fn test_messages_round_trip_in_order() {
        let store = SessionStore::in_memory().unwrap();
        let saved = history();
        store
            .save_conversation("s1", "Paris trip", "Ticket pricing", &saved)
            .unwrap();

        let loaded = store.load_messages("s1").unwrap();
        assert_eq!(loaded.len(), saved.len());
        for (stored, original) in loaded.iter().zip(&saved) {
            assert_eq!(stored.role, original.role);
            assert_eq!(stored.content, original.content);
        }
    }

    #[test]
    fn test_append_after_save() {
        let store = SessionStore::in_memory().unwrap();
        store
            .save_conversation("s1", "Paris trip", "Ticket pricing", &history())
            .unwrap();
        store
            .append_message("s1", Role::User, "And to Berlin?")
            .unwrap();
        store
            .append_message("s1", Role::Assistant, "The price of a ticket to Berlin is $499")
            .unwrap();

        let loaded = store.load_messages("s1").unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded[2].content, "And to Berlin?");
        assert_eq!(store.count_messages("s1").unwrap(), 4);
    }

    #[test]
    fn test_save_with_same_id_overwrites_record() {
        let store = SessionStore::in_memory().unwrap();
        store.save_conversation("s1", "old", "a", &[]).unwrap();
        store.save_conversation("s1", "new", "b", &[]).unwrap();

        let records = store.list_conversations().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "new");
    }
}
