//! In-memory, per-session conversation history.
//!
//! Sessions are created lazily on first reference and live for the process
//! lifetime; transcripts are append-only and insertion order is
//! chronological order.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: usize,
}

#[derive(Debug)]
struct Session {
    turns: Vec<Turn>,
    created_at: String,
    updated_at: String,
}

impl Session {
    fn new() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            turns: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Store handle shared by every front-end. The store-wide lock keeps
/// concurrent appends for distinct sessions from corrupting the map and
/// serializes appends to the same session; interleaving of whole exchanges
/// from simultaneous callers on one session is left to the callers.
#[derive(Clone)]
pub struct HistoryStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    max_turns: usize,
}

impl HistoryStore {
    /// `max_turns` of 0 keeps every turn; a positive value retains only the
    /// newest N turns per session.
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_turns,
        }
    }

    /// Registers an empty session on first reference. Never fails.
    pub async fn get_or_create(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);
    }

    /// Appends a turn in call order, creating the session if needed.
    pub async fn append(&self, session_id: &str, role: Role, content: &str) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(Session::new);

        let now = Utc::now().to_rfc3339();
        session.turns.push(Turn {
            role,
            content: content.to_string(),
            created_at: now.clone(),
        });
        session.updated_at = now;

        if self.max_turns > 0 && session.turns.len() > self.max_turns {
            let excess = session.turns.len() - self.max_turns;
            session.turns.drain(..excess);
        }
    }

    /// Full transcript in chronological order; empty for unknown sessions.
    pub async fn render(&self, session_id: &str) -> Vec<Turn> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|session| session.turns.clone())
            .unwrap_or_default()
    }

    pub async fn session_info(&self, session_id: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).map(|session| SessionInfo {
            id: session_id.to_string(),
            created_at: session.created_at.clone(),
            updated_at: session.updated_at.clone(),
            message_count: session.turns.len(),
        })
    }

    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read().await;
        let mut infos: Vec<SessionInfo> = sessions
            .iter()
            .map(|(id, session)| SessionInfo {
                id: id.clone(),
                created_at: session.created_at.clone(),
                updated_at: session.updated_at.clone(),
                message_count: session.turns.len(),
            })
            .collect();
        infos.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        infos
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Message total across all sessions.
    pub async fn message_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().map(|session| session.turns.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_reference_creates_an_empty_session() {
        let store = HistoryStore::new(0);
        store.get_or_create("s1").await;

        assert_eq!(store.session_count().await, 1);
        assert!(store.render("s1").await.is_empty());
    }

    #[tokio::test]
    async fn appends_preserve_call_order() {
        let store = HistoryStore::new(0);
        store.append("s1", Role::User, "first").await;
        store.append("s1", Role::Assistant, "second").await;
        store.append("s1", Role::User, "third").await;

        let turns = store.render("s1").await;
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(turns[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn sessions_do_not_share_turns() {
        let store = HistoryStore::new(0);
        store.append("a", Role::User, "for session a").await;
        store.append("b", Role::User, "for session b").await;

        let b_turns = store.render("b").await;
        assert_eq!(b_turns.len(), 1);
        assert_eq!(b_turns[0].content, "for session b");
    }

    #[tokio::test]
    async fn capped_store_drops_the_oldest_turns() {
        let store = HistoryStore::new(2);
        store.append("s1", Role::User, "one").await;
        store.append("s1", Role::Assistant, "two").await;
        store.append("s1", Role::User, "three").await;

        let contents: Vec<String> = store
            .render("s1")
            .await
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(contents, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn unknown_session_renders_empty() {
        let store = HistoryStore::new(0);
        assert!(store.render("missing").await.is_empty());
        assert!(store.session_info("missing").await.is_none());
    }

    #[tokio::test]
    async fn message_count_spans_sessions() {
        let store = HistoryStore::new(0);
        store.append("a", Role::User, "one").await;
        store.append("b", Role::User, "two").await;
        store.append("b", Role::Assistant, "three").await;

        assert_eq!(store.message_count().await, 3);
        assert_eq!(store.session_count().await, 2);
    }
}
