//! In-memory session store for conversation history.
//!
//! Holds the ordered message history per session id. Thread-safe with a
//! single-writer-per-key discipline: appends and clears on the same session
//! never interleave partially, while unrelated sessions proceed fully
//! independently.
//!
//! History grows without bound for the lifetime of the process; sessions are
//! destroyed only by an explicit clear or by shutdown. This is an accepted
//! limitation of the single-server deployment model. For deployments that
//! need eviction or cross-instance sharing, back this with Redis instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use uuid::Uuid;

use crate::ports::Message;

/// Shared map of session id to message history.
///
/// The outer `RwLock` only guards the map shape (insert/remove of sessions);
/// each history has its own `Mutex`, so writers to different sessions never
/// contend. None of the locks are held across await points.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Vec<Message>>>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a fresh opaque session id.
    pub fn generate_session_id() -> String {
        format!("session_{}", Uuid::new_v4().simple())
    }

    /// Appends a message to a session's history.
    ///
    /// An unknown session id transparently creates a new empty history;
    /// this is not an error.
    pub fn append(&self, session_id: &str, message: Message) {
        let history = self.entry(session_id);
        history.lock().unwrap().push(message);
    }

    /// Returns a snapshot of a session's history, in append order.
    ///
    /// Unknown sessions yield an empty sequence.
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        let sessions = self.sessions.read().unwrap();
        match sessions.get(session_id) {
            Some(history) => history.lock().unwrap().clone(),
            None => Vec::new(),
        }
    }

    /// Removes a session and its history entirely.
    pub fn clear(&self, session_id: &str) {
        self.sessions.write().unwrap().remove(session_id);
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    fn entry(&self, session_id: &str) -> Arc<Mutex<Vec<Message>>> {
        // Fast path: session already exists.
        if let Some(history) = self.sessions.read().unwrap().get(session_id) {
            return Arc::clone(history);
        }

        let mut sessions = self.sessions.write().unwrap();
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Vec::new()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_creates_unknown_session() {
        let store = SessionStore::new();
        store.append("s1", Message::user("hello"));

        let history = store.history("s1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "hello");
    }

    #[test]
    fn history_preserves_append_order() {
        let store = SessionStore::new();
        store.append("s1", Message::user("first"));
        store.append("s1", Message::assistant("second"));
        store.append("s1", Message::user("third"));

        let contents: Vec<_> = store
            .history("s1")
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new();
        store.append("s1", Message::user("for s1"));
        store.append("s2", Message::user("for s2"));

        assert_eq!(store.history("s1").len(), 1);
        assert_eq!(store.history("s2").len(), 1);
        assert_eq!(store.history("s1")[0].content, "for s1");
    }

    #[test]
    fn unknown_session_has_empty_history() {
        let store = SessionStore::new();
        assert!(store.history("nope").is_empty());
    }

    #[test]
    fn clear_removes_history() {
        let store = SessionStore::new();
        store.append("s1", Message::user("hello"));
        store.clear("s1");

        assert!(store.history("s1").is_empty());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn clear_unknown_session_is_noop() {
        let store = SessionStore::new();
        store.clear("never-existed");
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn generated_session_ids_are_distinct() {
        let a = SessionStore::generate_session_id();
        let b = SessionStore::generate_session_id();

        assert!(a.starts_with("session_"));
        assert_ne!(a, b);
    }

    #[test]
    fn concurrent_appends_to_one_session_all_land() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(SessionStore::new());
        let mut handles = Vec::new();

        for t in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    store.append("shared", Message::user(format!("{t}-{i}")));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.history("shared").len(), 8 * 50);
    }
}
