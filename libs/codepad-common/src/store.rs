//! Snippet persistence used by the share endpoints.
//!
//! Handlers only see [`SnippetStore`]; the server picks the memory or redis
//! backend at startup.

use crate::types::Snippet;
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Length of the short id used in share links
pub const SNIPPET_ID_LEN: usize = 8;

const SNIPPET_ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("snippet serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("snippet id {0} is already taken")]
    Conflict(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Backend(e.to_string())
    }
}

#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Insert a new snippet. Never replaces an existing id; returns
    /// [`StoreError::Conflict`] instead.
    async fn put(&self, snippet: Snippet) -> Result<(), StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Snippet>, StoreError>;
}

/// Generate a short share id of lowercase alphanumerics
pub fn new_snippet_id() -> String {
    let mut bits = uuid::Uuid::new_v4().as_u128();
    (0..SNIPPET_ID_LEN)
        .map(|_| {
            let c = SNIPPET_ID_ALPHABET[(bits % 36) as usize] as char;
            bits /= 36;
            c
        })
        .collect()
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemorySnippetStore {
    snippets: Arc<RwLock<HashMap<String, Snippet>>>,
}

impl MemorySnippetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.snippets.read().await.len()
    }
}

#[async_trait]
impl SnippetStore for MemorySnippetStore {
    async fn put(&self, snippet: Snippet) -> Result<(), StoreError> {
        match self.snippets.write().await.entry(snippet.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(snippet.id)),
            Entry::Vacant(slot) => {
                slot.insert(snippet);
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Snippet>, StoreError> {
        Ok(self.snippets.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snippet(id: &str, code: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            code: code.to_string(),
            language: "python".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_snippet_id_shape() {
        let id = new_snippet_id();
        assert_eq!(id.len(), SNIPPET_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(new_snippet_id(), new_snippet_id());
    }

    #[tokio::test]
    async fn test_memory_put_get() {
        let store = MemorySnippetStore::new();
        store.put(snippet("abc12345", "print(1)")).await.unwrap();

        let loaded = store.get("abc12345").await.unwrap().expect("snippet stored");
        assert_eq!(loaded.code, "print(1)");
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_put_keeps_existing_id() {
        let store = MemorySnippetStore::new();
        store.put(snippet("deadbeef", "alice")).await.unwrap();

        let err = store.put(snippet("deadbeef", "bob")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref id) if id == "deadbeef"));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("deadbeef").await.unwrap().unwrap().code, "alice");
    }

    #[test]
    fn test_snippet_ids_use_full_alphabet() {
        let seen: std::collections::HashSet<char> =
            (0..500).flat_map(|_| new_snippet_id().chars().collect::<Vec<_>>()).collect();
        assert!(seen.iter().any(|c| ('g'..='z').contains(c)));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemorySnippetStore::new();
        let other = store.clone();
        store.put(snippet("shared", "x")).await.unwrap();
        assert!(other.get("shared").await.unwrap().is_some());
    }
}
