use crate::store::{SnippetStore, StoreError};
use crate::types::Snippet;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Redis key layout for shared snippets.
/// Keys are deterministic so any API replica can resolve a share link.

pub const SNIPPET_PREFIX: &str = "codepad:snippet";

/// Generate the key holding a snippet
pub fn snippet_key(id: &str) -> String {
    format!("{}:{}", SNIPPET_PREFIX, id)
}

/// Snippet store backed by redis, one JSON value per key with a TTL
#[derive(Clone)]
pub struct RedisSnippetStore {
    conn: redis::aio::ConnectionManager,
    ttl_secs: u64,
}

impl RedisSnippetStore {
    pub fn new(conn: redis::aio::ConnectionManager, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self::new(conn, ttl_secs))
    }
}

#[async_trait]
impl SnippetStore for RedisSnippetStore {
    async fn put(&self, snippet: Snippet) -> Result<(), StoreError> {
        let key = snippet_key(&snippet.id);
        let payload = serde_json::to_string(&snippet)?;

        let mut conn = self.conn.clone();
        // SET NX EX: only claim an id nobody holds
        let stored: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async(&mut conn)
            .await?;
        match stored {
            Some(_) => Ok(()),
            None => Err(StoreError::Conflict(snippet.id)),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Snippet>, StoreError> {
        let key = snippet_key(id);
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(&key).await?;

        match payload {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_snippet_key_format() {
        assert_eq!(snippet_key("abc12345"), "codepad:snippet:abc12345");
    }

    #[test]
    fn test_snippet_key_deterministic() {
        let id = crate::store::new_snippet_id();
        assert_eq!(snippet_key(&id), snippet_key(&id));
        assert!(snippet_key(&id).starts_with("codepad:snippet:"));
    }

    #[tokio::test]
    #[ignore] // Requires Redis
    async fn test_redis_round_trip() {
        let store = RedisSnippetStore::connect("redis://127.0.0.1:6379", 60)
            .await
            .expect("Failed to connect to Redis");

        let id = crate::store::new_snippet_id();
        let snippet = Snippet {
            id: id.clone(),
            code: "fn main() {}".to_string(),
            language: "rust".to_string(),
            created_at: Utc::now(),
        };
        store.put(snippet.clone()).await.unwrap();

        assert_eq!(store.get(&id).await.unwrap(), Some(snippet.clone()));

        let clash = Snippet {
            code: "other".to_string(),
            ..snippet.clone()
        };
        assert!(matches!(store.put(clash).await, Err(StoreError::Conflict(_))));
        assert_eq!(store.get(&id).await.unwrap(), Some(snippet));
        assert_eq!(store.get("does-not-exist").await.unwrap(), None);
    }
}
