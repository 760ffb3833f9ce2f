//! API keys for the REST surface.
//!
//! Keys are shown once at creation and stored only as SHA-256 hashes
//! (lowercase hex). Each key belongs to one owner; authenticating with it
//! acts as that owner.

use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::Row;
use uuid::Uuid;

use autocomment_types::error::RepositoryError;

use super::format_datetime;
use super::pool::DatabasePool;

/// Prefix of every generated key.
pub const API_KEY_PREFIX: &str = "acfg_";

pub struct SqliteApiKeyStore {
    pool: DatabasePool,
}

impl SqliteApiKeyStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Owner of `key`, or `None` when the key is unknown. Records the use
    /// on a best-effort basis.
    pub async fn verify(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let key_hash = hash_api_key(key);
        let row = sqlx::query("SELECT id, owner_id FROM api_keys WHERE key_hash = ?")
            .bind(&key_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: String = row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let owner_id: String = row
            .try_get("owner_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let now = format_datetime(&Utc::now());
        if let Err(e) = sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
            .bind(&now)
            .bind(&id)
            .execute(&self.pool.writer)
            .await
        {
            tracing::debug!(error = %e, "failed to record api key use");
        }

        Ok(Some(owner_id))
    }

    /// Create a key for `owner_id`. Returns the plaintext key.
    pub async fn create(&self, owner_id: &str, name: &str) -> Result<String, RepositoryError> {
        let plaintext = generate_api_key();
        let now = format_datetime(&Utc::now());

        sqlx::query(
            "INSERT INTO api_keys (id, owner_id, key_hash, name, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(owner_id)
        .bind(hash_api_key(&plaintext))
        .bind(name)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(plaintext)
    }

    /// Create a `default` key when the owner has none yet.
    ///
    /// Returns the new plaintext key, or `None` if a key already existed
    /// (it was only shown when first created).
    pub async fn ensure_key(&self, owner_id: &str) -> Result<Option<String>, RepositoryError> {
        let existing: Option<(String,)> =
            sqlx::query_as("SELECT id FROM api_keys WHERE owner_id = ? LIMIT 1")
                .bind(owner_id)
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if existing.is_some() {
            return Ok(None);
        }
        self.create(owner_id, "default").await.map(Some)
    }
}

/// Compute SHA-256 hash of an API key (lowercase hex).
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

fn generate_api_key() -> String {
    format!(
        "{API_KEY_PREFIX}{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;

    #[test]
    fn test_hash_is_stable_hex() {
        let hash = hash_api_key("acfg_example");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_api_key("acfg_example"));
        assert_ne!(hash, hash_api_key("acfg_other"));
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert!(a.starts_with(API_KEY_PREFIX));
        assert_eq!(a.len(), API_KEY_PREFIX.len() + 64);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_create_and_verify() {
        let (pool, _dir) = test_pool().await;
        let store = SqliteApiKeyStore::new(pool);

        let key = store.create("alice", "laptop").await.unwrap();
        assert_eq!(store.verify(&key).await.unwrap().as_deref(), Some("alice"));
        assert!(store.verify("acfg_wrong").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_key_only_creates_once() {
        let (pool, _dir) = test_pool().await;
        let store = SqliteApiKeyStore::new(pool);

        let first = store.ensure_key("alice").await.unwrap();
        assert!(first.is_some());
        assert!(store.ensure_key("alice").await.unwrap().is_none());
        assert!(store.ensure_key("bob").await.unwrap().is_some());
    }
}
