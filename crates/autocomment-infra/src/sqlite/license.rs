//! SQLite license directory.
//!
//! Licenses are issued elsewhere; this table mirrors the ones an owner holds
//! so the allocator can gate configuration on them.

use autocomment_core::repository::license::LicenseDirectory;
use autocomment_types::error::RepositoryError;
use autocomment_types::license::{License, LicenseStatus};
use chrono::Utc;
use sqlx::Row;

use super::format_datetime;
use super::pool::DatabasePool;

pub struct SqliteLicenseDirectory {
    pool: DatabasePool,
}

impl SqliteLicenseDirectory {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert or update a license record for `owner_id`.
    pub async fn upsert(&self, owner_id: &str, license: &License) -> Result<(), RepositoryError> {
        let now = format_datetime(&Utc::now());
        sqlx::query(
            r#"INSERT INTO licenses (id, owner_id, license_key, name, status, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT (id) DO UPDATE SET
                   license_key = excluded.license_key,
                   name = excluded.name,
                   status = excluded.status"#,
        )
        .bind(&license.id)
        .bind(owner_id)
        .bind(&license.key)
        .bind(&license.name)
        .bind(license.status.to_string())
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.message().contains("UNIQUE") => {
                RepositoryError::Conflict(format!("license key already registered: {}", license.key))
            }
            other => RepositoryError::Query(other.to_string()),
        })?;
        Ok(())
    }
}

impl LicenseDirectory for SqliteLicenseDirectory {
    async fn list_available(&self, owner_id: &str) -> Result<Vec<License>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, license_key, name, status FROM licenses \
             WHERE owner_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let status: String = row
                    .try_get("status")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(License {
                    id: row
                        .try_get("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    key: row
                        .try_get("license_key")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    name: row
                        .try_get("name")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    status: status
                        .parse::<LicenseStatus>()
                        .map_err(RepositoryError::Query)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;

    fn license(id: &str, key: &str, status: LicenseStatus) -> License {
        License {
            id: id.to_string(),
            key: key.to_string(),
            name: format!("License {id}"),
            status,
        }
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner() {
        let (pool, _dir) = test_pool().await;
        let dir = SqliteLicenseDirectory::new(pool);

        dir.upsert("alice", &license("a1", "KEY-A1", LicenseStatus::Active))
            .await
            .unwrap();
        dir.upsert("bob", &license("b1", "KEY-B1", LicenseStatus::Active))
            .await
            .unwrap();

        let alice = dir.list_available("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].id, "a1");
        assert!(dir.list_available("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_updates_status() {
        let (pool, _dir) = test_pool().await;
        let dir = SqliteLicenseDirectory::new(pool);

        dir.upsert("alice", &license("a1", "KEY-A1", LicenseStatus::Active))
            .await
            .unwrap();
        dir.upsert("alice", &license("a1", "KEY-A1", LicenseStatus::Expired))
            .await
            .unwrap();

        let listed = dir.list_available("alice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, LicenseStatus::Expired);
        assert!(!listed[0].is_available());
    }

    #[tokio::test]
    async fn test_duplicate_key_is_conflict() {
        let (pool, _dir) = test_pool().await;
        let dir = SqliteLicenseDirectory::new(pool);

        dir.upsert("alice", &license("a1", "KEY-SAME", LicenseStatus::Active))
            .await
            .unwrap();
        let err = dir
            .upsert("alice", &license("a2", "KEY-SAME", LicenseStatus::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
