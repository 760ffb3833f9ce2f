//! SQLite configuration document repository.
//!
//! Implements `ConfigurationRepository` from `autocomment-core`. The draft is
//! stored as JSON text, one row per owner, replaced as a whole on persist.

use autocomment_core::repository::configuration::ConfigurationRepository;
use autocomment_types::draft::{
    CONFIGURATION_SCHEMA_VERSION, ConfigurationDraft, StoredConfiguration,
};
use autocomment_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

pub struct SqliteConfigurationRepository {
    pool: DatabasePool,
}

impl SqliteConfigurationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ConfigRow {
    owner_id: String,
    schema_version: i64,
    document: String,
    created_at: String,
    updated_at: String,
}

impl ConfigRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            owner_id: row.try_get("owner_id")?,
            schema_version: row.try_get("schema_version")?,
            document: row.try_get("document")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_stored(self) -> Result<StoredConfiguration, RepositoryError> {
        let draft: ConfigurationDraft = serde_json::from_str(&self.document)
            .map_err(|e| RepositoryError::Query(format!("invalid configuration document: {e}")))?;
        let schema_version = u32::try_from(self.schema_version)
            .map_err(|_| RepositoryError::Query(format!("invalid schema version {}", self.schema_version)))?;

        Ok(StoredConfiguration {
            owner_id: self.owner_id,
            schema_version,
            draft,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl ConfigurationRepository for SqliteConfigurationRepository {
    async fn load(&self, owner_id: &str) -> Result<Option<StoredConfiguration>, RepositoryError> {
        let row = sqlx::query(
            "SELECT owner_id, schema_version, document, created_at, updated_at \
             FROM auto_commenter_configs WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let row = ConfigRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(row.into_stored()?))
            }
            None => Ok(None),
        }
    }

    async fn persist(
        &self,
        owner_id: &str,
        draft: &ConfigurationDraft,
    ) -> Result<StoredConfiguration, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let document = serde_json::to_string(draft)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize configuration: {e}")))?;

        sqlx::query(
            r#"INSERT INTO auto_commenter_configs (owner_id, schema_version, document, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (owner_id) DO UPDATE SET
                   schema_version = excluded.schema_version,
                   document = excluded.document,
                   updated_at = excluded.updated_at"#,
        )
        .bind(owner_id)
        .bind(CONFIGURATION_SCHEMA_VERSION as i64)
        .bind(&document)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tracing::debug!(owner_id, bytes = document.len(), "configuration persisted");

        // created_at survives the upsert, so read the row back.
        let row = sqlx::query(
            "SELECT owner_id, schema_version, document, created_at, updated_at \
             FROM auto_commenter_configs WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        ConfigRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_stored()
    }
}
