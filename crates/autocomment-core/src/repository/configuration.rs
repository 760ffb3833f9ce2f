//! Configuration document repository trait definition.

use autocomment_types::draft::{ConfigurationDraft, StoredConfiguration};
use autocomment_types::error::RepositoryError;

/// Persistence for one configuration document per owner.
///
/// Implementations live in autocomment-infra (e.g., SqliteConfigurationRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ConfigurationRepository: Send + Sync {
    /// Last persisted document, or `None` when the owner never saved one.
    fn load(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<StoredConfiguration>, RepositoryError>> + Send;

    /// Replace the owner's document as a whole. Last write wins.
    fn persist(
        &self,
        owner_id: &str,
        draft: &ConfigurationDraft,
    ) -> impl std::future::Future<Output = Result<StoredConfiguration, RepositoryError>> + Send;
}
