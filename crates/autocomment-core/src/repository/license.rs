//! License lookup trait definition.

use autocomment_types::error::RepositoryError;
use autocomment_types::license::License;

/// Read-only view of the licenses an owner holds.
pub trait LicenseDirectory: Send + Sync {
    /// Every license of the owner, oldest first, whatever its status.
    fn list_available(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<License>, RepositoryError>> + Send;
}
