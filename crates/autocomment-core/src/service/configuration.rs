//! Configuration session service.
//!
//! Loads the owner's licenses and stored document into a
//! `ConfigurationSurface`, and persists a validated surface back. Generic
//! over the repository traits so autocomment-core never depends on
//! autocomment-infra.

use autocomment_types::draft::{CONFIGURATION_SCHEMA_VERSION, StoredConfiguration};
use autocomment_types::error::{RepositoryError, SessionError, SubmitError};
use autocomment_types::license::License;

use crate::event::ViolationBus;
use crate::repository::configuration::ConfigurationRepository;
use crate::repository::license::LicenseDirectory;
use crate::surface::{AllocatorSettings, ConfigurationSurface, default_draft};

pub struct ConfigurationService<R: ConfigurationRepository, L: LicenseDirectory> {
    configs: R,
    licenses: L,
    settings: AllocatorSettings,
    bus: ViolationBus,
}

impl<R: ConfigurationRepository, L: LicenseDirectory> ConfigurationService<R, L> {
    pub fn new(configs: R, licenses: L, settings: AllocatorSettings) -> Self {
        Self {
            configs,
            licenses,
            settings,
            bus: ViolationBus::default(),
        }
    }

    /// Use `bus` for every session opened by this service.
    pub fn with_bus(mut self, bus: ViolationBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn settings(&self) -> &AllocatorSettings {
        &self.settings
    }

    pub fn bus(&self) -> &ViolationBus {
        &self.bus
    }

    pub async fn licenses(&self, owner_id: &str) -> Result<Vec<License>, RepositoryError> {
        self.licenses.list_available(owner_id).await
    }

    /// The stored document, without opening a session.
    pub async fn stored(&self, owner_id: &str) -> Result<Option<StoredConfiguration>, SessionError> {
        let stored = self
            .configs
            .load(owner_id)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        match stored {
            Some(doc) if doc.schema_version > CONFIGURATION_SCHEMA_VERSION => {
                Err(SessionError::Corrupt(format!(
                    "schema version {} is newer than supported version {}",
                    doc.schema_version, CONFIGURATION_SCHEMA_VERSION
                )))
            }
            other => Ok(other),
        }
    }

    /// Open an editing session for `owner_id`.
    ///
    /// Without a stored document the session starts from the default draft.
    /// When no license is selected, the first available one is. Stored
    /// allocations that break the current policy are logged as drift; they
    /// stay in the draft so the user can fix them.
    pub async fn open_session(&self, owner_id: &str) -> Result<ConfigurationSurface, SessionError> {
        let licenses = self
            .licenses
            .list_available(owner_id)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        let mut draft = match self.stored(owner_id).await? {
            Some(doc) => doc.draft,
            None => {
                tracing::debug!(owner_id, "no stored configuration, using defaults");
                default_draft(&self.settings.defaults)
            }
        };

        if draft.license_id.is_none() {
            draft.license_id = licenses
                .iter()
                .find(|l| l.is_available())
                .map(|l| l.id.clone());
        }

        let surface =
            ConfigurationSurface::new(self.settings.clone(), licenses, draft, self.bus.clone());

        for violation in surface.drift() {
            tracing::warn!(
                owner_id,
                session_id = %surface.id(),
                "saved configuration exceeds the current limits: {violation}"
            );
        }
        tracing::info!(
            owner_id,
            session_id = %surface.id(),
            read_only = surface.is_read_only(),
            "configuration session opened"
        );
        Ok(surface)
    }

    /// Validate and persist the surface's draft.
    ///
    /// The surface is only read: on any failure it is unchanged and the
    /// submit can be retried.
    pub async fn submit(
        &self,
        owner_id: &str,
        surface: &ConfigurationSurface,
    ) -> Result<StoredConfiguration, SubmitError> {
        let document = surface.prepare_submission()?;

        let stored = self
            .configs
            .persist(owner_id, &document)
            .await
            .map_err(|e| {
                tracing::warn!(owner_id, session_id = %surface.id(), error = %e, "persist failed");
                SubmitError::Persistence(e.to_string())
            })?;

        tracing::info!(owner_id, session_id = %surface.id(), "configuration saved");
        Ok(stored)
    }
}
