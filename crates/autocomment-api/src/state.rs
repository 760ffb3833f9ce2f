//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. `ConfigurationService` is generic over the repository
//! traits; AppState pins it to the SQLite implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use autocomment_core::event::ViolationBus;
use autocomment_core::service::ConfigurationService;
use autocomment_core::surface::ConfigurationSurface;
use autocomment_infra::config::{allocator_settings, load_global_config};
use autocomment_infra::paths::{ensure_data_dir, resolve_data_dir};
use autocomment_infra::sqlite::api_key::SqliteApiKeyStore;
use autocomment_infra::sqlite::configuration::SqliteConfigurationRepository;
use autocomment_infra::sqlite::license::SqliteLicenseDirectory;
use autocomment_infra::sqlite::pool::{DatabasePool, database_url};

pub type ConcreteConfigurationService =
    ConfigurationService<SqliteConfigurationRepository, SqliteLicenseDirectory>;

/// An editing session hosted by the REST API.
///
/// Sessions untouched for this long are dropped along with their unsaved draft.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// An editing session hosted by the REST API.
///
/// The surface is single-writer; the mutex serializes requests against it.
#[derive(Clone)]
pub struct SessionEntry {
    pub owner_id: String,
    pub surface: Arc<Mutex<ConfigurationSurface>>,
    pub last_seen: Instant,
}

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConcreteConfigurationService>,
    pub licenses: Arc<SqliteLicenseDirectory>,
    pub api_keys: Arc<SqliteApiKeyStore>,
    pub sessions: Arc<DashMap<Uuid, SessionEntry>>,
    pub bus: ViolationBus,
    pub data_dir: PathBuf,
    pub session_ttl: Duration,
}

impl AppState {
    /// Initialize the application state under the resolved data directory.
    pub async fn init() -> anyhow::Result<Self> {
        Self::open(&resolve_data_dir()).await
    }

    /// Connect to the database in `data_dir`, load `config.toml` and wire
    /// the services.
    pub async fn open(data_dir: &Path) -> anyhow::Result<Self> {
        ensure_data_dir(data_dir).await?;

        let config = load_global_config(data_dir).await;
        let settings = allocator_settings(&config);

        let db_pool = DatabasePool::new(&database_url(data_dir)).await?;
        let bus = ViolationBus::default();

        let service = ConfigurationService::new(
            SqliteConfigurationRepository::new(db_pool.clone()),
            SqliteLicenseDirectory::new(db_pool.clone()),
            settings,
        )
        .with_bus(bus.clone());

        tracing::debug!(data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            service: Arc::new(service),
            licenses: Arc::new(SqliteLicenseDirectory::new(db_pool.clone())),
            api_keys: Arc::new(SqliteApiKeyStore::new(db_pool)),
            sessions: Arc::new(DashMap::new()),
            bus,
            data_dir: data_dir.to_path_buf(),
            session_ttl: DEFAULT_SESSION_TTL,
        })
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Register a freshly opened surface and return its id.
    /// Idle sessions are swept first.
    pub fn host_session(&self, owner_id: &str, surface: ConfigurationSurface) -> Uuid {
        self.evict_idle_sessions();
        let id = surface.id();
        self.sessions.insert(
            id,
            SessionEntry {
                owner_id: owner_id.to_string(),
                surface: Arc::new(Mutex::new(surface)),
                last_seen: Instant::now(),
            },
        );
        id
    }

    /// The session `id` if it exists, belongs to `owner_id` and has not
    /// expired. A successful lookup marks the session as active.
    pub fn hosted_session(&self, id: Uuid, owner_id: &str) -> Option<SessionEntry> {
        let mut entry = self.sessions.get_mut(&id)?;
        if entry.owner_id != owner_id || entry.last_seen.elapsed() >= self.session_ttl {
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.value().clone())
    }

    /// Drop every session idle for at least `session_ttl`. Returns how many
    /// were evicted.
    pub fn evict_idle_sessions(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() < self.session_ttl);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::debug!(evicted, "evicted idle sessions");
        }
        evicted
    }

    /// Drop the session `id` when it belongs to `owner_id`.
    pub fn close_session(&self, id: Uuid, owner_id: &str) -> bool {
        self.sessions
            .remove_if(&id, |_, entry| entry.owner_id == owner_id)
            .is_some()
    }
}
