//! The in-memory configuration document edited during one session and
//! persisted as a whole on submit.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::budget::PlatformBudget;
use crate::platform::Platform;

/// Whole-form configuration state.
///
/// `budgets` may hold entries for platforms that are not enabled: a disabled
/// platform keeps its data so re-enabling it restores the previous allocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDraft {
    /// Selected license (main or sub-license id). Opaque to the allocator.
    #[serde(default)]
    pub license_id: Option<String>,
    #[serde(default)]
    pub use_brand_voice: bool,
    #[serde(default)]
    pub promote_product: bool,
    #[serde(default)]
    pub product_details: Option<String>,
    #[serde(default)]
    pub enabled_platforms: BTreeSet<Platform>,
    #[serde(default)]
    pub budgets: BTreeMap<Platform, PlatformBudget>,
}

impl ConfigurationDraft {
    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.enabled_platforms.contains(&platform)
    }

    pub fn budget(&self, platform: Platform) -> Option<&PlatformBudget> {
        self.budgets.get(&platform)
    }
}

/// Current version of the persisted document layout.
pub const CONFIGURATION_SCHEMA_VERSION: u32 = 1;

/// A configuration document as last written to storage for one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConfiguration {
    pub owner_id: String,
    pub schema_version: u32,
    pub draft: ConfigurationDraft,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Opaque global flags edited alongside the budgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettingsUpdate {
    pub use_brand_voice: Option<bool>,
    pub promote_product: Option<bool>,
    pub product_details: Option<String>,
}
