//! The configuration surface: one editing session over a whole
//! `ConfigurationDraft`.
//!
//! The surface owns the draft, the target editor and the license list,
//! gates every mutation on license availability, reports each refusal on the
//! `ViolationBus`, and runs whole-form validation before submission.

pub mod configuration;
pub mod validation;
pub mod view;

use autocomment_types::config::{LabelStyle, PlatformDefaults, QuotaPolicy};
use autocomment_types::draft::ConfigurationDraft;
use autocomment_types::platform::Platform;

pub use configuration::ConfigurationSurface;
pub use validation::validate_draft;
pub use view::{EditorView, PlatformView, SurfaceSnapshot};

/// Policy, label style and seed table a surface is built with.
#[derive(Debug, Clone, Default)]
pub struct AllocatorSettings {
    pub policy: QuotaPolicy,
    pub label_style: LabelStyle,
    pub defaults: PlatformDefaults,
}

/// Platform enabled for a configuration that has never been saved.
pub const INITIAL_PLATFORM: Platform = Platform::Linkedin;

/// Draft used when the owner has no stored configuration: the initial
/// platform enabled with its seed budget.
pub fn default_draft(defaults: &PlatformDefaults) -> ConfigurationDraft {
    let mut draft = ConfigurationDraft::default();
    draft.enabled_platforms.insert(INITIAL_PLATFORM);
    draft
        .budgets
        .insert(INITIAL_PLATFORM, defaults.seed_budget(INITIAL_PLATFORM));
    draft
}
