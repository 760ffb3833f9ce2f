//! Read-only snapshots of a surface for rendering.

use autocomment_types::budget::{InteractionBucket, KeywordTarget, PromptSettings};
use autocomment_types::config::QuotaPolicy;
use autocomment_types::platform::Platform;
use autocomment_types::violation::Violation;
use serde::Serialize;
use uuid::Uuid;

use crate::allocation::editor::EditorMode;
use crate::allocation::store::BudgetSummary;

#[derive(Debug, Clone, Serialize)]
pub struct SurfaceSnapshot {
    pub session_id: Uuid,
    /// No available license: every mutation is refused.
    pub read_only: bool,
    pub license_id: Option<String>,
    pub use_brand_voice: bool,
    pub promote_product: bool,
    pub product_details: Option<String>,
    pub policy: QuotaPolicy,
    pub platforms: Vec<PlatformView>,
    pub editor: Option<EditorView>,
    /// Quota and cardinality findings under the current policy.
    pub drift: Vec<Violation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformView {
    pub platform: Platform,
    pub display_name: &'static str,
    pub enabled: bool,
    /// `None` for a platform that was never configured.
    pub budget: Option<BudgetSummary>,
    pub prompt: Option<PromptSettings>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditorView {
    pub platform: Platform,
    #[serde(flatten)]
    pub mode: EditorMode,
    pub draft: KeywordTarget,
    pub dirty: bool,
    /// Highest values the draft may hold.
    pub ceiling: InteractionBucket,
}
