//! `ConfigurationSurface`: the editing session over a `ConfigurationDraft`.
//!
//! All operations are synchronous and return either the committed result or
//! a typed refusal. A refusal leaves the draft and the editor exactly as they
//! were, is logged, and is published on the session's `ViolationBus`.

use autocomment_types::budget::{InteractionBucket, KeywordTarget, Metric, PlatformBudget, PromptSettings};
use autocomment_types::config::{PlatformDefaults, QuotaPolicy};
use autocomment_types::draft::{ConfigurationDraft, GlobalSettingsUpdate};
use autocomment_types::error::{AllocationError, SubmitError};
use autocomment_types::event::ViolationEvent;
use autocomment_types::license::License;
use autocomment_types::platform::Platform;
use autocomment_types::violation::Violation;
use uuid::Uuid;

use super::validation::{drift, validate_draft};
use super::view::{EditorView, PlatformView, SurfaceSnapshot};
use super::AllocatorSettings;
use crate::allocation::calculator::BudgetMath;
use crate::allocation::editor::{OpenDraft, TargetEditor};
use crate::allocation::feed;
use crate::allocation::store::{BudgetStore, BudgetSummary};
use crate::event::ViolationBus;

pub struct ConfigurationSurface {
    id: Uuid,
    settings: AllocatorSettings,
    licenses: Vec<License>,
    draft: ConfigurationDraft,
    editor: TargetEditor,
    bus: ViolationBus,
}

impl ConfigurationSurface {
    /// Open a session over `draft`.
    ///
    /// Enabled platforms without a stored budget receive their seed budget so
    /// every enabled platform always has one.
    pub fn new(
        settings: AllocatorSettings,
        licenses: Vec<License>,
        mut draft: ConfigurationDraft,
        bus: ViolationBus,
    ) -> Self {
        for platform in draft.enabled_platforms.clone() {
            draft
                .budgets
                .entry(platform)
                .or_insert_with(|| settings.defaults.seed_budget(platform));
        }

        Self {
            id: Uuid::now_v7(),
            settings,
            licenses,
            draft,
            editor: TargetEditor::new(),
            bus,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn draft(&self) -> &ConfigurationDraft {
        &self.draft
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.settings.policy
    }

    pub fn defaults(&self) -> &PlatformDefaults {
        &self.settings.defaults
    }

    pub fn licenses(&self) -> &[License] {
        &self.licenses
    }

    pub fn bus(&self) -> &ViolationBus {
        &self.bus
    }

    pub fn editor(&self) -> Option<&OpenDraft> {
        self.editor.current()
    }

    /// True when no license is available: viewing only.
    pub fn is_read_only(&self) -> bool {
        !self.licenses.iter().any(License::is_available)
    }

    // ---- global fields ----

    /// Attach the configuration to an available license.
    pub fn select_license(&mut self, license_id: &str) -> Result<(), AllocationError> {
        let result = self.ensure_writable().and_then(|()| {
            if self
                .licenses
                .iter()
                .any(|l| l.id == license_id && l.is_available())
            {
                Ok(())
            } else {
                Err(AllocationError::LicenseUnavailable(license_id.to_string()))
            }
        });
        self.report(result)?;
        self.draft.license_id = Some(license_id.to_string());
        tracing::debug!(session_id = %self.id, license_id, "license selected");
        Ok(())
    }

    /// Update the pass-through flags. Absent fields are left as they are.
    pub fn update_settings(&mut self, update: GlobalSettingsUpdate) -> Result<(), AllocationError> {
        let result = self.ensure_writable();
        self.report(result)?;
        if let Some(value) = update.use_brand_voice {
            self.draft.use_brand_voice = value;
        }
        if let Some(value) = update.promote_product {
            self.draft.promote_product = value;
        }
        if let Some(details) = update.product_details {
            let details = details.trim().to_string();
            self.draft.product_details = (!details.is_empty()).then_some(details);
        }
        Ok(())
    }

    // ---- platform selection ----

    /// Enable a platform. Requires an available, selected license. A
    /// platform seen for the first time receives its seed budget; a
    /// previously disabled one gets its retained budget back.
    pub fn enable_platform(&mut self, platform: Platform) -> Result<(), AllocationError> {
        let result = self.ensure_writable().and_then(|()| self.ensure_license_selected());
        self.report(result)?;

        let defaults = &self.settings.defaults;
        self.draft
            .budgets
            .entry(platform)
            .or_insert_with(|| defaults.seed_budget(platform));
        self.draft.enabled_platforms.insert(platform);
        tracing::debug!(session_id = %self.id, %platform, "platform enabled");
        Ok(())
    }

    /// Disable a platform. Its budget is kept, inert, for re-enabling.
    pub fn disable_platform(&mut self, platform: Platform) -> Result<(), AllocationError> {
        let result = self.ensure_writable().and_then(|()| {
            if self.editor.platform() == Some(platform) {
                Err(AllocationError::EditorBusy)
            } else {
                Ok(())
            }
        });
        self.report(result)?;
        self.draft.enabled_platforms.remove(&platform);
        tracing::debug!(session_id = %self.id, %platform, "platform disabled");
        Ok(())
    }

    pub fn set_platform_enabled(
        &mut self,
        platform: Platform,
        enabled: bool,
    ) -> Result<(), AllocationError> {
        if enabled {
            self.enable_platform(platform)
        } else {
            self.disable_platform(platform)
        }
    }

    pub fn set_prompt_settings(
        &mut self,
        platform: Platform,
        prompt: PromptSettings,
    ) -> Result<(), AllocationError> {
        let result = self.with_budget(platform, |budget, _| {
            budget.prompt = prompt;
            Ok(())
        });
        self.report(result)
    }

    // ---- feed bucket ----

    pub fn step_feed(
        &mut self,
        platform: Platform,
        metric: Metric,
        delta: i64,
    ) -> Result<u32, AllocationError> {
        let result = self.with_budget(platform, |budget, settings| {
            feed::step_feed(budget, &settings.policy, metric, delta)
        });
        self.committed(platform, "feed", self.report(result))
    }

    pub fn set_feed(
        &mut self,
        platform: Platform,
        metric: Metric,
        value: u32,
    ) -> Result<u32, AllocationError> {
        let result = self.with_budget(platform, |budget, settings| {
            feed::set_feed(budget, &settings.policy, metric, value)
        });
        self.committed(platform, "feed", self.report(result))
    }

    // ---- target editor ----

    pub fn open_add(&mut self, platform: Platform) -> Result<KeywordTarget, AllocationError> {
        let result = self.try_open(platform, None);
        self.report(result)
    }

    pub fn open_edit(
        &mut self,
        platform: Platform,
        index: usize,
    ) -> Result<KeywordTarget, AllocationError> {
        let result = self.try_open(platform, Some(index));
        self.report(result)
    }

    fn try_open(
        &mut self,
        platform: Platform,
        index: Option<usize>,
    ) -> Result<KeywordTarget, AllocationError> {
        self.ensure_writable()?;
        if self.editor.is_open() {
            return Err(AllocationError::EditorBusy);
        }
        let budget = enabled_budget(&self.draft, platform)?;
        let draft = match index {
            None => self.editor.open_add(budget, &self.settings.policy)?,
            Some(index) => self.editor.open_edit(budget, index)?,
        };
        Ok(draft.clone())
    }

    pub fn set_draft_label(&mut self, label: impl Into<String>) -> Result<(), AllocationError> {
        let result = self.editor.set_label(label);
        self.report(result)
    }

    pub fn step_draft(&mut self, metric: Metric, delta: i64) -> Result<u32, AllocationError> {
        let result = editor_budget(&self.draft, &self.editor).and_then(|budget| {
            self.editor
                .adjust(budget, &self.settings.policy, metric, delta)
        });
        self.report(result)
    }

    pub fn set_draft_value(&mut self, metric: Metric, value: u32) -> Result<u32, AllocationError> {
        let result = editor_budget(&self.draft, &self.editor).and_then(|budget| {
            self.editor
                .set_value(budget, &self.settings.policy, metric, value)
        });
        self.report(result)
    }

    /// Commit the open draft. Returns the index of the committed target.
    pub fn commit_target(&mut self) -> Result<usize, AllocationError> {
        let result = self.try_commit();
        let (platform, index) = self.report(result)?;
        tracing::debug!(session_id = %self.id, %platform, index, "target committed");
        Ok(index)
    }

    /// Commit against the editor's platform, returning it with the index.
    fn try_commit(&mut self) -> Result<(Platform, usize), AllocationError> {
        let platform = self.editor.platform().ok_or(AllocationError::EditorClosed)?;
        let budget = self
            .draft
            .budgets
            .get_mut(&platform)
            .ok_or(AllocationError::PlatformDisabled(platform))?;
        self.editor
            .commit(budget, &self.settings.policy, self.settings.label_style)
            .map(|index| (platform, index))
    }

    /// Close the editor without committing.
    ///
    /// A draft that differs from its seed is only discarded when `confirm`
    /// is set; otherwise `UnsavedChanges` is returned and the draft stays.
    pub fn discard_target(&mut self, confirm: bool) -> Result<OpenDraft, AllocationError> {
        let result = match self.editor.current() {
            None => Err(AllocationError::EditorClosed),
            Some(open) if open.is_dirty() && !confirm => Err(AllocationError::UnsavedChanges),
            Some(_) => Ok(()),
        };
        self.report(result)?;
        self.editor.discard().ok_or(AllocationError::EditorClosed)
    }

    /// Remove a target without confirmation. Refused while the editor is
    /// open on the same platform, since indices would shift under the draft.
    pub fn remove_target(
        &mut self,
        platform: Platform,
        index: usize,
    ) -> Result<KeywordTarget, AllocationError> {
        let result = if self.editor.platform() == Some(platform) {
            Err(AllocationError::EditorBusy)
        } else {
            self.with_budget(platform, |budget, _| budget.remove_target(index))
        };
        self.committed(platform, "target removed", self.report(result))
    }

    // ---- derived values ----

    pub fn totals(&self, platform: Platform) -> Option<InteractionBucket> {
        self.draft.budget(platform).map(BudgetMath::totals)
    }

    /// Unfloored remaining capacity.
    pub fn remaining(&self, platform: Platform, metric: Metric) -> Option<i64> {
        self.draft
            .budget(platform)
            .map(|b| b.remaining(&self.settings.policy, metric))
    }

    pub fn summary(&self, platform: Platform) -> Option<BudgetSummary> {
        self.draft
            .budget(platform)
            .map(|b| b.summary(&self.settings.policy))
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        let policy = &self.settings.policy;
        let platforms = Platform::ALL
            .into_iter()
            .map(|platform| {
                let budget = self.draft.budget(platform);
                PlatformView {
                    platform,
                    display_name: platform.display_name(),
                    enabled: self.draft.is_enabled(platform),
                    budget: budget.map(|b| b.summary(policy)),
                    prompt: budget.map(|b| b.prompt.clone()),
                }
            })
            .collect();

        let editor = self.editor.current().and_then(|open| {
            let budget = self.draft.budget(open.platform)?;
            let ceiling = |metric| self.editor.ceiling(budget, policy, metric).unwrap_or(0);
            Some(EditorView {
                platform: open.platform,
                mode: open.mode,
                draft: open.draft.clone(),
                dirty: open.is_dirty(),
                ceiling: InteractionBucket::new(ceiling(Metric::Likes), ceiling(Metric::Comments)),
            })
        });

        SurfaceSnapshot {
            session_id: self.id,
            read_only: self.is_read_only(),
            license_id: self.draft.license_id.clone(),
            use_brand_voice: self.draft.use_brand_voice,
            promote_product: self.draft.promote_product,
            product_details: self.draft.product_details.clone(),
            policy: *policy,
            platforms,
            editor,
            drift: self.drift(),
        }
    }

    // ---- whole-form validation ----

    pub fn validate_all(&self) -> Vec<Violation> {
        validate_draft(&self.draft, &self.settings.policy, &self.licenses)
    }

    /// Enabled platforms whose stored allocation breaks the current policy.
    pub fn drift(&self) -> Vec<Violation> {
        drift(&self.draft, &self.settings.policy)
    }

    /// The document to persist, or every violation that blocks it.
    ///
    /// Budgets are filled in for every platform: retained ones as they are,
    /// never-configured ones from the seed table. The surface itself is not
    /// modified.
    pub fn prepare_submission(&self) -> Result<ConfigurationDraft, SubmitError> {
        let violations = self.validate_all();
        if !violations.is_empty() {
            for violation in &violations {
                tracing::warn!(session_id = %self.id, code = violation.code(), "{violation}");
                self.bus
                    .publish(ViolationEvent::from_violation(self.id, violation));
            }
            return Err(SubmitError::Rejected(violations));
        }

        let mut document = self.draft.clone();
        for platform in Platform::ALL {
            document
                .budgets
                .entry(platform)
                .or_insert_with(|| self.settings.defaults.seed_budget(platform));
        }
        Ok(document)
    }

    // ---- helpers ----

    fn ensure_writable(&self) -> Result<(), AllocationError> {
        if self.is_read_only() {
            Err(AllocationError::LicenseRequired)
        } else {
            Ok(())
        }
    }

    fn ensure_license_selected(&self) -> Result<(), AllocationError> {
        let selected = self.draft.license_id.as_deref().is_some_and(|id| {
            self.licenses
                .iter()
                .any(|l| l.id == id && l.is_available())
        });
        if selected {
            Ok(())
        } else {
            Err(AllocationError::LicenseRequired)
        }
    }

    /// Run `f` against an enabled platform's budget after the license gate.
    fn with_budget<T>(
        &mut self,
        platform: Platform,
        f: impl FnOnce(&mut PlatformBudget, &AllocatorSettings) -> Result<T, AllocationError>,
    ) -> Result<T, AllocationError> {
        self.ensure_writable()?;
        if !self.draft.is_enabled(platform) {
            return Err(AllocationError::PlatformDisabled(platform));
        }
        let settings = &self.settings;
        let budget = self
            .draft
            .budgets
            .entry(platform)
            .or_insert_with(|| settings.defaults.seed_budget(platform));
        f(budget, settings)
    }

    fn report<T>(&self, result: Result<T, AllocationError>) -> Result<T, AllocationError> {
        if let Err(err) = &result {
            tracing::warn!(session_id = %self.id, code = err.code(), "{err}");
            self.bus.publish(ViolationEvent::from_error(self.id, err));
        }
        result
    }

    fn committed<T: std::fmt::Debug>(
        &self,
        platform: Platform,
        what: &str,
        result: Result<T, AllocationError>,
    ) -> Result<T, AllocationError> {
        if let Ok(value) = &result {
            tracing::debug!(session_id = %self.id, %platform, ?value, "{what}");
        }
        result
    }
}

fn enabled_budget(
    draft: &ConfigurationDraft,
    platform: Platform,
) -> Result<&PlatformBudget, AllocationError> {
    if !draft.is_enabled(platform) {
        return Err(AllocationError::PlatformDisabled(platform));
    }
    draft
        .budget(platform)
        .ok_or(AllocationError::PlatformDisabled(platform))
}

fn editor_budget<'a>(
    draft: &'a ConfigurationDraft,
    editor: &TargetEditor,
) -> Result<&'a PlatformBudget, AllocationError> {
    let platform = editor.platform().ok_or(AllocationError::EditorClosed)?;
    draft
        .budget(platform)
        .ok_or(AllocationError::PlatformDisabled(platform))
}

impl std::fmt::Debug for ConfigurationSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationSurface")
            .field("id", &self.id)
            .field("enabled_platforms", &self.draft.enabled_platforms)
            .field("editor_open", &self.editor.is_open())
            .finish()
    }
}
