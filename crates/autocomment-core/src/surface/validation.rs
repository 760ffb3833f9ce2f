//! Whole-form validation.

use autocomment_types::budget::{PlatformBudget, PromptMode};
use autocomment_types::config::QuotaPolicy;
use autocomment_types::draft::ConfigurationDraft;
use autocomment_types::license::License;
use autocomment_types::platform::Platform;
use autocomment_types::violation::{MIN_CUSTOM_PROMPT_LEN, Violation};

use crate::allocation::store::BudgetStore;

/// Every violation in `draft`, never just the first.
///
/// Order: empty platform set, then per enabled platform (in `Platform::ALL`
/// order) quota, cardinality and prompt findings, then the license check.
/// An enabled platform with no stored budget is treated as empty.
pub fn validate_draft(
    draft: &ConfigurationDraft,
    policy: &QuotaPolicy,
    licenses: &[License],
) -> Vec<Violation> {
    let mut found = Vec::new();

    if draft.enabled_platforms.is_empty() {
        found.push(Violation::NoPlatformsEnabled);
    }

    for platform in Platform::ALL {
        if !draft.is_enabled(platform) {
            continue;
        }
        let Some(budget) = draft.budget(platform) else {
            continue;
        };
        found.extend(budget.violations(policy));
        found.extend(prompt_violation(budget));
    }

    let license_ok = draft.license_id.as_deref().is_some_and(|id| {
        licenses
            .iter()
            .any(|license| license.id == id && license.is_available())
    });
    if !license_ok {
        found.push(Violation::LicenseNotSelected);
    }

    found
}

/// Quota and cardinality findings only: what a tightened policy can break
/// in a configuration that was valid when saved.
pub fn drift(draft: &ConfigurationDraft, policy: &QuotaPolicy) -> Vec<Violation> {
    Platform::ALL
        .into_iter()
        .filter(|p| draft.is_enabled(*p))
        .filter_map(|p| draft.budget(p))
        .flat_map(|budget| budget.violations(policy))
        .collect()
}

fn prompt_violation(budget: &PlatformBudget) -> Option<Violation> {
    let prompt = &budget.prompt;
    if prompt.mode != PromptMode::Custom {
        return None;
    }

    let selected = prompt
        .selected_custom_prompt_id
        .as_deref()
        .and_then(|id| prompt.custom_prompts.iter().find(|p| p.id == id))
        .or_else(|| prompt.custom_prompts.first());

    let text = selected.map(|p| p.text.trim()).unwrap_or_default();
    if text.is_empty() {
        return Some(Violation::MissingCustomPrompt {
            platform: budget.platform,
        });
    }
    let length = text.chars().count();
    if length < MIN_CUSTOM_PROMPT_LEN {
        return Some(Violation::CustomPromptTooShort {
            platform: budget.platform,
            min: MIN_CUSTOM_PROMPT_LEN,
            length,
        });
    }
    None
}
