//! Feed bucket controls.
//!
//! The feed shares the platform pool with every target, so its ceiling is
//! `max - Σ targets`. Increments past the ceiling are refused with the exact
//! ceiling and the amount the targets already consume. Decrements clamp at 0
//! and are always accepted, even when the feed sits above its ceiling.

use autocomment_types::budget::{Metric, PlatformBudget};
use autocomment_types::config::QuotaPolicy;
use autocomment_types::error::AllocationError;

use super::calculator::BudgetMath;
use super::capacity_exceeded;

/// Move one feed counter by `delta`. Returns the new value.
pub fn step_feed(
    budget: &mut PlatformBudget,
    policy: &QuotaPolicy,
    metric: Metric,
    delta: i64,
) -> Result<u32, AllocationError> {
    let current = budget.feed.get(metric);
    let target = (current as i64).saturating_add(delta).max(0);
    apply(budget, policy, metric, clamp_u32(target))
}

/// Direct numeric entry. Values above the ceiling are refused, not clamped.
pub fn set_feed(
    budget: &mut PlatformBudget,
    policy: &QuotaPolicy,
    metric: Metric,
    value: u32,
) -> Result<u32, AllocationError> {
    apply(budget, policy, metric, value)
}

fn apply(
    budget: &mut PlatformBudget,
    policy: &QuotaPolicy,
    metric: Metric,
    value: u32,
) -> Result<u32, AllocationError> {
    let current = budget.feed.get(metric);
    let ceiling = budget.feed_ceiling(policy, metric);
    if value > current && value as i64 > ceiling {
        return Err(capacity_exceeded(
            budget.platform,
            policy,
            metric,
            ceiling,
            value,
        ));
    }
    budget.feed.set(metric, value);
    Ok(value)
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
