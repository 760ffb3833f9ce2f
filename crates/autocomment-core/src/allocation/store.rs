//! Per-platform aggregate operations.
//!
//! `PlatformBudget` is the unit of persistence; `BudgetStore` adds target
//! removal, the drift checks run by whole-form validation, and the derived
//! read-only view rendered by the CLI and the REST API.

use autocomment_types::budget::{InteractionBucket, KeywordTarget, Metric, PlatformBudget};
use autocomment_types::config::QuotaPolicy;
use autocomment_types::error::AllocationError;
use autocomment_types::platform::{Platform, TargetLabelKind};
use autocomment_types::violation::Violation;
use serde::Serialize;

use super::calculator::{BudgetMath, floor_u32};

/// Derived values for rendering one platform's budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub platform: Platform,
    pub label_kind: TargetLabelKind,
    pub feed: InteractionBucket,
    pub targets: Vec<KeywordTarget>,
    pub totals: InteractionBucket,
    /// Floored at zero.
    pub remaining: InteractionBucket,
    /// Highest values the feed may take, floored at zero.
    pub feed_ceiling: InteractionBucket,
    pub max_targets: usize,
    pub can_add_target: bool,
    pub within_quota: bool,
}

pub trait BudgetStore {
    /// Remove the target at `index` unconditionally. Its capacity is free
    /// immediately.
    fn remove_target(&mut self, index: usize) -> Result<KeywordTarget, AllocationError>;

    /// Sum-bound and cardinality violations, likes before comments.
    fn violations(&self, policy: &QuotaPolicy) -> Vec<Violation>;

    fn summary(&self, policy: &QuotaPolicy) -> BudgetSummary;
}

impl BudgetStore for PlatformBudget {
    fn remove_target(&mut self, index: usize) -> Result<KeywordTarget, AllocationError> {
        if index >= self.targets.len() {
            return Err(AllocationError::TargetNotFound {
                platform: self.platform,
                index,
            });
        }
        Ok(self.targets.remove(index))
    }

    fn violations(&self, policy: &QuotaPolicy) -> Vec<Violation> {
        let totals = self.totals();
        let mut found: Vec<Violation> = Metric::ALL
            .into_iter()
            .filter(|m| self.remaining(policy, *m) < 0)
            .map(|metric| Violation::QuotaExceeded {
                platform: self.platform,
                metric,
                limit: policy.max(metric),
                total: totals.get(metric),
            })
            .collect();

        if self.targets.len() > policy.max_targets {
            found.push(Violation::TooManyTargets {
                platform: self.platform,
                limit: policy.max_targets,
                count: self.targets.len(),
            });
        }
        found
    }

    fn summary(&self, policy: &QuotaPolicy) -> BudgetSummary {
        BudgetSummary {
            platform: self.platform,
            label_kind: self.platform.label_kind(),
            feed: self.feed,
            targets: self.targets.clone(),
            totals: self.totals(),
            remaining: InteractionBucket::new(
                self.display_remaining(policy, Metric::Likes),
                self.display_remaining(policy, Metric::Comments),
            ),
            feed_ceiling: InteractionBucket::new(
                floor_u32(self.feed_ceiling(policy, Metric::Likes)),
                floor_u32(self.feed_ceiling(policy, Metric::Comments)),
            ),
            max_targets: policy.max_targets,
            can_add_target: self.targets.len() < policy.max_targets && !self.is_saturated(policy),
            within_quota: self.within_quota(policy),
        }
    }
}
