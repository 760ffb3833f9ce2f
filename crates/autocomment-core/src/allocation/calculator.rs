//! Allocation arithmetic over a `PlatformBudget`.
//!
//! `PlatformBudget` lives in `autocomment-types`; this module provides an
//! extension trait (`BudgetMath`) with the pure sums and remaining-capacity
//! derivations every mutation is checked against. Remaining values are
//! signed: a negative remainder means the budget is already over its
//! ceiling, which is a violation signal rather than "0 left".

use autocomment_types::budget::{InteractionBucket, Metric, PlatformBudget};
use autocomment_types::config::QuotaPolicy;

/// Pure sums and remaining-capacity queries over one platform's budget.
pub trait BudgetMath {
    /// Feed plus every target. Zeros for an empty budget.
    fn totals(&self) -> InteractionBucket;

    /// Sum of all targets for one metric, feed excluded.
    fn targets_total(&self, metric: Metric) -> u64;

    /// `max - totals`, unfloored.
    fn remaining(&self, policy: &QuotaPolicy, metric: Metric) -> i64;

    /// Like `remaining`, but the target at `excluded` does not count.
    /// An out-of-range index excludes nothing.
    fn remaining_excluding(
        &self,
        policy: &QuotaPolicy,
        metric: Metric,
        excluded: Option<usize>,
    ) -> i64;

    /// `remaining` floored at zero, for rendering.
    fn display_remaining(&self, policy: &QuotaPolicy, metric: Metric) -> u32;

    /// Highest value the feed bucket may hold for `metric`: the ceiling
    /// minus everything the targets consume. Unfloored.
    fn feed_ceiling(&self, policy: &QuotaPolicy, metric: Metric) -> i64;

    /// Both likes and comments are at or above their ceilings.
    fn is_saturated(&self, policy: &QuotaPolicy) -> bool;

    /// Both sum bounds hold.
    fn within_quota(&self, policy: &QuotaPolicy) -> bool;
}

impl BudgetMath for PlatformBudget {
    fn totals(&self) -> InteractionBucket {
        InteractionBucket::new(
            saturate(self.feed.likes as u64 + self.targets_total(Metric::Likes)),
            saturate(self.feed.comments as u64 + self.targets_total(Metric::Comments)),
        )
    }

    fn targets_total(&self, metric: Metric) -> u64 {
        self.targets.iter().map(|t| t.get(metric) as u64).sum()
    }

    fn remaining(&self, policy: &QuotaPolicy, metric: Metric) -> i64 {
        self.remaining_excluding(policy, metric, None)
    }

    fn remaining_excluding(
        &self,
        policy: &QuotaPolicy,
        metric: Metric,
        excluded: Option<usize>,
    ) -> i64 {
        let targets: u64 = self
            .targets
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != excluded)
            .map(|(_, t)| t.get(metric) as u64)
            .sum();
        let used = self.feed.get(metric) as i64 + targets as i64;
        policy.max(metric) as i64 - used
    }

    fn display_remaining(&self, policy: &QuotaPolicy, metric: Metric) -> u32 {
        floor_u32(self.remaining(policy, metric))
    }

    fn feed_ceiling(&self, policy: &QuotaPolicy, metric: Metric) -> i64 {
        policy.max(metric) as i64 - self.targets_total(metric) as i64
    }

    fn is_saturated(&self, policy: &QuotaPolicy) -> bool {
        self.remaining(policy, Metric::Likes) <= 0 && self.remaining(policy, Metric::Comments) <= 0
    }

    fn within_quota(&self, policy: &QuotaPolicy) -> bool {
        Metric::ALL
            .iter()
            .all(|m| self.remaining(policy, *m) >= 0)
    }
}

/// Clamp a signed capacity into the displayable `u32` range.
pub fn floor_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomment_types::budget::KeywordTarget;
    use autocomment_types::platform::Platform;

    fn policy() -> QuotaPolicy {
        QuotaPolicy::default()
    }

    fn budget(feed: (u32, u32), targets: &[(u32, u32)]) -> PlatformBudget {
        let mut b = PlatformBudget::empty(Platform::Linkedin);
        b.feed = InteractionBucket::new(feed.0, feed.1);
        for (i, (l, c)) in targets.iter().enumerate() {
            b.targets.push(KeywordTarget::new(format!("#t{i}"), *l, *c));
        }
        b
    }

    #[test]
    fn test_totals_of_empty_budget_are_zero() {
        let b = PlatformBudget::empty(Platform::Twitter);
        assert_eq!(b.totals(), InteractionBucket::new(0, 0));
        assert_eq!(b.remaining(&policy(), Metric::Likes), 10);
    }

    #[test]
    fn test_totals_sum_feed_and_targets() {
        let b = budget((2, 1), &[(3, 2), (1, 4)]);
        assert_eq!(b.totals(), InteractionBucket::new(6, 7));
        assert_eq!(b.remaining(&policy(), Metric::Likes), 4);
        assert_eq!(b.remaining(&policy(), Metric::Comments), 3);
    }

    #[test]
    fn test_remaining_is_negative_when_over_ceiling() {
        let b = budget((8, 0), &[(4, 0)]);
        assert_eq!(b.remaining(&policy(), Metric::Likes), -2);
        assert_eq!(b.display_remaining(&policy(), Metric::Likes), 0);
        assert!(!b.within_quota(&policy()));
    }

    #[test]
    fn test_remaining_excluding_omits_one_target() {
        let b = budget((1, 1), &[(3, 2), (4, 5)]);
        assert_eq!(b.remaining_excluding(&policy(), Metric::Likes, Some(1)), 6);
        assert_eq!(b.remaining_excluding(&policy(), Metric::Comments, Some(0)), 4);
        assert_eq!(
            b.remaining_excluding(&policy(), Metric::Likes, Some(9)),
            b.remaining(&policy(), Metric::Likes)
        );
    }

    #[test]
    fn test_feed_ceiling_ignores_feed_itself() {
        let b = budget((5, 0), &[(5, 3)]);
        assert_eq!(b.feed_ceiling(&policy(), Metric::Likes), 5);
        assert_eq!(b.feed_ceiling(&policy(), Metric::Comments), 7);
    }

    #[test]
    fn test_saturation_requires_both_metrics() {
        assert!(!budget((10, 9), &[]).is_saturated(&policy()));
        assert!(budget((5, 5), &[(5, 5)]).is_saturated(&policy()));
    }
}
