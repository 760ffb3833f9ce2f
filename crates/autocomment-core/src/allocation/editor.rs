//! Add/edit workflow for a single keyword target.
//!
//! The editor is either closed or holds one open draft, created by
//! `open_add` or `open_edit(index)`. Nothing the draft holds is visible in the
//! budget until `commit` succeeds; a refused commit keeps the draft open for
//! correction. While editing, the target's own committed allocation does not
//! count against its ceiling.

use autocomment_types::budget::{KeywordTarget, Metric, PlatformBudget};
use autocomment_types::config::{LabelStyle, QuotaPolicy};
use autocomment_types::error::AllocationError;
use autocomment_types::platform::Platform;
use serde::Serialize;

use super::calculator::{BudgetMath, floor_u32};
use super::capacity_exceeded;
use super::label::normalize_label;

/// Suggested likes for a freshly opened add draft, capped by what remains.
pub const SUGGESTED_LIKES: u32 = 5;
/// Suggested comments for a freshly opened add draft, capped by what remains.
pub const SUGGESTED_COMMENTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "index", rename_all = "snake_case")]
pub enum EditorMode {
    Adding,
    Editing(usize),
}

impl EditorMode {
    /// Target whose allocation is excluded from the remaining-capacity sum.
    pub fn excluded(&self) -> Option<usize> {
        match self {
            EditorMode::Adding => None,
            EditorMode::Editing(index) => Some(*index),
        }
    }
}

/// An open editor: which target is being drafted and what it started from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenDraft {
    pub platform: Platform,
    pub mode: EditorMode,
    pub draft: KeywordTarget,
    pub seed: KeywordTarget,
}

impl OpenDraft {
    pub fn is_dirty(&self) -> bool {
        self.draft != self.seed
    }
}

#[derive(Debug, Clone, Default)]
pub struct TargetEditor {
    open: Option<OpenDraft>,
}

impl TargetEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&OpenDraft> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Platform the open draft belongs to.
    pub fn platform(&self) -> Option<Platform> {
        self.open.as_ref().map(|o| o.platform)
    }

    pub fn is_dirty(&self) -> bool {
        self.open.as_ref().is_some_and(OpenDraft::is_dirty)
    }

    /// Open a blank draft for a new target.
    ///
    /// Refused while another draft is open, when the platform already holds
    /// `max_targets` targets, or when both likes and comments are used up.
    pub fn open_add(
        &mut self,
        budget: &PlatformBudget,
        policy: &QuotaPolicy,
    ) -> Result<&KeywordTarget, AllocationError> {
        if self.open.is_some() {
            return Err(AllocationError::EditorBusy);
        }
        if budget.targets.len() >= policy.max_targets {
            return Err(AllocationError::TargetLimitReached {
                platform: budget.platform,
                kind: budget.platform.label_kind(),
                limit: policy.max_targets,
            });
        }
        if budget.is_saturated(policy) {
            return Err(AllocationError::PlatformSaturated {
                platform: budget.platform,
                max_likes: policy.max_likes,
                max_comments: policy.max_comments,
            });
        }

        let seed = KeywordTarget::new(
            "",
            SUGGESTED_LIKES.min(budget.display_remaining(policy, Metric::Likes)),
            SUGGESTED_COMMENTS.min(budget.display_remaining(policy, Metric::Comments)),
        );
        Ok(self.start(budget.platform, EditorMode::Adding, seed))
    }

    /// Open a draft seeded from the target at `index`.
    pub fn open_edit(
        &mut self,
        budget: &PlatformBudget,
        index: usize,
    ) -> Result<&KeywordTarget, AllocationError> {
        if self.open.is_some() {
            return Err(AllocationError::EditorBusy);
        }
        let seed = budget
            .targets
            .get(index)
            .cloned()
            .ok_or(AllocationError::TargetNotFound {
                platform: budget.platform,
                index,
            })?;
        Ok(self.start(budget.platform, EditorMode::Editing(index), seed))
    }

    fn start(&mut self, platform: Platform, mode: EditorMode, seed: KeywordTarget) -> &KeywordTarget {
        let open = self.open.insert(OpenDraft {
            platform,
            mode,
            draft: seed.clone(),
            seed,
        });
        &open.draft
    }

    /// Replace the draft label. Rules are checked at commit.
    pub fn set_label(&mut self, label: impl Into<String>) -> Result<(), AllocationError> {
        let open = self.open.as_mut().ok_or(AllocationError::EditorClosed)?;
        open.draft.label = label.into();
        Ok(())
    }

    /// Move one draft counter by `delta`, clamped at 0.
    ///
    /// An increment past `remaining_excluding` is refused and leaves the
    /// draft unchanged. Returns the new value.
    pub fn adjust(
        &mut self,
        budget: &PlatformBudget,
        policy: &QuotaPolicy,
        metric: Metric,
        delta: i64,
    ) -> Result<u32, AllocationError> {
        let current = self.draft_value(metric)?;
        let value = (current as i64).saturating_add(delta).max(0);
        self.set_value(budget, policy, metric, u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// Direct numeric entry for one draft counter. Values above the ceiling
    /// are refused rather than clamped.
    pub fn set_value(
        &mut self,
        budget: &PlatformBudget,
        policy: &QuotaPolicy,
        metric: Metric,
        value: u32,
    ) -> Result<u32, AllocationError> {
        let open = self.open.as_mut().ok_or(AllocationError::EditorClosed)?;
        let current = open.draft.get(metric);
        let ceiling = budget.remaining_excluding(policy, metric, open.mode.excluded());
        if value > current && value as i64 > ceiling {
            return Err(capacity_exceeded(budget.platform, policy, metric, ceiling, value));
        }
        open.draft.allocation.set(metric, value);
        Ok(value)
    }

    /// Highest value the draft may hold for `metric`, floored at 0.
    pub fn ceiling(
        &self,
        budget: &PlatformBudget,
        policy: &QuotaPolicy,
        metric: Metric,
    ) -> Result<u32, AllocationError> {
        let open = self.open.as_ref().ok_or(AllocationError::EditorClosed)?;
        Ok(floor_u32(budget.remaining_excluding(
            policy,
            metric,
            open.mode.excluded(),
        )))
    }

    /// Validate the draft and write it into `budget`.
    ///
    /// Rules, first failure wins: label rules, likes ceiling, comments
    /// ceiling, then the target count for adds. On success the target is
    /// appended (add) or replaced in place (edit), the editor closes, and the
    /// committed index is returned.
    pub fn commit(
        &mut self,
        budget: &mut PlatformBudget,
        policy: &QuotaPolicy,
        style: LabelStyle,
    ) -> Result<usize, AllocationError> {
        let open = self.open.as_ref().ok_or(AllocationError::EditorClosed)?;
        let kind = budget.platform.label_kind();

        let label = normalize_label(kind, style, &open.draft.label).map_err(|violation| {
            AllocationError::InvalidLabel {
                platform: budget.platform,
                kind,
                violation,
            }
        })?;

        for metric in Metric::ALL {
            let requested = open.draft.get(metric);
            let ceiling = budget.remaining_excluding(policy, metric, open.mode.excluded());
            if requested as i64 > ceiling {
                return Err(capacity_exceeded(
                    budget.platform,
                    policy,
                    metric,
                    ceiling,
                    requested,
                ));
            }
        }

        let target = KeywordTarget {
            label,
            allocation: open.draft.allocation,
        };
        let index = match open.mode {
            EditorMode::Adding => {
                if budget.targets.len() >= policy.max_targets {
                    return Err(AllocationError::TargetLimitReached {
                        platform: budget.platform,
                        kind,
                        limit: policy.max_targets,
                    });
                }
                budget.targets.push(target);
                budget.targets.len() - 1
            }
            EditorMode::Editing(index) => {
                let slot = budget.targets.get_mut(index).ok_or(
                    AllocationError::TargetNotFound {
                        platform: budget.platform,
                        index,
                    },
                )?;
                *slot = target;
                index
            }
        };

        self.open = None;
        Ok(index)
    }

    /// Close without touching the budget. Returns the abandoned draft.
    pub fn discard(&mut self) -> Option<OpenDraft> {
        self.open.take()
    }

    fn draft_value(&self, metric: Metric) -> Result<u32, AllocationError> {
        self.open
            .as_ref()
            .map(|o| o.draft.get(metric))
            .ok_or(AllocationError::EditorClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomment_types::budget::InteractionBucket;
    use autocomment_types::error::LabelViolation;

    fn policy() -> QuotaPolicy {
        QuotaPolicy::default()
    }

    fn empty() -> PlatformBudget {
        PlatformBudget::empty(Platform::Linkedin)
    }

    fn add(
        editor: &mut TargetEditor,
        budget: &mut PlatformBudget,
        label: &str,
        likes: u32,
        comments: u32,
    ) -> Result<usize, AllocationError> {
        editor.open_add(budget, &policy())?;
        editor.set_label(label)?;
        editor.set_value(budget, &policy(), Metric::Likes, 0)?;
        editor.set_value(budget, &policy(), Metric::Comments, 0)?;
        editor.set_value(budget, &policy(), Metric::Likes, likes)?;
        editor.set_value(budget, &policy(), Metric::Comments, comments)?;
        editor.commit(budget, &policy(), LabelStyle::Verbatim)
    }

    #[test]
    fn test_open_add_seeds_suggestion_capped_by_remaining() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        budget.feed = InteractionBucket::new(8, 9);

        let draft = editor.open_add(&budget, &policy()).unwrap();
        assert_eq!(draft.allocation, InteractionBucket::new(2, 1));
        assert_eq!(draft.label, "");
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_second_open_is_refused_while_busy() {
        let mut editor = TargetEditor::new();
        let budget = empty();
        editor.open_add(&budget, &policy()).unwrap();
        assert_eq!(
            editor.open_add(&budget, &policy()).unwrap_err(),
            AllocationError::EditorBusy
        );
    }

    #[test]
    fn test_open_add_refused_when_saturated() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        budget.feed = InteractionBucket::new(10, 10);
        assert!(matches!(
            editor.open_add(&budget, &policy()),
            Err(AllocationError::PlatformSaturated { .. })
        ));
        assert!(!editor.is_open());
    }

    #[test]
    fn test_open_add_allowed_when_only_one_metric_saturated() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        budget.feed = InteractionBucket::new(10, 4);
        let draft = editor.open_add(&budget, &policy()).unwrap();
        assert_eq!(draft.allocation, InteractionBucket::new(0, 3));
    }

    #[test]
    fn test_adjust_past_ceiling_reports_remaining() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        budget.feed = InteractionBucket::new(7, 0);
        editor.open_add(&budget, &policy()).unwrap();

        // seed is min(5, 3) = 3, already at the ceiling
        let err = editor.adjust(&budget, &policy(), Metric::Likes, 1).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::CapacityExceeded {
                available: 3,
                attempted: 4,
                used: 7,
                limit: 10,
                ..
            }
        ));
        assert_eq!(editor.current().unwrap().draft.get(Metric::Likes), 3);
        assert_eq!(editor.adjust(&budget, &policy(), Metric::Likes, -5).unwrap(), 0);
    }

    #[test]
    fn test_commit_checks_label_before_capacity() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        budget.feed = InteractionBucket::new(9, 0);
        editor.open_add(&budget, &policy()).unwrap();
        editor.set_label("two words").unwrap();

        let err = editor
            .commit(&mut budget, &policy(), LabelStyle::Verbatim)
            .unwrap_err();
        assert_eq!(
            err,
            AllocationError::InvalidLabel {
                platform: Platform::Linkedin,
                kind: autocomment_types::platform::TargetLabelKind::Keyword,
                violation: LabelViolation::ContainsWhitespace,
            }
        );
        assert!(editor.is_open());
        assert!(budget.targets.is_empty());
    }

    #[test]
    fn test_commit_rechecks_capacity_after_feed_changed() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        editor.open_add(&budget, &policy()).unwrap();
        editor.set_label("#sales").unwrap();
        // feed grows underneath the open draft
        budget.feed.likes = 8;

        let err = editor
            .commit(&mut budget, &policy(), LabelStyle::Verbatim)
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::CapacityExceeded {
                metric: Metric::Likes,
                available: 2,
                attempted: 5,
                ..
            }
        ));
        assert!(editor.is_open());
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        add(&mut editor, &mut budget, "#a", 2, 2).unwrap();
        add(&mut editor, &mut budget, "#b", 2, 2).unwrap();
        add(&mut editor, &mut budget, "#c", 2, 2).unwrap();

        editor.open_edit(&budget, 1).unwrap();
        editor.set_label("#bee").unwrap();
        editor.adjust(&budget, &policy(), Metric::Likes, 4).unwrap();
        assert_eq!(
            editor.commit(&mut budget, &policy(), LabelStyle::Verbatim).unwrap(),
            1
        );

        let labels: Vec<_> = budget.targets.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["#a", "#bee", "#c"]);
        assert_eq!(budget.targets[1].get(Metric::Likes), 6);
        assert!(!editor.is_open());
    }

    #[test]
    fn test_open_edit_unknown_index() {
        let mut editor = TargetEditor::new();
        assert_eq!(
            editor.open_edit(&empty(), 0).unwrap_err(),
            AllocationError::TargetNotFound {
                platform: Platform::Linkedin,
                index: 0
            }
        );
    }

    #[test]
    fn test_discard_leaves_budget_untouched() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        add(&mut editor, &mut budget, "#a", 2, 2).unwrap();
        let before = budget.clone();

        editor.open_edit(&budget, 0).unwrap();
        editor.adjust(&budget, &policy(), Metric::Comments, -1).unwrap();
        assert!(editor.is_dirty());

        let abandoned = editor.discard().unwrap();
        assert_eq!(abandoned.draft.get(Metric::Comments), 1);
        assert_eq!(budget, before);
        assert!(editor.discard().is_none());
    }

    #[test]
    fn test_closed_editor_operations_are_refused() {
        let mut editor = TargetEditor::new();
        let mut budget = empty();
        assert_eq!(editor.set_label("x"), Err(AllocationError::EditorClosed));
        assert_eq!(
            editor.adjust(&budget, &policy(), Metric::Likes, 1),
            Err(AllocationError::EditorClosed)
        );
        assert_eq!(
            editor.commit(&mut budget, &policy(), LabelStyle::Verbatim),
            Err(AllocationError::EditorClosed)
        );
    }
}
