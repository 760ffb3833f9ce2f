//! Terminal rendering for budgets, violations and refusals.
//!
//! Remaining capacity turns yellow once 80% of a limit is used and red when
//! nothing is left.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use autocomment_core::allocation::store::BudgetSummary;
use autocomment_types::budget::Metric;
use autocomment_types::error::AllocationError;
use autocomment_types::platform::TargetLabelKind;
use autocomment_types::violation::Violation;

fn remaining_color(remaining: u32, limit: u32) -> Color {
    if remaining == 0 {
        Color::Red
    } else if (remaining as f64) <= limit as f64 * 0.2 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Column heading for a platform's target list.
pub fn targets_heading(kind: TargetLabelKind) -> &'static str {
    match kind {
        TargetLabelKind::Keyword => "Keywords",
        TargetLabelKind::Subreddit => "Subreddits",
    }
}

/// One-line usage summary.
///
/// Example: `likes 10/10 . comments 8/10 . keywords 1/3`
pub fn usage_line(summary: &BudgetSummary, max_likes: u32, max_comments: u32) -> String {
    format!(
        "likes {}/{} . comments {}/{} . {} {}/{}",
        summary.totals.likes,
        max_likes,
        summary.totals.comments,
        max_comments,
        targets_heading(summary.label_kind).to_lowercase(),
        summary.targets.len(),
        summary.max_targets,
    )
}

/// Table of one platform's buckets with totals and remaining capacity.
pub fn budget_table(summary: &BudgetSummary, max_likes: u32, max_comments: u32) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new(targets_heading(summary.label_kind)).fg(Color::White),
        Cell::new("Likes").fg(Color::White),
        Cell::new("Comments").fg(Color::White),
    ]);

    table.add_row(vec![
        Cell::new("").fg(Color::DarkGrey),
        Cell::new("Feed").fg(Color::Cyan),
        Cell::new(summary.feed.likes),
        Cell::new(summary.feed.comments),
    ]);

    for (index, target) in summary.targets.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1).fg(Color::DarkGrey),
            Cell::new(&target.label).fg(Color::Cyan),
            Cell::new(target.allocation.likes),
            Cell::new(target.allocation.comments),
        ]);
    }

    table.add_row(vec![
        Cell::new(""),
        Cell::new("Used"),
        Cell::new(format!("{}/{}", summary.totals.likes, max_likes)),
        Cell::new(format!("{}/{}", summary.totals.comments, max_comments)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Remaining"),
        Cell::new(summary.remaining.likes)
            .fg(remaining_color(summary.remaining.likes, max_likes)),
        Cell::new(summary.remaining.comments)
            .fg(remaining_color(summary.remaining.comments, max_comments)),
    ]);

    table
}

pub fn render_violation(violation: &Violation) -> String {
    format!("  {} {}", style("✗").red().bold(), violation)
}

/// A refused operation, with the numbers when capacity ran out.
pub fn render_refusal(err: &AllocationError) -> String {
    let hint = match err {
        AllocationError::CapacityExceeded {
            metric: Metric::Likes,
            available,
            ..
        } => format!(" (at most {available} more likes)"),
        AllocationError::CapacityExceeded {
            metric: Metric::Comments,
            available,
            ..
        } => format!(" (at most {available} more comments)"),
        _ => String::new(),
    };
    format!(
        "  {} {}{}",
        style("!").yellow().bold(),
        style(err).yellow(),
        style(hint).dim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomment_core::allocation::store::BudgetStore;
    use autocomment_types::budget::{InteractionBucket, KeywordTarget, PlatformBudget};
    use autocomment_types::config::QuotaPolicy;
    use autocomment_types::platform::Platform;

    fn summary() -> BudgetSummary {
        let mut budget = PlatformBudget::empty(Platform::Reddit);
        budget.feed = InteractionBucket::new(3, 3);
        budget.targets.push(KeywordTarget::new("technology", 3, 2));
        budget.summary(&QuotaPolicy::default())
    }

    #[test]
    fn test_usage_line_uses_platform_wording() {
        assert_eq!(
            usage_line(&summary(), 10, 10),
            "likes 6/10 . comments 5/10 . subreddits 1/3"
        );
    }

    #[test]
    fn test_table_lists_every_bucket() {
        let text = console::strip_ansi_codes(&budget_table(&summary(), 10, 10).to_string())
            .to_string();
        assert!(text.contains("Subreddits"));
        assert!(text.contains("Feed"));
        assert!(text.contains("technology"));
        assert!(text.contains("6/10"));
        assert!(text.contains("Remaining"));
    }

    #[test]
    fn test_remaining_color_thresholds() {
        assert_eq!(remaining_color(0, 10), Color::Red);
        assert_eq!(remaining_color(2, 10), Color::Yellow);
        assert_eq!(remaining_color(5, 10), Color::Green);
    }

    #[test]
    fn test_refusal_names_available_capacity() {
        let err = AllocationError::CapacityExceeded {
            platform: Platform::Linkedin,
            metric: Metric::Comments,
            available: 2,
            attempted: 4,
            used: 8,
            limit: 10,
        };
        let text = console::strip_ansi_codes(&render_refusal(&err)).to_string();
        assert!(text.contains("at most 2 more comments"));
    }
}
