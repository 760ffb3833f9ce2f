//! Saved configuration CLI commands: show, validate.

use anyhow::{Result, bail};
use console::style;

use autocomment_core::allocation::store::BudgetStore;
use autocomment_core::surface::validate_draft;
use autocomment_types::config::QuotaPolicy;
use autocomment_types::draft::ConfigurationDraft;
use autocomment_types::platform::Platform;

use super::render::{budget_table, render_violation, usage_line};
use crate::state::AppState;

fn print_not_configured(owner: &str) {
    println!();
    println!(
        "  {} No saved configuration for '{}'. Create one with: {}",
        style("i").blue().bold(),
        style(owner).bold(),
        style("acfg edit").yellow()
    );
    println!();
}

/// Print every enabled platform's budget.
pub fn print_draft(draft: &ConfigurationDraft, policy: &QuotaPolicy) {
    for platform in Platform::ALL {
        let Some(budget) = draft.budget(platform).filter(|_| draft.is_enabled(platform)) else {
            continue;
        };
        let summary = budget.summary(policy);
        println!(
            "  {}  {}",
            style(platform.display_name()).cyan().bold(),
            style(usage_line(&summary, policy.max_likes, policy.max_comments)).dim()
        );
        println!("{}", budget_table(&summary, policy.max_likes, policy.max_comments));
        println!();
    }
}

/// `acfg show`
pub async fn show(state: &AppState, owner: &str, json: bool) -> Result<()> {
    let stored = state.service.stored(owner).await?;

    let Some(stored) = stored else {
        if json {
            println!("{}", serde_json::json!({ "configured": false, "owner_id": owner }));
        } else {
            print_not_configured(owner);
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
        return Ok(());
    }

    let policy = state.service.settings().policy;
    let draft = &stored.draft;

    println!();
    println!(
        "  {} Configuration for '{}' (updated {})",
        style("*").cyan().bold(),
        style(owner).bold(),
        style(stored.updated_at.format("%Y-%m-%d %H:%M")).dim()
    );
    println!(
        "  License: {}   Brand voice: {}   Promote product: {}",
        draft.license_id.as_deref().unwrap_or("none"),
        if draft.use_brand_voice { "on" } else { "off" },
        if draft.promote_product { "on" } else { "off" },
    );
    println!();

    if draft.enabled_platforms.is_empty() {
        println!("  No platforms enabled.");
        println!();
    }
    print_draft(draft, &policy);

    for violation in autocomment_core::surface::validation::drift(draft, &policy) {
        println!("{}", render_violation(&violation));
    }

    Ok(())
}

/// `acfg validate`
///
/// Fails when the saved configuration has any violation under the current
/// policy and licenses.
pub async fn validate(state: &AppState, owner: &str, json: bool) -> Result<()> {
    let Some(stored) = state.service.stored(owner).await? else {
        if json {
            println!("{}", serde_json::json!({ "configured": false, "owner_id": owner }));
        } else {
            print_not_configured(owner);
        }
        return Ok(());
    };

    let licenses = state.service.licenses(owner).await?;
    let violations = validate_draft(&stored.draft, &state.service.settings().policy, &licenses);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "valid": violations.is_empty(),
                "violations": violations,
            }))?
        );
    } else if violations.is_empty() {
        println!(
            "  {} Configuration for '{}' is valid",
            style("✓").green().bold(),
            style(owner).bold()
        );
    } else {
        println!();
        for violation in &violations {
            println!("{}", render_violation(violation));
        }
        println!();
    }

    if !violations.is_empty() {
        bail!(
            "{} violation{} found",
            violations.len(),
            if violations.len() == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
