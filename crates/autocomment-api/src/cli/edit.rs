//! Interactive editing session (`acfg edit`).
//!
//! Drives one `ConfigurationSurface` through dialoguer menus. Every refusal
//! is printed with its numbers and the session carries on; nothing is
//! written until the user submits.

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, Select};

use autocomment_core::surface::ConfigurationSurface;
use autocomment_types::budget::Metric;
use autocomment_types::draft::GlobalSettingsUpdate;
use autocomment_types::error::{AllocationError, SubmitError};
use autocomment_types::platform::Platform;

use super::render::{budget_table, render_refusal, render_violation, targets_heading, usage_line};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    Platform(Platform),
    TogglePlatforms,
    License,
    Settings,
    Validate,
    Submit,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlatformAction {
    Feed(Metric),
    AddTarget,
    EditTarget(usize),
    RemoveTarget(usize),
    Back,
}

/// Print a refusal and turn the result into an `Option`.
fn accepted<T>(result: Result<T, AllocationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            println!("{}", render_refusal(&err));
            None
        }
    }
}

fn main_menu(surface: &ConfigurationSurface) -> Vec<(String, MainAction)> {
    let policy = surface.policy();
    let mut items: Vec<(String, MainAction)> = Platform::ALL
        .into_iter()
        .filter(|p| surface.draft().is_enabled(*p))
        .filter_map(|p| {
            let summary = surface.summary(p)?;
            Some((
                format!(
                    "{:<10} {}",
                    p.display_name(),
                    usage_line(&summary, policy.max_likes, policy.max_comments)
                ),
                MainAction::Platform(p),
            ))
        })
        .collect();

    items.push(("Choose platforms".to_string(), MainAction::TogglePlatforms));
    items.push(("Select license".to_string(), MainAction::License));
    items.push(("Brand voice and product".to_string(), MainAction::Settings));
    items.push(("Validate".to_string(), MainAction::Validate));
    items.push(("Save".to_string(), MainAction::Submit));
    items.push(("Quit".to_string(), MainAction::Quit));
    items
}

fn platform_menu(surface: &ConfigurationSurface, platform: Platform) -> Vec<(String, PlatformAction)> {
    let kind = platform.label_kind();
    let noun = kind.field_name();
    let mut items = vec![
        ("Feed likes".to_string(), PlatformAction::Feed(Metric::Likes)),
        ("Feed comments".to_string(), PlatformAction::Feed(Metric::Comments)),
    ];

    let Some(summary) = surface.summary(platform) else {
        items.push(("< Back".to_string(), PlatformAction::Back));
        return items;
    };

    if summary.can_add_target {
        items.push((format!("Add {noun}"), PlatformAction::AddTarget));
    }
    for (index, target) in summary.targets.iter().enumerate() {
        items.push((format!("Edit {}", target.label), PlatformAction::EditTarget(index)));
    }
    for (index, target) in summary.targets.iter().enumerate() {
        items.push((format!("Remove {}", target.label), PlatformAction::RemoveTarget(index)));
    }
    items.push(("< Back".to_string(), PlatformAction::Back));
    items
}

fn choose<A: Copy>(prompt: &str, items: &[(String, A)]) -> Result<A> {
    let labels: Vec<&str> = items.iter().map(|(label, _)| label.as_str()).collect();
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(items[selection].1)
}

/// `acfg edit`
pub async fn run_editor(state: &AppState, owner: &str) -> Result<()> {
    let mut surface = state.service.open_session(owner).await?;

    println!();
    println!(
        "  {} Editing configuration for '{}'",
        style("*").cyan().bold(),
        style(owner).bold()
    );
    if surface.is_read_only() {
        println!(
            "  {} No available license: the configuration is read-only. Add one with: {}",
            style("!").yellow().bold(),
            style("acfg licenses add").yellow()
        );
    }
    let drift = surface.drift();
    if !drift.is_empty() {
        println!("  Your saved configuration exceeds the current limits:");
        for violation in &drift {
            println!("{}", render_violation(violation));
        }
    }
    println!();

    let mut modified = false;
    loop {
        let action = choose("Configuration", &main_menu(&surface))?;
        match action {
            MainAction::Platform(platform) => {
                modified |= edit_platform(&mut surface, platform)?;
            }
            MainAction::TogglePlatforms => {
                modified |= toggle_platforms(&mut surface)?;
            }
            MainAction::License => {
                modified |= select_license(&mut surface)?;
            }
            MainAction::Settings => {
                modified |= edit_settings(&mut surface)?;
            }
            MainAction::Validate => {
                let violations = surface.validate_all();
                if violations.is_empty() {
                    println!("  {} Ready to save", style("✓").green().bold());
                }
                for violation in &violations {
                    println!("{}", render_violation(violation));
                }
            }
            MainAction::Submit => match state.service.submit(owner, &surface).await {
                Ok(stored) => {
                    modified = false;
                    println!(
                        "  {} Configuration saved ({})",
                        style("✓").green().bold(),
                        stored.updated_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
                Err(SubmitError::Rejected(violations)) => {
                    println!("  Cannot save yet:");
                    for violation in &violations {
                        println!("{}", render_violation(violation));
                    }
                }
                Err(err @ SubmitError::Persistence(_)) => {
                    println!(
                        "  {} {}. Your changes are kept; try saving again.",
                        style("✗").red().bold(),
                        err
                    );
                }
            },
            MainAction::Quit => {
                if modified
                    && !Confirm::new()
                        .with_prompt("Quit without saving your changes?")
                        .default(false)
                        .interact()?
                {
                    continue;
                }
                break;
            }
        }
    }

    Ok(())
}

fn edit_platform(surface: &mut ConfigurationSurface, platform: Platform) -> Result<bool> {
    let mut modified = false;
    loop {
        if let Some(summary) = surface.summary(platform) {
            let policy = surface.policy();
            println!();
            println!("  {}", style(platform.display_name()).cyan().bold());
            println!("{}", budget_table(&summary, policy.max_likes, policy.max_comments));
        }

        match choose(platform.display_name(), &platform_menu(surface, platform))? {
            PlatformAction::Feed(metric) => {
                let Some(summary) = surface.summary(platform) else {
                    continue;
                };
                let value: u32 = Input::new()
                    .with_prompt(format!(
                        "Feed {metric} (up to {})",
                        summary.feed_ceiling.get(metric)
                    ))
                    .default(summary.feed.get(metric))
                    .interact_text()?;
                modified |= accepted(surface.set_feed(platform, metric, value)).is_some();
            }
            PlatformAction::AddTarget => {
                if accepted(surface.open_add(platform)).is_some() {
                    modified |= edit_target(surface, platform)?;
                }
            }
            PlatformAction::EditTarget(index) => {
                if accepted(surface.open_edit(platform, index)).is_some() {
                    modified |= edit_target(surface, platform)?;
                }
            }
            PlatformAction::RemoveTarget(index) => {
                modified |= accepted(surface.remove_target(platform, index)).is_some();
            }
            PlatformAction::Back => return Ok(modified),
        }
    }
}

/// Fill in the open draft until it commits or is discarded. Returns whether
/// a target was committed.
fn edit_target(surface: &mut ConfigurationSurface, platform: Platform) -> Result<bool> {
    let heading = targets_heading(platform.label_kind());
    loop {
        let Some(open) = surface.editor().cloned() else {
            return Ok(false);
        };

        let label: String = Input::new()
            .with_prompt(format!("{heading} label"))
            .with_initial_text(open.draft.label.clone())
            .allow_empty(true)
            .interact_text()?;
        surface.set_draft_label(label)?;

        for metric in Metric::ALL {
            loop {
                let ceiling = surface
                    .snapshot()
                    .editor
                    .map(|e| e.ceiling.get(metric))
                    .unwrap_or(0);
                let current = surface.editor().map(|o| o.draft.get(metric)).unwrap_or(0);
                let value: u32 = Input::new()
                    .with_prompt(format!("{metric} (up to {ceiling})"))
                    .default(current)
                    .interact_text()?;
                if accepted(surface.set_draft_value(metric, value)).is_some() {
                    break;
                }
            }
        }

        if accepted(surface.commit_target()).is_some() {
            println!("  {} Saved to the draft", style("✓").green().bold());
            return Ok(true);
        }

        let retry = Select::new()
            .items(&["Fix it", "Discard"])
            .default(0)
            .interact()?;
        if retry == 1 && discard(surface)? {
            return Ok(false);
        }
    }
}

/// Close the editor, asking before throwing away changes. Returns whether
/// the editor was closed.
fn discard(surface: &mut ConfigurationSurface) -> Result<bool> {
    match surface.discard_target(false) {
        Ok(_) => Ok(true),
        Err(AllocationError::UnsavedChanges) => {
            let confirmed = Confirm::new()
                .with_prompt("Discard unsaved changes?")
                .default(false)
                .interact()?;
            if confirmed {
                surface.discard_target(true)?;
            }
            Ok(confirmed)
        }
        Err(err) => Err(err.into()),
    }
}

fn toggle_platforms(surface: &mut ConfigurationSurface) -> Result<bool> {
    let labels: Vec<&str> = Platform::ALL.iter().map(|p| p.display_name()).collect();
    let enabled: Vec<bool> = Platform::ALL
        .iter()
        .map(|p| surface.draft().is_enabled(*p))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("Platforms (space to toggle)")
        .items(&labels)
        .defaults(&enabled)
        .interact()?;

    let mut modified = false;
    for (i, platform) in Platform::ALL.into_iter().enumerate() {
        let want = chosen.contains(&i);
        if want != enabled[i] {
            modified |= accepted(surface.set_platform_enabled(platform, want)).is_some();
        }
    }
    Ok(modified)
}

fn select_license(surface: &mut ConfigurationSurface) -> Result<bool> {
    let licenses: Vec<(String, String)> = surface
        .licenses()
        .iter()
        .filter(|l| l.is_available())
        .map(|l| (format!("{} ({})", l.name, l.masked_key()), l.id.clone()))
        .collect();

    if licenses.is_empty() {
        println!("{}", render_refusal(&AllocationError::LicenseRequired));
        return Ok(false);
    }

    let id = choose("License", &licenses.iter().map(|(l, id)| (l.clone(), id.as_str())).collect::<Vec<_>>())?
        .to_string();
    Ok(accepted(surface.select_license(&id)).is_some())
}

fn edit_settings(surface: &mut ConfigurationSurface) -> Result<bool> {
    let draft = surface.draft();
    let use_brand_voice = Confirm::new()
        .with_prompt("Write in your brand voice?")
        .default(draft.use_brand_voice)
        .interact()?;
    let promote_product = Confirm::new()
        .with_prompt("Mention your product?")
        .default(draft.promote_product)
        .interact()?;
    let product_details = if promote_product {
        let details: String = Input::new()
            .with_prompt("Product details")
            .with_initial_text(draft.product_details.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        Some(details)
    } else {
        None
    };

    let update = GlobalSettingsUpdate {
        use_brand_voice: Some(use_brand_voice),
        promote_product: Some(promote_product),
        product_details,
    };
    Ok(accepted(surface.update_settings(update)).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomment_core::event::ViolationBus;
    use autocomment_core::surface::{AllocatorSettings, default_draft};
    use autocomment_types::config::PlatformDefaults;
    use autocomment_types::license::{License, LicenseStatus};

    fn surface() -> ConfigurationSurface {
        let license = License {
            id: "lic-1".into(),
            key: "KEY-0001".into(),
            name: "Main".into(),
            status: LicenseStatus::Active,
        };
        let mut draft = default_draft(&PlatformDefaults::builtin());
        draft.license_id = Some(license.id.clone());
        ConfigurationSurface::new(
            AllocatorSettings::default(),
            vec![license],
            draft,
            ViolationBus::default(),
        )
    }

    #[test]
    fn test_main_menu_lists_enabled_platforms_first() {
        let mut surface = surface();
        surface.enable_platform(Platform::Reddit).unwrap();

        let actions: Vec<MainAction> = main_menu(&surface).into_iter().map(|(_, a)| a).collect();
        assert_eq!(actions[0], MainAction::Platform(Platform::Linkedin));
        assert_eq!(actions[1], MainAction::Platform(Platform::Reddit));
        assert_eq!(actions.last(), Some(&MainAction::Quit));
    }

    #[test]
    fn test_platform_menu_hides_add_when_target_cannot_be_added() {
        let mut surface = surface();
        let actions: Vec<PlatformAction> = platform_menu(&surface, Platform::Linkedin)
            .into_iter()
            .map(|(_, a)| a)
            .collect();
        assert!(actions.contains(&PlatformAction::AddTarget));

        // Saturate comments too: LinkedIn feed 5/5 + #sales 5/3.
        surface.set_feed(Platform::Linkedin, Metric::Comments, 7).unwrap();
        let actions: Vec<PlatformAction> = platform_menu(&surface, Platform::Linkedin)
            .into_iter()
            .map(|(_, a)| a)
            .collect();
        assert!(!actions.contains(&PlatformAction::AddTarget));
        assert!(actions.contains(&PlatformAction::EditTarget(0)));
        assert!(actions.contains(&PlatformAction::RemoveTarget(0)));
    }

    #[test]
    fn test_reddit_menu_uses_subreddit_wording() {
        let mut surface = surface();
        surface.enable_platform(Platform::Reddit).unwrap();
        let labels: Vec<String> = platform_menu(&surface, Platform::Reddit)
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert!(labels.contains(&"Add subreddit".to_string()));
    }

    #[test]
    fn test_accepted_swallows_refusals() {
        assert_eq!(accepted::<u32>(Ok(3)), Some(3));
        assert_eq!(accepted::<u32>(Err(AllocationError::EditorBusy)), None);
    }
}
