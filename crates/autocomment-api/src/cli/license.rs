//! License CLI commands: list, add.

use anyhow::{Result, anyhow};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use autocomment_types::license::{License, LicenseStatus};

use crate::state::AppState;

/// List the account's available licenses with masked keys.
pub async fn list_licenses(state: &AppState, owner: &str, json: bool) -> Result<()> {
    let licenses = state.service.licenses(owner).await?;

    if json {
        let masked: Vec<_> = licenses
            .iter()
            .map(|l| {
                serde_json::json!({
                    "id": l.id,
                    "name": l.name,
                    "key": l.masked_key(),
                    "status": l.status,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&masked)?);
        return Ok(());
    }

    if licenses.is_empty() {
        println!();
        println!(
            "  {} No available licenses. Platforms cannot be configured until one is added: {}",
            style("i").blue().bold(),
            style("acfg licenses add --name <name> --key <key>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Id").fg(Color::White),
        Cell::new("Key").fg(Color::White),
        Cell::new("Status").fg(Color::White),
    ]);

    for license in &licenses {
        table.add_row(vec![
            Cell::new(&license.name).fg(Color::Cyan),
            Cell::new(&license.id).fg(Color::DarkGrey),
            Cell::new(license.masked_key()),
            Cell::new(license.status).fg(Color::Green),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} license{}",
        style(licenses.len()).bold(),
        if licenses.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

/// Register (or update) a license record for `owner`.
pub async fn add_license(
    state: &AppState,
    owner: &str,
    name: String,
    key: String,
    id: Option<String>,
    status: &str,
    json: bool,
) -> Result<()> {
    let status: LicenseStatus = status.parse().map_err(|e: String| anyhow!(e))?;
    let license = License {
        id: id.unwrap_or_else(|| Uuid::now_v7().to_string()),
        key,
        name,
        status,
    };

    state.licenses.upsert(owner, &license).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "added": true,
                "id": license.id,
                "key": license.masked_key(),
                "status": license.status,
            })
        );
    } else {
        println!(
            "  {} License '{}' saved ({}, {})",
            style("✓").green().bold(),
            style(&license.name).bold(),
            license.masked_key(),
            license.status
        );
    }
    Ok(())
}
