//! `keywarden apply` - converge the keystore to the declared state.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::ui;

pub fn run(config: Option<&Path>, yes: bool) -> Result<()> {
    let resource = super::resource(config)?;
    let (_, ops) = resource.plan()?;

    ui::display_plan(&ops);

    if ops.is_empty() {
        return Ok(());
    }

    if !yes && !confirm_proceed()? {
        println!();
        println!("  {} Aborted", "✗".red());
        return Ok(());
    }

    let state = resource.apply()?;

    println!();
    println!(
        "  {} Keystore converged ({} operations applied)",
        "✓".green().bold(),
        ops.len()
    );
    ui::display_state(&state);

    Ok(())
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}
