//! `keywarden status` - show the keystore's current state.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::ui;

pub fn run(config: Option<&Path>) -> Result<()> {
    let resource = super::resource(config)?;
    let (actual, ops) = resource.plan()?;

    ui::display_state(&actual);

    println!();
    if ops.is_empty() {
        println!("  {} In sync with declaration", "✓".green());
    } else {
        println!(
            "  {} {} pending changes - run {} to converge",
            "~".yellow(),
            ops.len(),
            "keywarden apply".bold()
        );
    }

    Ok(())
}
