//! Terminal rendering for keystore state and planned changes.
//!
//! Setting values never pass through here; operations render by name only.

use colored::Colorize;
use keystorekit::{KeystoreState, Operation};

/// Render the planned operations as a diff.
pub fn display_plan(ops: &[Operation]) {
    if ops.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!("  {}", "Keystore changes".bold());
    for op in ops {
        let symbol = if op.is_removal() {
            "-".red()
        } else {
            "+".green()
        };
        println!("    {symbol} {op}");
    }

    let additions = ops.iter().filter(|op| !op.is_removal()).count();
    let removals = ops.len() - additions;
    println!();
    println!(
        "  Summary: {} operations ({} additions, {} removals)",
        ops.len().to_string().bold(),
        additions.to_string().green(),
        removals.to_string().red()
    );
}

/// Render the observed keystore state. Names only, never values.
pub fn display_state(state: &KeystoreState) {
    println!();
    if !state.exists {
        println!("  {} Keystore absent", "○".dimmed());
        return;
    }

    println!(
        "  {} Keystore present ({} settings)",
        "✓".green(),
        state.settings.len()
    );
    for name in &state.settings {
        println!("    • {name}");
    }
}
