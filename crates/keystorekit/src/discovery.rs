//! Keystore state discovery.
//!
//! Presence is signaled solely by the keystore file at its well-known
//! path. Setting names come from the tool's `list` output; values are
//! never read back because the tool cannot export them.

use crate::error::{Error, Result};
use crate::runner::KeystoreTool;
use crate::types::KeystoreState;
use std::path::Path;

/// Discover the current state of the keystore.
///
/// A missing keystore file yields an absent state without invoking the
/// tool. A failed `list` on an existing store yields
/// [`Error::DiscoveryIndeterminate`] — an unreadable store is not an
/// absent one.
pub fn discover(tool: &KeystoreTool, configdir: &Path) -> Result<KeystoreState> {
    if !tool.context().keystore_path.exists() {
        return Ok(KeystoreState::absent());
    }

    let stdout = tool.run(&["list"], configdir, None).map_err(|e| match e {
        Error::CommandFailed { output } => Error::DiscoveryIndeterminate { output },
        other => other,
    })?;

    Ok(KeystoreState::present(
        stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from),
    ))
}
