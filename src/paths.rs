//! Declaration file resolution for keywarden
//!
//! The keystore declaration is a TOML file describing the desired store
//! state. Its location can be pinned per invocation or per environment.
//!
//! # Resolution Priority
//!
//! 1. `--config <FILE>` command-line flag
//! 2. `KEYWARDEN_CONFIG` environment variable
//! 3. Default: `~/.config/keywarden/keystore.toml`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for declaration file override
pub const ENV_CONFIG_FILE: &str = "KEYWARDEN_CONFIG";

/// Resolve the declaration file path.
pub fn declaration_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(ENV_CONFIG_FILE) {
        let path = expand(&path);
        log::debug!(
            "Using declaration from {}: {}",
            ENV_CONFIG_FILE,
            path.display()
        );
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("keywarden").join("keystore.toml"))
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}
