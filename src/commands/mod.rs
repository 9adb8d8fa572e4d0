//! Subcommand implementations.

pub mod apply;
pub mod plan;
pub mod status;

use anyhow::Result;
use std::path::Path;

use crate::config::Declaration;
use crate::paths;
use crate::resource::KeystoreResource;

/// Load the declaration and build the keystore resource.
fn resource(config: Option<&Path>) -> Result<KeystoreResource> {
    let path = paths::declaration_path(config)?;
    log::info!("Using declaration {}", path.display());
    let decl = Declaration::load(&path)?;
    KeystoreResource::from_declaration(&decl)
}
