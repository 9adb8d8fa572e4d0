//! Keystore declaration loading.
//!
//! A declaration is a small TOML document describing the desired state of
//! the host's Elasticsearch keystore:
//!
//! ```toml
//! ensure = "present"
//! purge = false
//! configdir = "/etc/elasticsearch"
//!
//! [settings]
//! "s3.client.default.access_key" = "AKIA..."
//!
//! [install]
//! platform_family = "redhat"
//! ```
//!
//! Some provisioning layers hand the settings table over wrapped in a
//! single-element array; that wrapping is unwrapped here at the boundary
//! so the rest of the tool only ever sees one flat name → value mapping.

use anyhow::{Context, Result};
use keystorekit::{DesiredKeystore, Ensure};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::paths;

/// Parsed keystore declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    /// Whether the keystore should exist
    #[serde(default)]
    pub ensure: Ensure,

    /// Declared setting names and secret values
    #[serde(default, deserialize_with = "unwrap_settings")]
    pub settings: BTreeMap<String, String>,

    /// Remove stored settings not declared above
    #[serde(default)]
    pub purge: bool,

    /// Config directory the external tool targets
    #[serde(default = "default_configdir")]
    pub configdir: String,

    /// Host installation overrides
    #[serde(default)]
    pub install: InstallConfig,
}

/// Overrides for where Elasticsearch lives and who owns the keystore.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallConfig {
    /// OS family selecting the standard layout (default: debian)
    #[serde(default)]
    pub platform_family: Option<String>,

    /// Elasticsearch home directory override
    #[serde(default)]
    pub home_dir: Option<String>,

    /// Environment defaults directory override
    #[serde(default)]
    pub defaults_dir: Option<String>,

    /// Keystore file path override
    #[serde(default)]
    pub keystore_path: Option<String>,

    /// Run the tool as the keystore owner (disable for local testing)
    #[serde(default = "default_true")]
    pub run_as_owner: bool,

    /// Owner user override (default: elasticsearch)
    #[serde(default)]
    pub run_as_user: Option<String>,

    /// Owner group override (default: elasticsearch)
    #[serde(default)]
    pub run_as_group: Option<String>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            platform_family: None,
            home_dir: None,
            defaults_dir: None,
            keystore_path: None,
            run_as_owner: true,
            run_as_user: None,
            run_as_group: None,
        }
    }
}

impl Declaration {
    /// Load a declaration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid keystore declaration in {}", path.display()))
    }

    /// The desired state this declaration describes.
    pub fn desired(&self) -> DesiredKeystore {
        DesiredKeystore {
            ensure: self.ensure,
            settings: self.settings.clone(),
            purge: self.purge,
            configdir: paths::expand(&self.configdir),
        }
    }
}

fn default_configdir() -> String {
    keystorekit::DEFAULT_CONFIG_DIR.to_string()
}

fn default_true() -> bool {
    true
}

/// Accept `[settings]` as a table or a single-element array of tables.
fn unwrap_settings<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Table(BTreeMap<String, String>),
        Wrapped(Vec<BTreeMap<String, String>>),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Table(map) => Ok(map),
        Raw::Wrapped(mut list) => {
            if list.len() > 1 {
                return Err(serde::de::Error::custom(
                    "settings may wrap at most one table",
                ));
            }
            Ok(list.pop().unwrap_or_default())
        }
    }
}
