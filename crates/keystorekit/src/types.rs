//! Core types for keystore state and convergence.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Whether the keystore should exist at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    /// The keystore file should exist and hold the declared settings
    #[default]
    Present,
    /// The keystore file should be removed
    Absent,
}

/// Observed state of the on-disk keystore.
///
/// Only presence and setting names are captured. The external tool never
/// reveals stored values, so none are retained. A snapshot is produced
/// fresh by each discovery and discarded after the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreState {
    /// Whether the keystore file exists at its well-known path
    pub exists: bool,
    /// Names of the settings currently stored (empty when absent)
    pub settings: BTreeSet<String>,
}

impl KeystoreState {
    /// State for a missing keystore.
    pub fn absent() -> Self {
        Self {
            exists: false,
            settings: BTreeSet::new(),
        }
    }

    /// State for an existing keystore with the given setting names.
    pub fn present<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exists: true,
            settings: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a setting of this name is currently stored.
    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains(name)
    }
}

/// Declared desired state for the keystore, one per reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredKeystore {
    /// Whether the store should exist
    pub ensure: Ensure,
    /// Setting name → secret value. Iterated in lexical name order.
    pub settings: BTreeMap<String, String>,
    /// Remove stored settings not named in `settings`
    pub purge: bool,
    /// Config directory the external tool targets (`ES_PATH_CONF`)
    pub configdir: PathBuf,
}

impl DesiredKeystore {
    /// A present, non-purging declaration with no settings.
    pub fn present(configdir: impl Into<PathBuf>) -> Self {
        Self {
            ensure: Ensure::Present,
            settings: BTreeMap::new(),
            purge: false,
            configdir: configdir.into(),
        }
    }

    /// An absent declaration.
    pub fn absent(configdir: impl Into<PathBuf>) -> Self {
        Self {
            ensure: Ensure::Absent,
            settings: BTreeMap::new(),
            purge: false,
            configdir: configdir.into(),
        }
    }

    /// Add a desired setting (builder style, used heavily in tests).
    pub fn with_setting(mut self, name: &str, value: &str) -> Self {
        self.settings.insert(name.to_string(), value.to_string());
        self
    }

    /// Enable purging of unlisted settings.
    pub fn with_purge(mut self) -> Self {
        self.purge = true;
        self
    }
}

/// One external mutation needed to converge the keystore.
///
/// Constructed by the planner, consumed in order by the executor, never
/// persisted.
#[derive(Clone, PartialEq, Eq)]
pub enum Operation {
    /// Initialize the keystore file (`create`)
    CreateStore,
    /// Delete the keystore file directly (the tool is not invoked)
    DestroyStore,
    /// Store a secret value under `name` (`add --force --stdin <name>`)
    AddSetting { name: String, value: String },
    /// Remove the stored setting `name` (`remove <name>`)
    RemoveSetting { name: String },
}

// Hand-written so the secret value can never leak through debug output.
impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateStore => write!(f, "CreateStore"),
            Operation::DestroyStore => write!(f, "DestroyStore"),
            Operation::AddSetting { name, .. } => {
                write!(f, "AddSetting {{ name: {name:?}, value: <redacted> }}")
            }
            Operation::RemoveSetting { name } => write!(f, "RemoveSetting {{ name: {name:?} }}"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::CreateStore => write!(f, "create keystore"),
            Operation::DestroyStore => write!(f, "remove keystore file"),
            Operation::AddSetting { name, .. } => write!(f, "add setting {name}"),
            Operation::RemoveSetting { name } => write!(f, "remove setting {name}"),
        }
    }
}

impl Operation {
    /// Whether this operation removes something.
    pub fn is_removal(&self) -> bool {
        matches!(self, Operation::DestroyStore | Operation::RemoveSetting { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_state_has_no_settings() {
        let state = KeystoreState::absent();
        assert!(!state.exists);
        assert!(state.settings.is_empty());
    }

    #[test]
    fn test_present_state_collects_names() {
        let state = KeystoreState::present(["b", "a", "a"]);
        assert!(state.exists);
        assert_eq!(state.settings.len(), 2);
        assert!(state.contains("a"));
        assert!(!state.contains("c"));
    }

    #[test]
    fn test_ensure_parses_lowercase() {
        #[derive(Deserialize)]
        struct Doc {
            ensure: Ensure,
        }

        let doc: Doc = toml::from_str("ensure = \"present\"").unwrap();
        assert_eq!(doc.ensure, Ensure::Present);
        let doc: Doc = toml::from_str("ensure = \"absent\"").unwrap();
        assert_eq!(doc.ensure, Ensure::Absent);
    }

    #[test]
    fn test_add_setting_debug_redacts_value() {
        let op = Operation::AddSetting {
            name: "s3.key".to_string(),
            value: "hunter2".to_string(),
        };
        let rendered = format!("{op:?}");
        assert!(rendered.contains("s3.key"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_display_names_the_operation() {
        let op = Operation::AddSetting {
            name: "s3.key".to_string(),
            value: "v".to_string(),
        };
        assert_eq!(op.to_string(), "add setting s3.key");
        assert_eq!(Operation::CreateStore.to_string(), "create keystore");
        assert!(Operation::DestroyStore.is_removal());
        assert!(!Operation::CreateStore.is_removal());
    }
}
