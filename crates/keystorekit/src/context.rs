//! Execution context for keystore tool invocations.
//!
//! The original deployment tooling bound the tool path and owner identity
//! as process-wide state. Here everything an invocation needs is a plain
//! immutable value built once at startup and passed into the runner.

use crate::platform::{self, InstallLayout};
use std::path::PathBuf;

/// Environment variable telling the tool which config directory to target.
pub const ENV_CONFIG_DIR: &str = "ES_PATH_CONF";

/// System identity owning the keystore files.
pub const KEYSTORE_OWNER: &str = "elasticsearch";

/// Identity the external tool runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAs {
    pub user: String,
    pub group: String,
}

impl RunAs {
    /// The dedicated keystore owner (`elasticsearch:elasticsearch`).
    pub fn keystore_owner() -> Self {
        Self {
            user: KEYSTORE_OWNER.to_string(),
            group: KEYSTORE_OWNER.to_string(),
        }
    }
}

/// Everything needed to invoke the external keystore tool.
///
/// Built once at startup and passed by reference into every call; the
/// keystore path doubles as the store's presence signal during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecContext {
    /// Resolved path of the `elasticsearch-keystore` executable
    pub executable: PathBuf,
    /// Host-global path of the keystore file
    pub keystore_path: PathBuf,
    /// Identity to run the tool as; `None` keeps the current identity
    pub run_as: Option<RunAs>,
}

impl ExecContext {
    /// Context for a standard installation under the given layout.
    pub fn new(layout: &InstallLayout) -> Self {
        Self {
            executable: layout.keystore_executable(),
            keystore_path: platform::default_keystore_path(),
            run_as: None,
        }
    }

    /// Override the executable path.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = path.into();
        self
    }

    /// Override the keystore file path.
    pub fn with_keystore_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.keystore_path = path.into();
        self
    }

    /// Run the tool under the given identity.
    pub fn with_run_as(mut self, run_as: RunAs) -> Self {
        self.run_as = Some(run_as);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformFamily;

    #[test]
    fn test_context_from_layout() {
        let layout = InstallLayout::resolve(PlatformFamily::Debian);
        let ctx = ExecContext::new(&layout);
        assert_eq!(
            ctx.executable,
            PathBuf::from("/usr/share/elasticsearch/bin/elasticsearch-keystore")
        );
        assert_eq!(
            ctx.keystore_path,
            PathBuf::from("/etc/elasticsearch/elasticsearch.keystore")
        );
        assert!(ctx.run_as.is_none());
    }

    #[test]
    fn test_context_overrides() {
        let layout = InstallLayout::resolve(PlatformFamily::Debian);
        let ctx = ExecContext::new(&layout)
            .with_executable("/tmp/fake-keystore")
            .with_keystore_path("/tmp/es/elasticsearch.keystore")
            .with_run_as(RunAs::keystore_owner());
        assert_eq!(ctx.executable, PathBuf::from("/tmp/fake-keystore"));
        assert_eq!(ctx.run_as.as_ref().unwrap().user, "elasticsearch");
    }
}
