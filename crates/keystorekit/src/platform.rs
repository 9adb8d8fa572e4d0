//! Install layout resolution per platform family.
//!
//! Elasticsearch packages land in different places depending on the OS
//! family. The layout is resolved once at startup from an explicitly
//! configured family and passed into the execution context — it is never
//! queried lazily or cached in global state.
//!
//! # Layouts
//!
//! | Family  | Defaults dir     | Home dir                    |
//! |---------|------------------|-----------------------------|
//! | RedHat  | /etc/sysconfig   | /usr/share/elasticsearch    |
//! | OpenBSD | /etc/default     | /usr/local/elasticsearch    |
//! | others  | /etc/default     | /usr/share/elasticsearch    |

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// OS family the host's Elasticsearch package was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    RedHat,
    Debian,
    Suse,
    FreeBsd,
    OpenBsd,
}

impl FromStr for PlatformFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "redhat" => Ok(Self::RedHat),
            "debian" => Ok(Self::Debian),
            "suse" => Ok(Self::Suse),
            "freebsd" => Ok(Self::FreeBsd),
            "openbsd" => Ok(Self::OpenBsd),
            _ => Err(Error::UnknownPlatform {
                family: s.to_string(),
            }),
        }
    }
}

/// Where the Elasticsearch installation lives on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Directory holding the package's environment defaults file
    pub defaults_dir: PathBuf,
    /// Elasticsearch home directory (contains `bin/`)
    pub home_dir: PathBuf,
}

impl InstallLayout {
    /// Resolve the standard layout for a platform family.
    pub fn resolve(family: PlatformFamily) -> Self {
        let defaults_dir = match family {
            PlatformFamily::RedHat => "/etc/sysconfig",
            _ => "/etc/default",
        };

        let home_dir = match family {
            PlatformFamily::OpenBsd => "/usr/local/elasticsearch",
            _ => "/usr/share/elasticsearch",
        };

        Self {
            defaults_dir: PathBuf::from(defaults_dir),
            home_dir: PathBuf::from(home_dir),
        }
    }

    /// Path of the `elasticsearch-keystore` executable under this layout.
    pub fn keystore_executable(&self) -> PathBuf {
        self.home_dir.join("bin").join("elasticsearch-keystore")
    }

    /// Override the home directory (and with it the executable path).
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = dir.into();
        self
    }

    /// Override the defaults directory.
    pub fn with_defaults_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.defaults_dir = dir.into();
        self
    }
}

/// Configuration root whose keystore file signals store presence.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/elasticsearch";

/// File name of the keystore inside the configuration root.
pub const KEYSTORE_FILE_NAME: &str = "elasticsearch.keystore";

/// The host-global keystore path: `/etc/elasticsearch/elasticsearch.keystore`.
///
/// Presence of this file is the sole signal that a keystore exists. It is
/// independent of the per-invocation config directory.
pub fn default_keystore_path() -> PathBuf {
    Path::new(DEFAULT_CONFIG_DIR).join(KEYSTORE_FILE_NAME)
}
