//! Error types for keystore operations.
//!
//! The external `elasticsearch-keystore` tool reports failures through its
//! exit status and diagnostic text. That text is carried verbatim so
//! operators can diagnose tool-specific failures (wrong passphrase, corrupt
//! store) without this crate reinterpreting them. Nothing here is retried.

use thiserror::Error;

/// Errors that can occur while managing a keystore.
#[derive(Debug, Error)]
pub enum Error {
    /// The external tool exited non-zero.
    #[error("elasticsearch-keystore failed: {output}")]
    CommandFailed {
        /// Captured stdout/stderr from the failed invocation
        output: String,
    },

    /// Listing an existing keystore failed.
    ///
    /// Distinct from [`Error::CommandFailed`] so callers cannot mistake an
    /// unreadable store for an absent one.
    #[error("could not list existing keystore: {output}")]
    DiscoveryIndeterminate {
        /// Captured stdout/stderr from the failed list invocation
        output: String,
    },

    /// The external executable could not be started at all.
    #[error("failed to execute keystore tool: {message}")]
    Spawn {
        /// Details about why the process could not be spawned
        message: String,
    },

    /// A platform family string did not match any known layout.
    #[error("unknown platform family: {family}")]
    UnknownPlatform {
        /// The unrecognized family string
        family: String,
    },

    /// The configured keystore owner does not exist on this host.
    #[error("unknown keystore owner: {name}")]
    UnknownOwner {
        /// The user or group name that could not be resolved
        name: String,
    },

    /// IO error (keystore file removal, secret temp file handling)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The raw tool output carried by this error, if any.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { output } | Error::DiscoveryIndeterminate { output } => {
                Some(output)
            }
            _ => None,
        }
    }

    /// Whether this error means the actual state could not be determined.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Error::DiscoveryIndeterminate { .. })
    }
}

/// Result type for keystore operations.
pub type Result<T> = std::result::Result<T, Error>;
