//! # keystorekit
//!
//! Library for managing the Elasticsearch keystore — the on-disk,
//! encrypted-at-rest store of named secret values — through the external
//! `elasticsearch-keystore` command-line tool.
//!
//! The crate reconciles a declared desired state against the store's
//! observed state and issues the minimal ordered set of idempotent tool
//! invocations needed to converge them. Secret values flow in one
//! direction only: they are written via the tool's stdin and never read
//! back (the tool cannot export them).
//!
//! ## Core concepts
//!
//! - [`KeystoreState`]: presence of the store plus the set of stored
//!   setting names, produced fresh by each discovery
//! - [`DesiredKeystore`]: the declared target — ensure, settings, purge
//!   policy, config directory
//! - [`Operation`]: one external mutation (create, destroy, add, remove)
//! - [`ExecContext`]: resolved executable path, keystore path, and the
//!   identity invocations run under, built once at startup
//!
//! ## Example
//!
//! ```no_run
//! use keystorekit::{
//!     converge, DesiredKeystore, ExecContext, InstallLayout, KeystoreTool,
//!     PlatformFamily, RunAs,
//! };
//!
//! let layout = InstallLayout::resolve(PlatformFamily::Debian);
//! let ctx = ExecContext::new(&layout).with_run_as(RunAs::keystore_owner());
//! let tool = KeystoreTool::new(ctx);
//!
//! let desired = DesiredKeystore::present("/etc/elasticsearch")
//!     .with_setting("s3.client.default.access_key", "AKIA...");
//!
//! let state = converge(&tool, &desired)?;
//! assert!(state.exists);
//! # Ok::<(), keystorekit::Error>(())
//! ```
//!
//! ## Execution model
//!
//! Single-threaded, synchronous, blocking. Each pass runs discovery, the
//! planned operations, and a final re-discovery strictly in order; tool
//! invocations have no timeout. Concurrent passes against the same store
//! are not coordinated — that is an acknowledged limitation of the
//! underlying tool, not mitigated here.

pub mod context;
pub mod discovery;
pub mod error;
pub mod platform;
pub mod reconcile;
pub mod runner;
pub mod types;

// Re-export main types at crate root
pub use context::{ENV_CONFIG_DIR, ExecContext, KEYSTORE_OWNER, RunAs};
pub use discovery::discover;
pub use error::{Error, Result};
pub use platform::{
    DEFAULT_CONFIG_DIR, InstallLayout, KEYSTORE_FILE_NAME, PlatformFamily, default_keystore_path,
};
pub use reconcile::{converge, execute, plan};
pub use runner::KeystoreTool;
pub use types::{DesiredKeystore, Ensure, KeystoreState, Operation};
