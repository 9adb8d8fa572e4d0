//! The keystore resource: declaration glued to the convergence engine.
//!
//! There is exactly one manageable keystore per host configuration root,
//! so the resource is a singleton — discovery either finds it or it does
//! not, and matching declared to discovered state needs no names. Setting
//! values are write-only; only presence and names ever flow back out.

use anyhow::{Context, Result};
use keystorekit::{
    DesiredKeystore, ExecContext, InstallLayout, KeystoreState, KeystoreTool, Operation,
    PlatformFamily, RunAs, KEYSTORE_OWNER,
};

use crate::config::Declaration;
use crate::paths;

/// The host's managed keystore.
#[derive(Debug)]
pub struct KeystoreResource {
    desired: DesiredKeystore,
    tool: KeystoreTool,
}

impl KeystoreResource {
    /// Build the resource from a loaded declaration.
    pub fn from_declaration(decl: &Declaration) -> Result<Self> {
        let install = &decl.install;

        let family = match install.platform_family.as_deref() {
            Some(name) => name
                .parse::<PlatformFamily>()
                .with_context(|| format!("Invalid platform_family \"{name}\""))?,
            None => PlatformFamily::Debian,
        };

        let mut layout = InstallLayout::resolve(family);
        if let Some(dir) = &install.home_dir {
            layout = layout.with_home_dir(paths::expand(dir));
        }
        if let Some(dir) = &install.defaults_dir {
            layout = layout.with_defaults_dir(paths::expand(dir));
        }

        let mut ctx = ExecContext::new(&layout);
        if let Some(path) = &install.keystore_path {
            ctx = ctx.with_keystore_path(paths::expand(path));
        }
        if install.run_as_owner {
            ctx = ctx.with_run_as(RunAs {
                user: install
                    .run_as_user
                    .clone()
                    .unwrap_or_else(|| KEYSTORE_OWNER.to_string()),
                group: install
                    .run_as_group
                    .clone()
                    .unwrap_or_else(|| KEYSTORE_OWNER.to_string()),
            });
        }

        Ok(Self {
            desired: decl.desired(),
            tool: KeystoreTool::new(ctx),
        })
    }

    /// Observe the keystore's current state.
    pub fn discover(&self) -> Result<KeystoreState> {
        keystorekit::discover(&self.tool, &self.desired.configdir)
            .context("Could not determine keystore state")
    }

    /// Discover and diff, without mutating anything.
    pub fn plan(&self) -> Result<(KeystoreState, Vec<Operation>)> {
        let actual = self.discover()?;
        let ops = keystorekit::plan(&self.desired, &actual);
        Ok((actual, ops))
    }

    /// Run a full reconciliation pass and return the refreshed state.
    pub fn apply(&self) -> Result<KeystoreState> {
        keystorekit::converge(&self.tool, &self.desired)
            .context("Keystore reconciliation failed")
    }
}
