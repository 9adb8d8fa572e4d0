//! Reconciliation: diff desired against actual, execute, re-discover.
//!
//! The planner is pure. Execution applies operations strictly in order,
//! aborts on the first failure without undoing anything, and finishes a
//! successful pass by re-running discovery so the caller's view of actual
//! state is what external inspection would now report.

use crate::discovery;
use crate::error::Result;
use crate::runner::KeystoreTool;
use crate::types::{DesiredKeystore, Ensure, KeystoreState, Operation};
use std::fs;
use std::path::Path;

/// Compute the ordered operations needed to converge `actual` to `desired`.
///
/// Decision order:
/// 1. Store-level transition. An absent store that should be present is
///    created; a store that should be absent is destroyed, and destruction
///    short-circuits every setting-level step.
/// 2. Additions, in the desired mapping's iteration order. Names already
///    stored are left untouched — existing secrets are never silently
///    overwritten.
/// 3. Removals of stored names missing from the desired set, only when
///    `purge` is set, in the discovered set's iteration order.
pub fn plan(desired: &DesiredKeystore, actual: &KeystoreState) -> Vec<Operation> {
    let mut ops = Vec::new();

    match desired.ensure {
        Ensure::Absent => {
            if actual.exists {
                ops.push(Operation::DestroyStore);
            }
            return ops;
        }
        Ensure::Present => {
            if !actual.exists {
                ops.push(Operation::CreateStore);
            }
        }
    }

    for (name, value) in &desired.settings {
        if !actual.contains(name) {
            ops.push(Operation::AddSetting {
                name: name.clone(),
                value: value.clone(),
            });
        }
    }

    if desired.purge {
        for name in &actual.settings {
            if !desired.settings.contains_key(name) {
                ops.push(Operation::RemoveSetting { name: name.clone() });
            }
        }
    }

    ops
}

/// Execute operations in order, stopping at the first failure.
///
/// Applied operations are not undone. Store destruction is a direct file
/// removal — the external tool has no destroy subcommand.
pub fn execute(tool: &KeystoreTool, configdir: &Path, ops: &[Operation]) -> Result<()> {
    for op in ops {
        match op {
            Operation::CreateStore => {
                let out = tool.run(&["create"], configdir, None)?;
                log::debug!("{op}: {}", out.trim_end());
            }
            Operation::DestroyStore => {
                fs::remove_file(&tool.context().keystore_path)?;
                log::debug!("{op}");
            }
            Operation::AddSetting { name, value } => {
                let out = tool.run(
                    &["add", "--force", "--stdin", name],
                    configdir,
                    Some(value.as_bytes()),
                )?;
                log::debug!("{op}: {}", out.trim_end());
            }
            Operation::RemoveSetting { name } => {
                let out = tool.run(&["remove", name], configdir, None)?;
                log::debug!("{op}: {}", out.trim_end());
            }
        }
    }
    Ok(())
}

/// One full reconciliation pass: discover → plan → execute → re-discover.
///
/// Returns the refreshed state an external observer would now see. Any
/// error — indeterminate discovery, a failed operation — aborts the pass
/// and surfaces unmodified.
pub fn converge(tool: &KeystoreTool, desired: &DesiredKeystore) -> Result<KeystoreState> {
    let actual = discovery::discover(tool, &desired.configdir)?;
    let ops = plan(desired, &actual);
    execute(tool, &desired.configdir, &ops)?;
    discovery::discover(tool, &desired.configdir)
}


#[cfg(all(test, unix))]
mod converge_tests {
    use super::*;
    use crate::context::ExecContext;
    use crate::error::Error;
    use crate::platform::{InstallLayout, PlatformFamily};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    /// A fake elasticsearch-keystore that keeps setting names, one per
    /// line, in the keystore file itself, and logs every invocation.
    const FAKE_TOOL: &str = r#"store="$ES_PATH_CONF/elasticsearch.keystore"
echo "$*" >> "$ES_PATH_CONF/invocations.log"
case "$1" in
  create)
    : > "$store"
    ;;
  list)
    cat "$store"
    ;;
  add)
    shift
    while [ "$#" -gt 1 ]; do shift; done
    cat > /dev/null
    echo "$1" >> "$store"
    ;;
  remove)
    grep -Fxv "$2" "$store" > "$store.tmp" || true
    mv "$store.tmp" "$store"
    ;;
  *)
    echo "unknown command: $1" >&2
    exit 64
    ;;
esac"#;

    fn install_tool(dir: &Path, body: &str) -> KeystoreTool {
        let exe = dir.join("elasticsearch-keystore");
        fs::write(&exe, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&exe).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&exe, perms).unwrap();

        let ctx = ExecContext::new(&InstallLayout::resolve(PlatformFamily::Debian))
            .with_executable(exe)
            .with_keystore_path(dir.join("elasticsearch.keystore"));
        KeystoreTool::new(ctx)
    }

    fn invocations(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("invocations.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_converge_creates_store_and_adds_settings() {
        let dir = tempfile::tempdir().unwrap();
        let tool = install_tool(dir.path(), FAKE_TOOL);
        let desired = DesiredKeystore::present(dir.path())
            .with_setting("s3.client.default.access_key", "AKIA123")
            .with_setting("s3.client.default.secret_key", "shhh");

        let state = converge(&tool, &desired).unwrap();

        assert!(state.exists);
        assert!(state.contains("s3.client.default.access_key"));
        assert!(state.contains("s3.client.default.secret_key"));
        assert!(dir.path().join("elasticsearch.keystore").exists());
    }

    #[test]
    fn test_second_converge_only_lists() {
        let dir = tempfile::tempdir().unwrap();
        let tool = install_tool(dir.path(), FAKE_TOOL);
        let desired = DesiredKeystore::present(dir.path()).with_setting("a", "1");

        let first = converge(&tool, &desired).unwrap();
        fs::remove_file(dir.path().join("invocations.log")).unwrap();

        let second = converge(&tool, &desired).unwrap();
        assert_eq!(first, second);

        // Discovery before and after the (empty) plan — nothing mutating.
        let calls = invocations(dir.path());
        assert_eq!(calls, vec!["list", "list"]);
    }

    #[test]
    fn test_converge_purges_unlisted_settings() {
        let dir = tempfile::tempdir().unwrap();
        let tool = install_tool(dir.path(), FAKE_TOOL);

        let seed = DesiredKeystore::present(dir.path())
            .with_setting("keep", "1")
            .with_setting("stale", "2");
        converge(&tool, &seed).unwrap();

        let desired = DesiredKeystore::present(dir.path())
            .with_setting("keep", "1")
            .with_purge();
        let state = converge(&tool, &desired).unwrap();

        assert!(state.contains("keep"));
        assert!(!state.contains("stale"));
    }

    #[test]
    fn test_converge_destroys_store_directly() {
        let dir = tempfile::tempdir().unwrap();
        let tool = install_tool(dir.path(), FAKE_TOOL);
        converge(&tool, &DesiredKeystore::present(dir.path()).with_setting("a", "1")).unwrap();
        fs::remove_file(dir.path().join("invocations.log")).unwrap();

        let state = converge(&tool, &DesiredKeystore::absent(dir.path())).unwrap();

        assert_eq!(state, KeystoreState::absent());
        assert!(!dir.path().join("elasticsearch.keystore").exists());
        // Destruction never invokes the tool; only the leading discovery does.
        assert_eq!(invocations(dir.path()), vec!["list"]);
    }

    #[test]
    fn test_converge_absent_store_to_absent_never_runs_tool() {
        let dir = tempfile::tempdir().unwrap();
        let tool = install_tool(dir.path(), FAKE_TOOL);

        let state = converge(&tool, &DesiredKeystore::absent(dir.path())).unwrap();

        assert_eq!(state, KeystoreState::absent());
        assert!(invocations(dir.path()).is_empty());
    }

    #[test]
    fn test_first_failure_aborts_remaining_operations() {
        let dir = tempfile::tempdir().unwrap();
        // `add` always fails; `create` and `list` behave.
        let body = r#"store="$ES_PATH_CONF/elasticsearch.keystore"
echo "$*" >> "$ES_PATH_CONF/invocations.log"
case "$1" in
  create) : > "$store" ;;
  list) cat "$store" ;;
  add) cat > /dev/null; echo "add refused" >&2; exit 1 ;;
esac"#;
        let tool = install_tool(dir.path(), body);
        let desired = DesiredKeystore::present(dir.path())
            .with_setting("a", "1")
            .with_setting("b", "2");

        let err = converge(&tool, &desired).unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));

        // Create was applied and not rolled back; only the first add ran.
        assert!(dir.path().join("elasticsearch.keystore").exists());
        let calls = invocations(dir.path());
        assert_eq!(calls, vec!["create", "add --force --stdin a"]);
    }

    #[test]
    fn test_indeterminate_discovery_aborts_before_operations() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"echo "$*" >> "$ES_PATH_CONF/invocations.log"
case "$1" in
  list) echo "keystore is corrupt" >&2; exit 1 ;;
  *) exit 0 ;;
esac"#;
        let tool = install_tool(dir.path(), body);
        fs::write(dir.path().join("elasticsearch.keystore"), b"").unwrap();

        let desired = DesiredKeystore::present(dir.path()).with_setting("a", "1");
        let err = converge(&tool, &desired).unwrap_err();

        assert!(err.is_indeterminate());
        assert_eq!(invocations(dir.path()), vec!["list"]);
    }
}
