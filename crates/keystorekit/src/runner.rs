//! Blocking runner for the external `elasticsearch-keystore` tool.
//!
//! One process execution per call, no retries, no timeout — a hang in the
//! tool hangs the pass. Secret values are handed to the child through a
//! transient 0600 temp file attached as stdin; they never appear in
//! process arguments or logs, and the file is unlinked on every exit path.

use crate::context::{ENV_CONFIG_DIR, ExecContext};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

/// Handle on the external keystore executable.
#[derive(Debug)]
pub struct KeystoreTool {
    ctx: ExecContext,
}

impl KeystoreTool {
    pub fn new(ctx: ExecContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ExecContext {
        &self.ctx
    }

    /// Run the tool with `ES_PATH_CONF` fixed to `configdir`.
    ///
    /// When `stdin` is given its bytes are delivered through a transient
    /// secret file. Returns captured stdout verbatim (callers split on
    /// newlines); a non-zero exit yields [`Error::CommandFailed`] carrying
    /// the captured output. On non-Unix hosts `run_as` is ignored.
    pub fn run(&self, args: &[&str], configdir: &Path, stdin: Option<&[u8]>) -> Result<String> {
        let mut cmd = Command::new(&self.ctx.executable);
        cmd.args(args)
            .env(ENV_CONFIG_DIR, configdir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        if let Some(run_as) = &self.ctx.run_as {
            use std::os::unix::process::CommandExt;
            let (uid, gid) = resolve_owner(run_as)?;
            cmd.uid(uid).gid(gid);
        }

        let secret = match stdin {
            Some(bytes) => {
                let secret = SecretFile::new(bytes)?;
                cmd.stdin(Stdio::from(secret.reader()?));
                Some(secret)
            }
            None => {
                cmd.stdin(Stdio::null());
                None
            }
        };

        log::debug!(
            "running {} {}",
            self.ctx.executable.display(),
            args.join(" ")
        );

        let output = cmd.output().map_err(|e| Error::Spawn {
            message: format!("{}: {e}", self.ctx.executable.display()),
        })?;

        // The secret file's lifetime is exactly one invocation.
        drop(secret);

        if !output.status.success() {
            return Err(Error::CommandFailed {
                output: captured_output(&output.stdout, &output.stderr),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Combine captured streams for diagnostics, verbatim.
fn captured_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        combined.push_str(&String::from_utf8_lossy(stderr));
    }
    combined
}

/// Transient on-disk carrier for one secret value.
///
/// `NamedTempFile` creates with 0600 permissions and unlinks on drop, so
/// the file is gone whether the invocation succeeds, fails, or panics.
struct SecretFile {
    file: NamedTempFile,
}

impl SecretFile {
    fn new(bytes: &[u8]) -> Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Independent read handle to pass as the child's stdin.
    fn reader(&self) -> Result<File> {
        Ok(self.file.reopen()?)
    }
}

/// Resolve a named identity to numeric uid/gid.
#[cfg(unix)]
fn resolve_owner(run_as: &crate::context::RunAs) -> Result<(u32, u32)> {
    Ok((lookup_uid(&run_as.user)?, lookup_gid(&run_as.group)?))
}

#[cfg(unix)]
fn lookup_uid(name: &str) -> Result<u32> {
    let c_name = std::ffi::CString::new(name).map_err(|_| Error::UnknownOwner {
        name: name.to_string(),
    })?;
    // SAFETY: getpwnam returns a pointer into thread-local static storage;
    // only pw_uid is read before the pointer is discarded.
    let pw = unsafe { libc::getpwnam(c_name.as_ptr()) };
    if pw.is_null() {
        return Err(Error::UnknownOwner {
            name: name.to_string(),
        });
    }
    Ok(unsafe { (*pw).pw_uid })
}

#[cfg(unix)]
fn lookup_gid(name: &str) -> Result<u32> {
    let c_name = std::ffi::CString::new(name).map_err(|_| Error::UnknownOwner {
        name: name.to_string(),
    })?;
    // SAFETY: same contract as getpwnam above, reading only gr_gid.
    let gr = unsafe { libc::getgrnam(c_name.as_ptr()) };
    if gr.is_null() {
        return Err(Error::UnknownOwner {
            name: name.to_string(),
        });
    }
    Ok(unsafe { (*gr).gr_gid })
}
