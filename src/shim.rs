#![allow(clippy::module_name_repetitions)]
//! Child-environment augmentation and `bunx` alias resolution.
//!
//! Invariants
//! - The suppression/stabilization variables are always part of the override
//!   set, whether or not a shim was materialized.
//! - At most one shim directory exists per process invocation: callers resolve
//!   once and reuse the same LaunchEnv for every spawn of the run.
//! - Resolution always starts from the original inherited environment, never
//!   from a previously augmented override set.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::color::{color_enabled_stderr, log_warn_stderr};

/// Command name the task runner is invoked through.
pub const ALIAS_NAME: &str = "bunx";
/// Runtime executable the alias is shimmed to when absent.
pub const RUNTIME_NAME: &str = "bun";

const NO_DEPRECATION_FLAG: &str = "--no-deprecation";

#[cfg(windows)]
const ALIAS_FILENAMES: &[&str] = &["bunx.exe", "bunx.cmd", "bunx"];
#[cfg(not(windows))]
const ALIAS_FILENAMES: &[&str] = &["bunx"];

/// Owns the temporary alias directory. Removal happens when the guard drops,
/// best-effort; multiple guards compose, each cleaning up its own directory.
#[derive(Debug)]
pub struct ShimGuard {
    dir: TempDir,
}

impl ShimGuard {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Environment overrides applied on top of the inherited environment for each
/// spawned task-runner child. Holds the shim guard so the alias directory
/// outlives every spawn of the run.
#[derive(Debug)]
pub struct LaunchEnv {
    vars: Vec<(&'static str, OsString)>,
    shim: Option<ShimGuard>,
}

impl LaunchEnv {
    pub fn vars(&self) -> &[(&'static str, OsString)] {
        &self.vars
    }

    /// Path of the materialized shim directory, if one was needed.
    pub fn shim_dir(&self) -> Option<&Path> {
        self.shim.as_ref().map(ShimGuard::path)
    }
}

/// Append `flag` to a NODE_OPTIONS-style value only if absent.
///
/// The value is treated as a whitespace-separated flag list so repeated
/// augmentation cannot duplicate the flag.
pub fn node_options_with_flag(existing: Option<&str>, flag: &str) -> String {
    match existing {
        Some(current) => {
            if current.split_whitespace().any(|f| f == flag) {
                current.to_string()
            } else if current.trim().is_empty() {
                flag.to_string()
            } else {
                format!("{} {}", current.trim_end(), flag)
            }
        }
        None => flag.to_string(),
    }
}

/// Scan every PATH directory for an entry with the alias name.
///
/// A failed existence check (missing or unreadable directory) counts as "not
/// found there" and is never fatal.
pub fn alias_on_path(path: &OsStr) -> bool {
    env::split_paths(path).any(|dir| {
        ALIAS_FILENAMES
            .iter()
            .any(|name| fs::symlink_metadata(dir.join(name)).is_ok())
    })
}

/// Produce the child-environment overrides for the current process, creating a
/// `bunx` shim when the alias is not resolvable.
///
/// Call once per process run; the returned LaunchEnv is reused for every
/// spawn. This function does not fail: on any shim problem it warns and
/// returns the suppression/stabilization overrides alone, deferring the real
/// failure to the spawn attempt.
pub fn resolve_execution_environment() -> LaunchEnv {
    resolve_execution_environment_from(
        env::var_os("PATH").as_deref(),
        env::var("NODE_OPTIONS").ok().as_deref(),
    )
}

/// Deterministic resolver for tests.
pub fn resolve_execution_environment_from(
    path: Option<&OsStr>,
    node_options: Option<&str>,
) -> LaunchEnv {
    let mut vars: Vec<(&'static str, OsString)> = vec![
        (
            "NODE_OPTIONS",
            node_options_with_flag(node_options, NO_DEPRECATION_FLAG).into(),
        ),
        // nx's dynamic terminal renderer and native logger both misbehave when
        // stdio is shared with a wrapping process; pin them down.
        ("NX_TERMINAL_OUTPUT_FORMAT", OsString::from("text")),
        ("NX_NATIVE_LOGGING", OsString::from("false")),
    ];

    let path = path.map(OsStr::to_os_string).unwrap_or_default();
    if alias_on_path(&path) {
        return LaunchEnv { vars, shim: None };
    }

    let use_err = color_enabled_stderr();
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let runtime = match which::which_in(RUNTIME_NAME, Some(&path), &cwd) {
        Ok(p) => p,
        Err(e) => {
            log_warn_stderr(
                use_err,
                &format!(
                    "cms-launcher: {ALIAS_NAME} not on PATH and {RUNTIME_NAME} runtime not found ({e}); continuing without a shim"
                ),
            );
            return LaunchEnv { vars, shim: None };
        }
    };

    match create_alias_shim(&runtime) {
        Ok(guard) => {
            let mut dirs: Vec<PathBuf> = vec![guard.path().to_path_buf()];
            dirs.extend(env::split_paths(&path));
            match env::join_paths(dirs) {
                Ok(joined) => {
                    vars.push(("PATH", joined));
                    LaunchEnv {
                        vars,
                        shim: Some(guard),
                    }
                }
                Err(e) => {
                    log_warn_stderr(
                        use_err,
                        &format!("cms-launcher: could not prepend shim directory to PATH ({e}); continuing without a shim"),
                    );
                    LaunchEnv { vars, shim: None }
                }
            }
        }
        Err(e) => {
            log_warn_stderr(
                use_err,
                &format!("cms-launcher: could not create {ALIAS_NAME} shim ({e}); continuing without a shim"),
            );
            LaunchEnv { vars, shim: None }
        }
    }
}

/// Materialize a fresh uniquely named directory holding the alias entry.
fn create_alias_shim(runtime: &Path) -> std::io::Result<ShimGuard> {
    let dir = tempfile::Builder::new()
        .prefix("cms-launcher-shim-")
        .tempdir()?;

    #[cfg(unix)]
    {
        // bun dispatches on argv[0], so a symlink named bunx behaves as bunx.
        std::os::unix::fs::symlink(runtime, dir.path().join(ALIAS_NAME))?;
    }
    #[cfg(windows)]
    {
        // Symlinks need elevation on Windows; a forwarding script is enough.
        let script = format!("@echo off\r\n\"{}\" x %*\r\n", runtime.display());
        fs::write(dir.path().join(format!("{ALIAS_NAME}.cmd")), script)?;
    }

    Ok(ShimGuard { dir })
}
