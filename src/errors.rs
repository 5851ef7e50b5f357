//! Error mapping guide:
//! - Every launcher failure exits the process with code 1; there is no
//!   partial-success reporting beyond the sequential build log lines.
//! - Prefer LaunchError for internal clarity while keeping user-visible
//!   strings in display_for_launch_error.
use std::io;

/// Failure modes of a task-runner child, kept as a plain enum so callers can
/// branch without parsing strings.
#[derive(Debug)]
pub enum LaunchError {
    /// The child could not be started at all (command not found, OS error).
    Spawn {
        target: &'static str,
        source: io::Error,
    },
    /// The child started but exited with a non-zero status.
    Exit { target: &'static str, code: i32 },
    /// Waiting on the child failed after a successful spawn.
    Wait {
        target: &'static str,
        source: io::Error,
    },
}

impl LaunchError {
    pub fn target(&self) -> &'static str {
        match self {
            LaunchError::Spawn { target, .. }
            | LaunchError::Exit { target, .. }
            | LaunchError::Wait { target, .. } => target,
        }
    }
}

/// Render a user-facing string for LaunchError.
pub fn display_for_launch_error(e: &LaunchError) -> String {
    match e {
        LaunchError::Spawn { target, source } => {
            if source.kind() == io::ErrorKind::NotFound {
                format!("failed to launch {target}: task runner not found on PATH ({source})")
            } else {
                format!("failed to launch {target}: {source}")
            }
        }
        LaunchError::Exit { target, code } => {
            format!("{target} exited with status {code}")
        }
        LaunchError::Wait { target, source } => {
            format!("failed waiting for {target}: {source}")
        }
    }
}
