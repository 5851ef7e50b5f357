//! Task-runner child process lifecycle.
//!
//! One child is in flight at a time; the parent does nothing but wait on it.
//! The interrupt path is deliberately best-effort: forward SIGINT to the
//! child, then exit 0 without joining the child's own exit event.

use std::process::{Child, Command, ExitStatus};
#[cfg(unix)]
use std::sync::atomic::{AtomicU32, Ordering};
#[cfg(unix)]
use std::time::Duration;

#[cfg(unix)]
use wait_timeout::ChildExt;

use crate::errors::LaunchError;
use crate::shim::{LaunchEnv, ALIAS_NAME};

/// Task-runner tool every launch delegates to.
pub const TASK_RUNNER: &str = "nx";

/// Buildable/launchable workspace applications.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target {
    SetupWizard,
    Cms,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::SetupWizard => "setup-wizard",
            Target::Cms => "cms",
        }
    }
}

/// Which task-runner subcommand a launch uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Dev,
    Build,
}

impl Mode {
    pub fn subcommand(self) -> &'static str {
        match self {
            Mode::Dev => "dev",
            Mode::Build => "build",
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct LaunchOptions {
    /// Force color output in the child (build launches).
    pub force_color: bool,
    /// Forward a one-shot SIGINT to the child and exit 0 (dev launches).
    pub forward_interrupt: bool,
}

/// One-line rendering of the command a launch would run (verbose/dry-run).
pub fn launch_preview(mode: Mode, target: Target) -> String {
    format!(
        "{ALIAS_NAME} {TASK_RUNNER} {} {}",
        mode.subcommand(),
        target.as_str()
    )
}

fn build_task_cmd(env: &LaunchEnv, mode: Mode, target: Target, opts: LaunchOptions) -> Command {
    // Command never involves a shell, and stdio is inherited so the child
    // shares the controlling terminal.
    let mut cmd = Command::new(ALIAS_NAME);
    cmd.args([TASK_RUNNER, mode.subcommand(), target.as_str()]);
    for (key, value) in env.vars() {
        cmd.env(key, value);
    }
    if opts.force_color {
        cmd.env("FORCE_COLOR", "1");
    }
    cmd
}

/// Spawn the task runner for one target and wait for it.
///
/// Resolves on exit status 0; errors carry the non-zero exit code or the
/// spawn error when the child could not be started at all.
pub fn launch(
    env: &LaunchEnv,
    mode: Mode,
    target: Target,
    opts: LaunchOptions,
) -> Result<(), LaunchError> {
    let child = build_task_cmd(env, mode, target, opts)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            target: target.as_str(),
            source,
        })?;

    if opts.forward_interrupt {
        wait_forwarding_interrupt(child, target)
    } else {
        wait_plain(child, target)
    }
}

fn wait_plain(mut child: Child, target: Target) -> Result<(), LaunchError> {
    let status = child.wait().map_err(|source| LaunchError::Wait {
        target: target.as_str(),
        source,
    })?;
    finish(status, target)
}

fn finish(status: ExitStatus, target: Target) -> Result<(), LaunchError> {
    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::Exit {
            target: target.as_str(),
            code: status.code().unwrap_or(1),
        })
    }
}

#[cfg(unix)]
static SIGINT_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(unix)]
extern "C" fn handle_sigint(_sig: i32) {
    SIGINT_COUNT.fetch_add(1, Ordering::SeqCst);
}

#[cfg(unix)]
fn install_interrupt_handler() {
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        let act = SigAction::new(
            SigHandler::Handler(handle_sigint),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );
        unsafe {
            let _ = signal::sigaction(Signal::SIGINT, &act);
        }
    });
}

#[cfg(unix)]
fn wait_forwarding_interrupt(mut child: Child, target: Target) -> Result<(), LaunchError> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    install_interrupt_handler();
    loop {
        if SIGINT_COUNT.load(Ordering::SeqCst) > 0 {
            let _ = kill(Pid::from_raw(child.id() as i32), Signal::SIGINT);
            std::process::exit(0);
        }
        match child.wait_timeout(Duration::from_millis(50)) {
            Ok(Some(status)) => return finish(status, target),
            Ok(None) => {}
            Err(source) => {
                return Err(LaunchError::Wait {
                    target: target.as_str(),
                    source,
                })
            }
        }
    }
}

#[cfg(not(unix))]
fn wait_forwarding_interrupt(child: Child, target: Target) -> Result<(), LaunchError> {
    wait_plain(child, target)
}
