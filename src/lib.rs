//! Developer launchers for an nx-managed CMS workspace.
//!
//! Two binaries share this crate:
//! - `cms-dev` inspects the setup configuration and launches either the setup
//!   wizard or the CMS through the task runner, in dev or production mode.
//! - `cms-build` builds one or both application targets, strictly in order.
//!
//! Both delegate the actual work to `bunx nx <subcommand> <target>` with an
//! augmented child environment; see [`shim`] for the alias resolution rules
//! and [`launcher`] for the child lifecycle.

pub mod banner;
pub mod color;
pub mod doctor;
pub mod errors;
pub mod launcher;
pub mod shim;
pub mod validate;

pub use color::{
    color_enabled_stderr, color_enabled_stdout, log_error_stderr, log_info_stderr,
    log_warn_stderr, paint, set_color_mode, ColorMode,
};
pub use errors::{display_for_launch_error, LaunchError};
pub use launcher::{launch, launch_preview, LaunchOptions, Mode, Target, TASK_RUNNER};
pub use shim::{
    alias_on_path, node_options_with_flag, resolve_execution_environment,
    resolve_execution_environment_from, LaunchEnv, ShimGuard, ALIAS_NAME, RUNTIME_NAME,
};
pub use validate::{
    choose_target, verdict_for, EnvFileValidator, SetupValidator, SetupVerdict, ENV_FILE_VAR,
};
