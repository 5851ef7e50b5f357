//! `--doctor` diagnostics for the dev launcher.

use crate::shim::{alias_on_path, ALIAS_NAME, RUNTIME_NAME};
use crate::validate::{EnvFileValidator, SetupValidator};

pub fn run_doctor(validator: &EnvFileValidator) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("cms-dev doctor");
    eprintln!("  version: v{version}");
    eprintln!(
        "  built: {} ({}, {})",
        env!("CMS_LAUNCHER_BUILD_DATE"),
        env!("CMS_LAUNCHER_BUILD_TARGET"),
        env!("CMS_LAUNCHER_BUILD_PROFILE")
    );
    eprintln!("  rustc: {}", env!("CMS_LAUNCHER_BUILD_RUSTC"));
    eprintln!("  host: {} / {}", std::env::consts::OS, std::env::consts::ARCH);

    match which::which(RUNTIME_NAME) {
        Ok(p) => eprintln!("  {RUNTIME_NAME}: {}", p.display()),
        Err(e) => eprintln!("  {RUNTIME_NAME}: not found ({e})"),
    }
    let path = std::env::var_os("PATH").unwrap_or_default();
    eprintln!(
        "  {ALIAS_NAME} on PATH: {}",
        if alias_on_path(&path) {
            "yes"
        } else {
            "no (a shim will be created)"
        }
    );

    eprintln!("  env file: {}", validator.path().display());
    let verdict = validator.validate();
    eprintln!(
        "  setup configuration: {}",
        if verdict.complete { "complete" } else { "incomplete" }
    );
    for field in &verdict.missing_fields {
        eprintln!("    missing/invalid: {field}");
    }
    for warning in &verdict.warnings {
        eprintln!("    warning: {warning}");
    }
    eprintln!("doctor: completed diagnostics.");
}
