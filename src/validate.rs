#![allow(clippy::module_name_repetitions)]
//! Setup-configuration inspection for the dev launcher.
//!
//! The decision surface is a single verdict: either setup is complete and the
//! CMS may start, or it is not and the setup wizard runs first. Rules collect
//! every problem instead of stopping at the first so the panel can show the
//! whole list at once.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use url::Url;

use crate::launcher::Target;

/// Override for the env-file location inspected by [`EnvFileValidator`].
pub const ENV_FILE_VAR: &str = "CMS_LAUNCHER_ENV_FILE";
const DEFAULT_ENV_FILE: &str = ".env";

pub const FIELD_DATABASE_URL: &str = "DATABASE_URL";
pub const FIELD_SECRET_KEY: &str = "SECRET_KEY";
pub const FIELD_SERVER_URL: &str = "SERVER_URL";
pub const FIELD_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";

/// Keys the validator reads; the live process environment wins over the file.
pub const SETUP_FIELDS: &[&str] = &[
    FIELD_DATABASE_URL,
    FIELD_SECRET_KEY,
    FIELD_SERVER_URL,
    FIELD_ADMIN_PASSWORD,
];

const KNOWN_DB_SCHEMES: &[&str] = &[
    "postgres",
    "postgresql",
    "mysql",
    "sqlite",
    "mongodb",
    "mongodb+srv",
];
const DEFAULT_ADMIN_PASSWORDS: &[&str] = &["admin", "password", "changeme"];
const MIN_SECRET_KEY_LEN: usize = 16;
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "0.0.0.0"];

/// Outcome of one configuration check. Read once per unforced dev launch,
/// never cached across invocations.
#[derive(Debug, Clone, Default)]
pub struct SetupVerdict {
    pub complete: bool,
    /// Human-readable first problem when incomplete.
    pub reason: Option<String>,
    /// Missing or invalid field names, in rule order.
    pub missing_fields: Vec<String>,
    /// Non-fatal observations, present for complete verdicts too.
    pub warnings: Vec<String>,
}

/// Pluggable configuration check; inject a fake in tests.
pub trait SetupValidator {
    fn validate(&self) -> SetupVerdict;
}

/// Shipped validator: reads a dotenv file and overlays the live process
/// environment on top (process wins), then applies the field rules.
#[derive(Debug, Clone)]
pub struct EnvFileValidator {
    path: PathBuf,
}

impl EnvFileValidator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from CMS_LAUNCHER_ENV_FILE, defaulting to ./.env
    pub fn from_env() -> Self {
        let path = env::var_os(ENV_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SetupValidator for EnvFileValidator {
    fn validate(&self) -> SetupVerdict {
        let mut values: BTreeMap<String, String> = BTreeMap::new();
        // An unreadable env file reads as "nothing configured", never a crash.
        if let Ok(iter) = dotenvy::from_path_iter(&self.path) {
            for (key, value) in iter.flatten() {
                values.insert(key, value);
            }
        }
        for key in SETUP_FIELDS {
            if let Ok(value) = env::var(key) {
                values.insert((*key).to_string(), value);
            }
        }
        verdict_for(&values)
    }
}

fn non_empty<'a>(values: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    values.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Apply the field rules to a resolved key/value view of the configuration.
pub fn verdict_for(values: &BTreeMap<String, String>) -> SetupVerdict {
    let mut problems: Vec<(&str, String)> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    match non_empty(values, FIELD_DATABASE_URL) {
        None => problems.push((FIELD_DATABASE_URL, "Missing database URL".to_string())),
        Some(value) => {
            let known = Url::parse(value)
                .map(|u| KNOWN_DB_SCHEMES.contains(&u.scheme()))
                .unwrap_or(false);
            if !known {
                problems.push((
                    FIELD_DATABASE_URL,
                    format!(
                        "Database URL must use one of: {}",
                        KNOWN_DB_SCHEMES.join(", ")
                    ),
                ));
            }
        }
    }

    match non_empty(values, FIELD_SECRET_KEY) {
        None => problems.push((FIELD_SECRET_KEY, "Missing secret key".to_string())),
        Some(value) => {
            if value.len() < MIN_SECRET_KEY_LEN {
                problems.push((
                    FIELD_SECRET_KEY,
                    format!("Secret key must be at least {MIN_SECRET_KEY_LEN} characters"),
                ));
            }
        }
    }

    match non_empty(values, FIELD_SERVER_URL) {
        None => problems.push((FIELD_SERVER_URL, "Missing server URL".to_string())),
        Some(value) => match Url::parse(value) {
            Ok(u) if u.host_str().is_some() => {
                let local = u
                    .host_str()
                    .map(|h| LOCAL_HOSTS.contains(&h))
                    .unwrap_or(false);
                if u.scheme() == "http" && !local {
                    warnings.push(
                        "Server URL uses plain http; use https outside local development"
                            .to_string(),
                    );
                }
            }
            _ => problems.push((
                FIELD_SERVER_URL,
                "Server URL must be an absolute URL".to_string(),
            )),
        },
    }

    if let Some(password) = non_empty(values, FIELD_ADMIN_PASSWORD) {
        if DEFAULT_ADMIN_PASSWORDS.contains(&password.to_ascii_lowercase().as_str()) {
            warnings.push("Using default admin password".to_string());
        }
    }

    SetupVerdict {
        complete: problems.is_empty(),
        reason: problems.first().map(|(_, msg)| msg.clone()),
        missing_fields: problems.iter().map(|(field, _)| (*field).to_string()).collect(),
        warnings,
    }
}

/// Target selection for the dev launcher, in strict priority order. The
/// validator is consulted only when neither force flag is given; the verdict
/// is returned alongside so the caller can render it.
pub fn choose_target(
    force_setup: bool,
    force_cms: bool,
    validator: &dyn SetupValidator,
) -> (Target, Option<SetupVerdict>) {
    if force_setup {
        return (Target::SetupWizard, None);
    }
    if force_cms {
        return (Target::Cms, None);
    }
    let verdict = validator.validate();
    let target = if verdict.complete {
        Target::Cms
    } else {
        Target::SetupWizard
    };
    (target, Some(verdict))
}
