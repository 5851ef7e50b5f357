//! Startup/completion banners and the setup decision panels.
//!
//! Panels go to stdout; banners and progress one-liners stay on stderr so the
//! task runner's own output is what lands in pipes.

use crate::validate::SetupVerdict;

const RULE: &str =
    "──────────────────────────────────────────────────────────────────────────────";

pub fn print_startup_banner() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!();
    eprintln!("{RULE}");
    eprintln!(" 🚀  CMS workspace launcher v{version}  🚀 ");
    eprintln!("{RULE}");
    eprintln!(" ⚙️  Checking setup configuration and starting the right target...");
    eprintln!();
}

pub fn print_build_banner(all: bool) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!();
    eprintln!("{RULE}");
    eprintln!(" 📦  CMS workspace build v{version}  📦 ");
    eprintln!("{RULE}");
    if all {
        eprintln!(" ⚙️  Building setup-wizard and cms, in order...");
    } else {
        eprintln!(" ⚙️  Building cms...");
    }
    eprintln!();
}

pub fn print_build_complete_banner() {
    eprintln!();
    eprintln!("{RULE}");
    eprintln!(" ✅  Build complete");
    eprintln!("{RULE}");
    eprintln!();
}

/// Failure panel: the reason, every missing/invalid field, every warning.
pub fn render_setup_required_panel(verdict: &SetupVerdict) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(" ⚠️  Setup required: configuration incomplete\n");
    out.push_str(RULE);
    out.push('\n');
    if let Some(reason) = &verdict.reason {
        out.push_str(&format!("    Reason: {reason}\n"));
    }
    if !verdict.missing_fields.is_empty() {
        out.push_str("    Missing or invalid fields:\n");
        for field in &verdict.missing_fields {
            out.push_str(&format!("      - {field}\n"));
        }
    }
    push_warnings(&mut out, verdict);
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Success panel; lists warnings when present.
pub fn render_setup_complete_panel(verdict: &SetupVerdict) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(" ✅  Setup configuration complete\n");
    out.push_str(RULE);
    out.push('\n');
    push_warnings(&mut out, verdict);
    out.push_str(RULE);
    out.push('\n');
    out
}

fn push_warnings(out: &mut String, verdict: &SetupVerdict) {
    if verdict.warnings.is_empty() {
        return;
    }
    out.push_str("    Warnings:\n");
    for warning in &verdict.warnings {
        out.push_str(&format!("      ⚠ {warning}\n"));
    }
}
