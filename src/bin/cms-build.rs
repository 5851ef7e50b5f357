use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;

use cms_launcher::banner::{print_build_banner, print_build_complete_banner};
use cms_launcher::{
    color_enabled_stderr, display_for_launch_error, launch, launch_preview, log_error_stderr,
    log_info_stderr, resolve_execution_environment, set_color_mode, ColorMode, LaunchOptions,
    Mode, Target, ALIAS_NAME,
};

#[derive(Parser, Debug)]
#[command(
    name = "cms-build",
    version,
    about = "Build CMS workspace targets through the task runner."
)]
struct Cli {
    /// Build setup-wizard and cms instead of cms alone
    #[arg(long)]
    all: bool,

    /// Prepare and print what would run, but do not execute
    #[arg(long)]
    dry_run: bool,

    /// Print detailed execution info
    #[arg(long)]
    verbose: bool,

    /// Colorize output: auto|always|never
    #[arg(long, value_enum)]
    color: Option<ColorMode>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(mode) = cli.color {
        set_color_mode(mode);
    }

    print_build_banner(cli.all);

    match run(&cli) {
        Ok(()) => {
            if !cli.dry_run {
                print_build_complete_banner();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_error_stderr(color_enabled_stderr(), &format!("cms-build: {e}"));
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    // One resolution per run; both builds reuse the same override set and at
    // most one shim directory exists.
    let env = resolve_execution_environment();

    // Ordered, never concurrent: the second build must not contend with the
    // first for workspace resources.
    let targets: &[Target] = if cli.all {
        &[Target::SetupWizard, Target::Cms]
    } else {
        &[Target::Cms]
    };

    let use_err = color_enabled_stderr();
    if cli.verbose {
        match env.shim_dir() {
            Some(dir) => log_info_stderr(
                use_err,
                &format!("cms-build: created {ALIAS_NAME} shim at {}", dir.display()),
            ),
            None => log_info_stderr(
                use_err,
                &format!("cms-build: {ALIAS_NAME} resolvable on PATH; no shim needed"),
            ),
        }
    }

    for target in targets {
        if cli.dry_run {
            log_info_stderr(
                use_err,
                &format!(
                    "cms-build: dry-run requested; would run: {}",
                    launch_preview(Mode::Build, *target)
                ),
            );
            continue;
        }
        log_info_stderr(use_err, &format!(" 📦  Building {}...", target.as_str()));
        launch(
            &env,
            Mode::Build,
            *target,
            LaunchOptions {
                force_color: true,
                forward_interrupt: false,
            },
        )
        .map_err(|e| anyhow!(display_for_launch_error(&e)))?;
    }
    Ok(())
}
