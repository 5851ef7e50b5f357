use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;

use cms_launcher::banner::{
    print_startup_banner, render_setup_complete_panel, render_setup_required_panel,
};
use cms_launcher::doctor::run_doctor;
use cms_launcher::{
    choose_target, color_enabled_stderr, display_for_launch_error, launch, launch_preview,
    log_error_stderr, log_info_stderr, resolve_execution_environment, set_color_mode, ColorMode,
    EnvFileValidator, LaunchOptions, Mode, ALIAS_NAME,
};

#[derive(Parser, Debug)]
#[command(
    name = "cms-dev",
    version,
    about = "Launch the CMS dev environment; runs first-time setup when the configuration is incomplete."
)]
struct Cli {
    /// Launch the setup wizard unconditionally, skipping the configuration check
    #[arg(long)]
    setup: bool,

    /// Launch the CMS unconditionally, skipping the configuration check
    #[arg(long)]
    cms: bool,

    /// Use production builds instead of dev servers for the chosen target
    #[arg(long, alias = "production")]
    prod: bool,

    /// Run diagnostics to check environment and configuration
    #[arg(long)]
    doctor: bool,

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

    // Doctor runs diagnostics without touching the task runner
    if cli.doctor {
        run_doctor(&EnvFileValidator::from_env());
        return ExitCode::SUCCESS;
    }

    print_startup_banner();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error_stderr(color_enabled_stderr(), &format!("cms-dev: {e}"));
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let validator = EnvFileValidator::from_env();
    let (target, verdict) = choose_target(cli.setup, cli.cms, &validator);
    if let Some(verdict) = &verdict {
        if verdict.complete {
            print!("{}", render_setup_complete_panel(verdict));
        } else {
            print!("{}", render_setup_required_panel(verdict));
        }
    }

    let mode = if cli.prod { Mode::Build } else { Mode::Dev };
    let env = resolve_execution_environment();

    let use_err = color_enabled_stderr();
    if cli.verbose {
        match env.shim_dir() {
            Some(dir) => log_info_stderr(
                use_err,
                &format!("cms-dev: created {ALIAS_NAME} shim at {}", dir.display()),
            ),
            None => log_info_stderr(
                use_err,
                &format!("cms-dev: {ALIAS_NAME} resolvable on PATH; no shim needed"),
            ),
        }
        for (key, value) in env.vars() {
            log_info_stderr(
                use_err,
                &format!("cms-dev: env {key}={}", value.to_string_lossy()),
            );
        }
    }
    if cli.dry_run {
        log_info_stderr(
            use_err,
            &format!(
                "cms-dev: dry-run requested; would run: {}",
                launch_preview(mode, target)
            ),
        );
        return Ok(());
    }

    log_info_stderr(
        use_err,
        &format!(
            " 🚀  Launching {} ({})...",
            target.as_str(),
            mode.subcommand()
        ),
    );

    launch(
        &env,
        mode,
        target,
        LaunchOptions {
            force_color: false,
            forward_interrupt: true,
        },
    )
    .map_err(|e| anyhow!(display_for_launch_error(&e)))
}
