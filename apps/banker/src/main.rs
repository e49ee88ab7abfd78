//! banker - Banker's algorithm safety checker
//!
//! Loads process/resource state descriptions and reports whether each one is
//! safe, i.e. whether some completion order lets every process finish.

mod cli;
mod display;
mod error;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::{Evaluation, OutputRenderer};
use crate::error::CliError;
use banker_config::Config;
use banker_errors::UserFacingError;
use banker_state::{Capacity, LoadOptions, SystemState};
use banker_types::OutputFormat;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};

/// Exit status when every evaluated state is safe
const EXIT_SAFE: i32 = 0;
/// Exit status when at least one evaluated state is unsafe
const EXIT_UNSAFE: i32 = 2;

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            if json_mode {
                let payload = serde_json::json!({
                    "error": e.user_message(),
                    "code": e.user_code(),
                    "hint": e.user_hint(),
                    "retryable": e.is_retryable(),
                });
                println!("{payload}");
            } else {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<i32, CliError> {
    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);

    init_tracing(cli.global.json, cli.global.debug, &config.log_dir());
    info!("Starting banker v{}", env!("CARGO_PKG_VERSION"));

    let renderer = OutputRenderer::new(config.general.default_output, config.general.color);
    let mut state = SystemState::with_options(LoadOptions {
        capacity: Capacity::new(config.limits.max_processes, config.limits.max_resources),
        strict: config.validation.strict,
    });

    let code = match cli.command {
        Commands::Check { files } => check(&mut state, &files, &renderer)?,
        Commands::Show { file } => show(&mut state, &file, &renderer)?,
    };

    info!(code, "Command completed");
    Ok(code)
}

/// Evaluate each file in turn, reusing one state
fn check(
    state: &mut SystemState,
    files: &[PathBuf],
    renderer: &OutputRenderer,
) -> Result<i32, CliError> {
    let mut evaluations = Vec::with_capacity(files.len());
    for file in files {
        state.load_path(file)?;
        let report = banker_safety::analyze(state);
        info!(
            file = %file.display(),
            safe = report.safe,
            completed = report.completed_count(),
            "Evaluated state"
        );
        evaluations.push(Evaluation {
            file: file.display().to_string(),
            processes: state.process_count(),
            resources: state.resource_count(),
            report,
        });
    }

    renderer.render_check(&evaluations)?;

    let all_safe = evaluations.iter().all(|e| e.report.safe);
    Ok(if all_safe { EXIT_SAFE } else { EXIT_UNSAFE })
}

fn show(state: &mut SystemState, file: &Path, renderer: &OutputRenderer) -> Result<i32, CliError> {
    state.load_path(file)?;
    let report = banker_safety::analyze(state);
    let violations = state.validate();
    renderer.render_show(&file.display().to_string(), state, &report, &violations)?;
    Ok(if report.safe { EXIT_SAFE } else { EXIT_UNSAFE })
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if global.json {
        config.general.default_output = OutputFormat::Json;
    }
    if let Some(color) = global.color {
        config.general.color = color;
    }
    if global.strict {
        config.validation.strict = true;
    }
    if let Some(max) = global.max_processes {
        config.limits.max_processes = max;
    }
    if let Some(max) = global.max_resources {
        config.limits.max_resources = max;
    }
}

fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;
    let default_filter = || {
        tracing_subscriber::EnvFilter::new("info,banker=debug,banker_state=debug,banker_safety=debug")
    };

    if debug_enabled_flag {
        // Debug mode: structured JSON logs to file
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }

        let log_file = log_dir.join(format!(
            "banker-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| default_filter()),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file: {e}");
            }
        }
    }

    if json_mode {
        // JSON mode: suppress console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter()),
            )
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,banker=warn,banker_state=warn")
                }),
            )
            .init();
    }
}
