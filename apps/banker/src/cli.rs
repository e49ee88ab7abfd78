//! Command line interface definition

use banker_types::ColorChoice;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// banker - Banker's algorithm safety checker
#[derive(Parser)]
#[command(name = "banker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Banker's algorithm safety checker for process/resource states")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the configured log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Reject states where allocation exceeds claim or total
    #[arg(long, global = true)]
    pub strict: bool,

    /// Largest process count a state file may declare
    #[arg(long, global = true, value_name = "N")]
    pub max_processes: Option<usize>,

    /// Largest resource-type count a state file may declare
    #[arg(long, global = true, value_name = "N")]
    pub max_resources: Option<usize>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one or more state files and report whether each is safe
    #[command(alias = "c")]
    Check {
        /// State description files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the claim, allocation and need matrices of a state file
    Show {
        /// State description file
        file: PathBuf,
    },
}
