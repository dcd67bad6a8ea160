//! CLI argument structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate reproducible graph partitioning experiment scripts
#[derive(Parser, Debug)]
#[command(name = "partexp")]
#[command(about = "partexp - Generate reproducible graph partitioning experiment scripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Experiment configuration file (default: Experiment.toml in the working directory)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory for scripts, logs and sources (default: current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch and build all algorithms and write the experiment scripts (default command)
    Generate {
        /// Log fetch and build commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Print the generation report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check the configuration and graph directories without writing or running anything
    Validate {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Generate {
            dry_run: false,
            json: false,
        }
    }
}

/// Map the `-v` count to a tracing filter
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
