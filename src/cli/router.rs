//! Command routing and execution

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::args::{Cli, Commands};
use crate::config::GeneratorConfig;
use crate::error::PartexpError;
use crate::experiment::Experiment;
use crate::generate::{generate, GenerationReport, PlanSummary};
use crate::layout::Layout;
use crate::subprocess::SubprocessManager;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(cli: Cli) -> Result<()> {
    let root = resolve_root(cli.directory.as_deref())?;
    let layout = Layout::new(root);
    let config_path = cli.config.unwrap_or_else(|| layout.config_file());
    debug!(
        "Working root {}, configuration {}",
        layout.root().display(),
        config_path.display()
    );

    match cli.command.unwrap_or_default() {
        Commands::Generate { dry_run, json } => {
            run_generate(layout, &config_path, dry_run, json).await
        }
        Commands::Validate { json } => run_validate(&layout, &config_path, json),
    }
}

async fn run_generate(layout: Layout, config_path: &Path, dry_run: bool, json: bool) -> Result<()> {
    let config = GeneratorConfig::load(config_path).map_err(PartexpError::from)?;
    let subprocess = if dry_run {
        SubprocessManager::dry_run()
    } else {
        SubprocessManager::production()
    };

    let report = generate(layout, config, subprocess).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_validate(layout: &Layout, config_path: &Path, json: bool) -> Result<()> {
    let config = GeneratorConfig::load(config_path).map_err(PartexpError::from)?;
    let experiments =
        Experiment::resolve_all(config.experiments.clone(), layout).map_err(PartexpError::from)?;
    let summary = PlanSummary::new(&config, &experiments, layout);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
        println!("Configuration {} is valid", config_path.display());
    }
    Ok(())
}

fn print_report(report: &GenerationReport) {
    for experiment in &report.experiments {
        println!("Experiment {}: {}", experiment.name, experiment.starter.display());
        for algorithm in &experiment.algorithms {
            println!(
                "  {} -> {} ({} commands)",
                algorithm.name,
                algorithm.script.display(),
                algorithm.commands
            );
        }
    }
    println!(
        "Generated {} commands; submit with {} or {}",
        report.total_commands,
        report.submit.display(),
        report.ordered_submit.display()
    );
}

fn resolve_root(directory: Option<&Path>) -> Result<PathBuf> {
    match directory {
        Some(dir) => std::fs::canonicalize(dir)
            .with_context(|| format!("Working directory {} does not exist", dir.display())),
        None => std::env::current_dir().context("Failed to determine the current directory"),
    }
}
