use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::algorithm::{Algorithm, BuildRegistry, Identity};
use crate::config::GeneratorConfig;
use crate::experiment::Experiment;
use crate::layout::Layout;
use crate::plan::{CallWrapper, System};

/// Side-effect free preview of a generation run
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub system: System,
    pub call_wrapper: CallWrapper,
    pub time_cmd: Option<String>,
    pub experiments: Vec<ExperimentSummary>,
    pub builds: usize,
    pub total_commands: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentSummary {
    pub name: String,
    pub graphs: usize,
    pub timeout_minutes: u64,
    pub commands_per_algorithm: usize,
    pub algorithms: Vec<AlgorithmSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmSummary {
    pub name: String,
    pub identity: Identity,
    pub target: String,
    pub binary: PathBuf,
    /// Reuses the build of an earlier algorithm
    pub shared_build: bool,
}

impl PlanSummary {
    pub fn new(config: &GeneratorConfig, experiments: &[Experiment], layout: &Layout) -> Self {
        let mut registry = BuildRegistry::new();
        let mut total_commands = 0;

        let experiments = experiments
            .iter()
            .map(|experiment| {
                let algorithms: Vec<AlgorithmSummary> = experiment
                    .algorithms
                    .iter()
                    .map(|config| {
                        let algorithm = Algorithm::new(config, layout);
                        AlgorithmSummary {
                            shared_build: !registry.should_build(algorithm.identity()),
                            binary: algorithm.binary_path(),
                            identity: algorithm.identity().clone(),
                            target: algorithm.target,
                            name: algorithm.name,
                        }
                    })
                    .collect();
                total_commands += experiment.commands_per_algorithm() * algorithms.len();

                ExperimentSummary {
                    name: experiment.name.clone(),
                    graphs: experiment.graphs.len(),
                    timeout_minutes: experiment.timeout_minutes,
                    commands_per_algorithm: experiment.commands_per_algorithm(),
                    algorithms,
                }
            })
            .collect();

        Self {
            system: config.system,
            call_wrapper: config.call_wrapper,
            time_cmd: config.time_cmd.clone(),
            experiments,
            builds: registry.len(),
            total_commands,
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "System: {}, call wrapper: {}, time command: {}",
            self.system,
            self.call_wrapper,
            self.time_cmd.as_deref().unwrap_or("none")
        )?;
        for experiment in &self.experiments {
            writeln!(
                f,
                "Experiment {}: {} graphs, {} commands per algorithm, timeout {}",
                experiment.name,
                experiment.graphs,
                experiment.commands_per_algorithm,
                match experiment.timeout_minutes {
                    0 => "disabled".to_string(),
                    m => format!("{m}m"),
                }
            )?;
            for algorithm in &experiment.algorithms {
                writeln!(
                    f,
                    "  {} [{}] {}{}",
                    algorithm.name,
                    algorithm.identity,
                    algorithm.binary.display(),
                    if algorithm.shared_build {
                        " (shared build)"
                    } else {
                        ""
                    }
                )?;
            }
        }
        write!(
            f,
            "{} builds, {} commands in total",
            self.builds, self.total_commands
        )
    }
}
