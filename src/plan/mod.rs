//! Expansion of an experiment into concrete shell lines

use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod command;
pub mod sweep;
pub mod wrapper;

pub use command::{ShellCommand, Word};
pub use sweep::{format_real, Sweep, SweepPoint};
pub use wrapper::{CallWrapper, ExecutionPolicy, System};

use crate::algorithm::Algorithm;
use crate::experiment::Experiment;
use crate::layout::Layout;

/// A fully composed shell line and the graph it reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    pub graph: PathBuf,
    pub command: String,
}

pub struct CommandPlanner<'a> {
    layout: &'a Layout,
    policy: &'a ExecutionPolicy,
}

impl<'a> CommandPlanner<'a> {
    pub fn new(layout: &'a Layout, policy: &'a ExecutionPolicy) -> Self {
        Self { layout, policy }
    }

    /// One record per sweep point, in sweep order
    pub fn plan(&self, experiment: &Experiment, algorithm: &Algorithm) -> Vec<CommandRecord> {
        let log_dir = self.layout.log_dir(&experiment.name, &algorithm.name);
        let binary = algorithm.binary_path();

        experiment
            .sweep
            .points(&experiment.graphs)
            .map(|point| {
                let log = log_dir.join(point.log_file_name());
                let base = ShellCommand::new(binary.to_string_lossy())
                    .args(generated_arguments(algorithm, &point))
                    .raw_args(&algorithm.args)
                    .append_output_to(log);
                let command = self.policy.wrap(
                    base,
                    point.processes,
                    point.threads,
                    experiment.timeout_minutes,
                );
                CommandRecord {
                    graph: point.graph.to_path_buf(),
                    command: command.render(),
                }
            })
            .collect()
    }
}

/// `[-H] -T -G <graph> -t <threads> -k <k> -e <eps> -s <seed>`
pub fn generated_arguments(algorithm: &Algorithm, point: &SweepPoint<'_>) -> Vec<String> {
    let mut args = Vec::with_capacity(12);
    if algorithm.heap_profiled() {
        args.push("-H".to_string());
    }
    args.push("-T".to_string());
    args.push("-G".to_string());
    args.push(path_word(point.graph));
    args.push("-t".to_string());
    args.push(point.threads.to_string());
    args.push("-k".to_string());
    args.push(point.k.to_string());
    args.push("-e".to_string());
    args.push(format_real(point.epsilon));
    args.push("-s".to_string());
    args.push(point.seed.to_string());
    args
}

fn path_word(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
