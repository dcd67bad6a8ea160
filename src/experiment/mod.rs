//! Experiments with their graph directories resolved

use std::path::PathBuf;
use tracing::debug;

pub mod graphs;

pub use graphs::discover_graphs;

use crate::config::{AlgorithmConfig, ConfigError, ExperimentConfig};
use crate::layout::Layout;
use crate::plan::Sweep;

#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub name: String,
    pub sweep: Sweep,
    pub timeout_minutes: u64,
    /// Absolute, sorted
    pub graphs: Vec<PathBuf>,
    pub algorithms: Vec<AlgorithmConfig>,
}

impl Experiment {
    pub fn resolve(config: ExperimentConfig, layout: &Layout) -> Result<Self, ConfigError> {
        let dir = layout.resolve(&config.graphs);
        let graphs = discover_graphs(&config.name, &dir)?;
        debug!(
            "Experiment {} uses {} graphs from {}",
            config.name,
            graphs.len(),
            dir.display()
        );

        Ok(Self {
            name: config.name,
            sweep: config.sweep,
            timeout_minutes: config.timeout_minutes,
            graphs,
            algorithms: config.algorithms,
        })
    }

    /// Resolve every experiment, failing on the first invalid one
    pub fn resolve_all(
        configs: Vec<ExperimentConfig>,
        layout: &Layout,
    ) -> Result<Vec<Self>, ConfigError> {
        configs
            .into_iter()
            .map(|config| Self::resolve(config, layout))
            .collect()
    }

    /// Lines in each algorithm script of this experiment
    pub fn commands_per_algorithm(&self) -> usize {
        self.sweep.size(self.graphs.len())
    }
}
