use serde::Serialize;
use std::path::PathBuf;

use crate::algorithm::{FetchOutcome, Identity};

/// What a generation run produced
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub experiments: Vec<ExperimentReport>,
    pub submit: PathBuf,
    pub ordered_starter: PathBuf,
    pub ordered_submit: PathBuf,
    /// Distinct source trees fetched and built
    pub builds: usize,
    pub total_commands: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub name: String,
    pub starter: PathBuf,
    pub algorithms: Vec<AlgorithmReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmReport {
    pub name: String,
    pub identity: Identity,
    pub source_dir: PathBuf,
    pub binary: PathBuf,
    pub script: PathBuf,
    pub commands: usize,
    /// `None` when an earlier algorithm with the same identity was already built
    pub fetch: Option<FetchOutcome>,
}

impl GenerationReport {
    pub fn algorithms(&self) -> impl Iterator<Item = &AlgorithmReport> {
        self.experiments.iter().flat_map(|e| e.algorithms.iter())
    }
}
