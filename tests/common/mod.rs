//! Common test utilities and helpers

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Working root with an `Experiment.toml` and graph files
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn with_config(self, content: &str) -> Self {
        fs::write(self.path("Experiment.toml"), content).expect("Failed to write config");
        self
    }

    /// Create empty graph files below the root
    pub fn with_graphs(self, graphs: &[&str]) -> Self {
        for graph in graphs {
            let path = self.path(graph);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("Failed to create graph dir");
            }
            fs::write(&path, "").expect("Failed to write graph");
        }
        self
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// Script body without the shebang
    pub fn script_lines(&self, relative: &str) -> Vec<String> {
        self.read(relative)
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }
}

/// An experiment `E` over `graphs/` with the given algorithm tables appended
pub fn scenario_config(algorithms: &str) -> String {
    format!(
        r#"
[E]
graphs = "graphs"
processes = [1]
threads = [1]
seeds = [0]
ks = [2]
epsilons = [0.03]

{algorithms}
"#
    )
}
