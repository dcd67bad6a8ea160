use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// Regular files of `dir`, sorted by path
///
/// Fails when the directory is missing, holds no files, or holds two files
/// with the same stem, since those would write to the same log files.
pub fn discover_graphs(experiment: &str, dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !dir.is_dir() {
        return Err(ConfigError::GraphsMissing {
            experiment: experiment.to_string(),
            path: dir.to_path_buf(),
        });
    }

    let unreadable = |source| ConfigError::GraphsUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut graphs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() {
            graphs.push(path);
        }
    }

    if graphs.is_empty() {
        return Err(ConfigError::GraphsEmpty {
            experiment: experiment.to_string(),
            path: dir.to_path_buf(),
        });
    }

    graphs.sort();
    check_unique_stems(experiment, &graphs)?;
    Ok(graphs)
}

fn check_unique_stems(experiment: &str, graphs: &[PathBuf]) -> Result<(), ConfigError> {
    let mut seen: HashMap<&std::ffi::OsStr, &Path> = HashMap::new();
    for graph in graphs {
        let Some(stem) = graph.file_stem() else {
            continue;
        };
        if let Some(first) = seen.insert(stem, graph.as_path()) {
            return Err(ConfigError::DuplicateGraphStem {
                experiment: experiment.to_string(),
                stem: stem.to_string_lossy().into_owned(),
                first: first.to_path_buf(),
                second: graph.clone(),
            });
        }
    }
    Ok(())
}
