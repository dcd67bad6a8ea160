//! `Experiment.toml` schema
//!
//! The file has three levels. Top-level scalars select the execution
//! environment, every top-level table is an experiment, and every table inside
//! an experiment is an algorithm variant:
//!
//! ```toml
//! system = "generic"          # generic | background | i10-exclusive | i10-nonexclusive
//! call-wrapper = "taskset"    # none | taskset | mpi
//! time-cmd = "/usr/bin/time"
//!
//! [E]
//! graphs = "graphs"
//! processes = [1]
//! threads = [1, 4]
//! seeds = [0]
//! ks = [2]
//! epsilons = [0.03]
//! timeout = 60
//!
//! [E.kaminpar]
//! git-url = "https://github.com/KaHIP/KaMinPar.git"
//! branch = "main"
//! compile-flags = []
//! args = ["--foo"]
//! ```

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod error;
pub mod table;

pub use error::ConfigError;
pub use table::{ConfigTable, ConfigValue};

use crate::plan::{CallWrapper, ExecutionPolicy, Sweep, System};

pub const CONFIG_FILE_NAME: &str = "Experiment.toml";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_TARGET: &str = "KaMinPar";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub system: System,
    pub call_wrapper: CallWrapper,
    /// Timing harness prefix; `None` when absent or empty
    pub time_cmd: Option<String>,
    pub experiments: Vec<ExperimentConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub name: String,
    /// Graph directory as written in the file, relative paths are resolved
    /// against the working root
    pub graphs: PathBuf,
    pub sweep: Sweep,
    /// 0 disables the timeout
    pub timeout_minutes: u64,
    pub algorithms: Vec<AlgorithmConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmConfig {
    pub name: String,
    pub git_url: String,
    pub branch: String,
    pub target: String,
    pub compile_flags: Vec<String>,
    pub args: Vec<String>,
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content)?;
        Self::from_table(table)
    }

    pub fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        let mut root = ConfigTable::new("the top level", table);

        let system_name = root.take_or("system", System::default().name().to_string())?;
        let system = System::from_name(&system_name)
            .ok_or_else(|| unknown_variant("system", &system_name, System::NAMES))?;

        let wrapper_name = root.take_or("call-wrapper", CallWrapper::default().name().to_string())?;
        let call_wrapper = CallWrapper::from_name(&wrapper_name)
            .ok_or_else(|| unknown_variant("call-wrapper", &wrapper_name, CallWrapper::NAMES))?;

        let time_cmd: String = root.take_or("time-cmd", String::new())?;
        let time_cmd = Some(time_cmd).filter(|cmd| !cmd.trim().is_empty());

        let experiments = root
            .into_entries()
            .into_iter()
            .map(|(name, value)| {
                let context = format!("experiment '{name}'");
                let toml::Value::Table(table) = value else {
                    return Err(ConfigError::NotATable(context));
                };
                ExperimentConfig::from_table(name, ConfigTable::new(context, table))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            system,
            call_wrapper,
            time_cmd,
            experiments,
        })
    }

    pub fn policy(&self) -> ExecutionPolicy {
        ExecutionPolicy {
            call_wrapper: self.call_wrapper,
            time_cmd: self.time_cmd.clone(),
        }
    }
}

impl ExperimentConfig {
    fn from_table(name: String, mut table: ConfigTable) -> Result<Self, ConfigError> {
        validate_name("experiment", &name)?;

        let graphs: String = table.take("graphs")?;
        let sweep = Sweep {
            processes: take_positive(&mut table, "processes")?,
            threads: take_positive(&mut table, "threads")?,
            seeds: table.take_list("seeds")?,
            ks: take_positive(&mut table, "ks")?,
            epsilons: take_epsilons(&mut table)?,
        };
        let timeout_minutes = table.take_or("timeout", 0u64)?;

        let algorithms = table
            .into_entries()
            .into_iter()
            .map(|(algorithm, value)| {
                let context = format!("algorithm '{algorithm}' of experiment '{name}'");
                let toml::Value::Table(algorithm_table) = value else {
                    return Err(ConfigError::NotATable(context));
                };
                AlgorithmConfig::from_table(algorithm, ConfigTable::new(context, algorithm_table))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            graphs: PathBuf::from(graphs),
            sweep,
            timeout_minutes,
            algorithms,
        })
    }
}

impl AlgorithmConfig {
    fn from_table(name: String, mut table: ConfigTable) -> Result<Self, ConfigError> {
        validate_name("algorithm", &name)?;

        let git_url = table.take("git-url")?;
        let branch = table.take_or("branch", DEFAULT_BRANCH.to_string())?;
        let target = table.take_or("target", DEFAULT_TARGET.to_string())?;
        let compile_flags: Vec<String> = table.take_list("compile-flags")?;
        let args = table.take_list("args")?;

        for flag in &compile_flags {
            shell_words::split(flag).map_err(|e| {
                table.invalid("compile-flags", format!("cannot split '{flag}' into words: {e}"))
            })?;
        }

        if !table.is_empty() {
            warn!(
                "Ignoring unknown keys in {}: {}",
                table.context(),
                table.keys().collect::<Vec<_>>().join(", ")
            );
        }

        Ok(Self {
            name,
            git_url,
            branch,
            target,
            compile_flags,
            args,
        })
    }
}

fn unknown_variant(key: &str, value: &str, expected: &[&str]) -> ConfigError {
    ConfigError::UnknownVariant {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.join(", "),
    }
}

/// Names end up as path components of scripts and log directories
fn validate_name(kind: &'static str, name: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains('/') {
        "must not contain '/'"
    } else if name == "." || name == ".." {
        "must not be '.' or '..'"
    } else {
        return Ok(());
    };
    Err(ConfigError::InvalidName {
        kind,
        name: name.to_string(),
        reason,
    })
}

fn take_positive(table: &mut ConfigTable, key: &str) -> Result<Vec<u32>, ConfigError> {
    let values: Vec<u32> = table.take_list(key)?;
    if values.contains(&0) {
        return Err(table.invalid(key, "values must be positive"));
    }
    Ok(values)
}

fn take_epsilons(table: &mut ConfigTable) -> Result<Vec<f64>, ConfigError> {
    let values: Vec<f64> = table.take_list("epsilons")?;
    if let Some(bad) = values.iter().find(|eps| !eps.is_finite() || **eps < 0.0) {
        return Err(table.invalid(
            "epsilons",
            format!("{bad} is not a non-negative finite number"),
        ));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
system = "background"
call-wrapper = "taskset"
time-cmd = "/usr/bin/time"

[E]
graphs = "graphs"
processes = [1]
threads = [1, 4]
seeds = [0, 1]
ks = [2]
epsilons = [0.03]
timeout = 5

[E.a]
git-url = "https://example.com/kaminpar.git"
compile-flags = ["-DKAMINPAR_ENABLE_HEAP_PROFILING=On"]
args = ["--foo"]

[E.b]
git-url = "https://example.com/kaminpar.git"
branch = "v3.0"
target = "dKaMinPar"
compile-flags = []
args = []
"#;

    #[test]
    fn test_parse_full_configuration() {
        let config = GeneratorConfig::parse(SCENARIO).unwrap();

        assert_eq!(config.system, System::Background);
        assert_eq!(config.call_wrapper, CallWrapper::Taskset);
        assert_eq!(config.time_cmd.as_deref(), Some("/usr/bin/time"));
        assert_eq!(config.experiments.len(), 1);

        let experiment = &config.experiments[0];
        assert_eq!(experiment.name, "E");
        assert_eq!(experiment.graphs, PathBuf::from("graphs"));
        assert_eq!(experiment.sweep.threads, vec![1, 4]);
        assert_eq!(experiment.sweep.seeds, vec![0, 1]);
        assert_eq!(experiment.sweep.epsilons, vec![0.03]);
        assert_eq!(experiment.timeout_minutes, 5);

        let names: Vec<&str> = experiment.algorithms.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let a = &experiment.algorithms[0];
        assert_eq!(a.branch, DEFAULT_BRANCH);
        assert_eq!(a.target, DEFAULT_TARGET);
        assert_eq!(a.args, vec!["--foo"]);

        let b = &experiment.algorithms[1];
        assert_eq!(b.branch, "v3.0");
        assert_eq!(b.target, "dKaMinPar");
    }

    #[test]
    fn test_defaults_for_top_level_keys() {
        let config = GeneratorConfig::parse("").unwrap();
        assert_eq!(config.system, System::Generic);
        assert_eq!(config.call_wrapper, CallWrapper::None);
        assert_eq!(config.time_cmd, None);
        assert!(config.experiments.is_empty());
    }

    #[test]
    fn test_empty_time_cmd_is_disabled() {
        let config = GeneratorConfig::parse("time-cmd = \"\"").unwrap();
        assert_eq!(config.time_cmd, None);
    }

    #[test]
    fn test_unknown_system_is_rejected() {
        let err = GeneratorConfig::parse("system = \"slurm\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVariant { ref value, .. } if value == "slurm"));
    }

    #[test]
    fn test_unknown_call_wrapper_is_rejected() {
        let err = GeneratorConfig::parse("call-wrapper = \"srun\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVariant { ref key, .. } if key == "call-wrapper"));
    }

    #[test]
    fn test_experiment_must_be_table() {
        let err = GeneratorConfig::parse("E = 3").unwrap_err();
        assert!(matches!(err, ConfigError::NotATable(_)));
    }

    #[test]
    fn test_missing_graphs_names_experiment() {
        let err = GeneratorConfig::parse(
            "[E]\nprocesses = [1]\nthreads = [1]\nseeds = [0]\nks = [2]\nepsilons = [0.03]",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required key 'graphs' in experiment 'E'");
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = GeneratorConfig::parse(
            "[E]\ngraphs = 'g'\nprocesses = [1]\nthreads = [0]\nseeds = [0]\nks = [2]\nepsilons = [0.03]",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "threads"));
    }

    #[test]
    fn test_negative_epsilon_rejected() {
        let err = GeneratorConfig::parse(
            "[E]\ngraphs = 'g'\nprocesses = [1]\nthreads = [1]\nseeds = [0]\nks = [2]\nepsilons = [-0.1]",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "epsilons"));
    }

    #[test]
    fn test_algorithm_must_be_table() {
        let err = GeneratorConfig::parse(
            "[E]\ngraphs = 'g'\nprocesses = [1]\nthreads = [1]\nseeds = [0]\nks = [2]\nepsilons = [0.03]\nextra = 1",
        )
        .unwrap_err();
        match err {
            ConfigError::NotATable(context) => {
                assert_eq!(context, "algorithm 'extra' of experiment 'E'")
            }
            other => panic!("Expected NotATable, got {other:?}"),
        }
    }

    #[test]
    fn test_algorithm_requires_git_url() {
        let err = GeneratorConfig::parse(
            "[E]\ngraphs = 'g'\nprocesses = [1]\nthreads = [1]\nseeds = [0]\nks = [2]\nepsilons = [0.03]\n[E.a]\ncompile-flags = []\nargs = []",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "git-url"));
    }

    #[test]
    fn test_unbalanced_compile_flag_quote_rejected() {
        let err = GeneratorConfig::parse(
            "[E]\ngraphs = 'g'\nprocesses = [1]\nthreads = [1]\nseeds = [0]\nks = [2]\nepsilons = [0.03]\n[E.a]\ngit-url = 'u'\ncompile-flags = [\"-DX='unterminated\"]\nargs = []",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "compile-flags"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(validate_name("experiment", "").is_err());
        assert!(validate_name("experiment", "a/b").is_err());
        assert!(validate_name("algorithm", "..").is_err());
        assert!(validate_name("algorithm", "kaminpar-v3").is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = GeneratorConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_unparsable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[E\ngraphs = ").unwrap();
        assert!(matches!(
            GeneratorConfig::load(&path).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
