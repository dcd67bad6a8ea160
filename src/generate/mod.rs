//! A generation run: fetch and build each distinct algorithm once, then write
//! the script hierarchy
//!
//! Run state lives in one [`Generator`] value: the identities built so far and
//! every command emitted, which feeds the graph-ordered starter script at the
//! end of the run.

use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

pub mod report;
pub mod summary;

pub use report::{AlgorithmReport, ExperimentReport, GenerationReport};
pub use summary::{AlgorithmSummary, ExperimentSummary, PlanSummary};

use crate::algorithm::{Algorithm, BuildRegistry};
use crate::config::{AlgorithmConfig, GeneratorConfig};
use crate::error::{ErrorExt, Result};
use crate::experiment::Experiment;
use crate::layout::Layout;
use crate::plan::{
    generated_arguments, CommandPlanner, CommandRecord, ExecutionPolicy, ShellCommand, System,
};
use crate::script::Script;
use crate::subprocess::SubprocessManager;

/// Validate, resolve every graph directory, then generate
///
/// Nothing is written and nothing is run unless the whole configuration is valid.
pub async fn generate(
    layout: Layout,
    config: GeneratorConfig,
    subprocess: SubprocessManager,
) -> Result<GenerationReport> {
    let experiments = Experiment::resolve_all(config.experiments.clone(), &layout)?;
    Generator::new(layout, config.system, config.policy(), subprocess)
        .run(&experiments)
        .await
}

pub struct Generator {
    layout: Layout,
    system: System,
    policy: ExecutionPolicy,
    subprocess: SubprocessManager,
    builds: BuildRegistry,
    commands: Vec<CommandRecord>,
}

impl Generator {
    pub fn new(
        layout: Layout,
        system: System,
        policy: ExecutionPolicy,
        subprocess: SubprocessManager,
    ) -> Self {
        Self {
            layout,
            system,
            policy,
            subprocess,
            builds: BuildRegistry::new(),
            commands: Vec::new(),
        }
    }

    pub async fn run(mut self, experiments: &[Experiment]) -> Result<GenerationReport> {
        let mut submit = Script::new();
        let mut reports = Vec::with_capacity(experiments.len());

        for experiment in experiments {
            let report = self.generate_experiment(experiment).await?;
            submit.push(self.system.dispatch(&report.starter));
            reports.push(report);
        }

        let submit_path = self.layout.submit_script();
        submit.write_executable(&submit_path)?;

        let total_commands = self.commands.len();
        let (ordered_starter, ordered_submit) = self.write_ordered()?;

        info!(
            "Generated {} commands for {} experiments using {} builds",
            total_commands,
            reports.len(),
            self.builds.len()
        );

        Ok(GenerationReport {
            experiments: reports,
            submit: submit_path,
            ordered_starter,
            ordered_submit,
            builds: self.builds.len(),
            total_commands,
        })
    }

    /// Write one script per algorithm plus the experiment's starter script
    pub async fn generate_experiment(&mut self, experiment: &Experiment) -> Result<ExperimentReport> {
        info!(
            "Generating experiment {} ({} algorithms, {} graphs)",
            experiment.name,
            experiment.algorithms.len(),
            experiment.graphs.len()
        );

        let mut starter = Script::new();
        let mut algorithms = Vec::with_capacity(experiment.algorithms.len());
        for config in &experiment.algorithms {
            let report = self.generate_algorithm(experiment, config).await?;
            starter.push(ShellCommand::new("bash").path(&report.script).render());
            algorithms.push(report);
        }

        let starter_path = self.layout.starter_script(&experiment.name);
        starter.write_executable(&starter_path)?;

        Ok(ExperimentReport {
            name: experiment.name.clone(),
            starter: starter_path,
            algorithms,
        })
    }

    async fn generate_algorithm(
        &mut self,
        experiment: &Experiment,
        config: &AlgorithmConfig,
    ) -> Result<AlgorithmReport> {
        let algorithm = Algorithm::new(config, &self.layout);

        let fetch = if self.builds.should_build(algorithm.identity()) {
            let outcome = algorithm.fetch(&self.subprocess.git()).await?;
            algorithm.build(&self.subprocess.cmake()).await?;
            Some(outcome)
        } else {
            info!(
                "Algorithm {} shares sources {} with an earlier algorithm: skipping fetch and build",
                algorithm.name,
                algorithm.identity()
            );
            None
        };

        log_algorithm(experiment, &algorithm);

        let records = CommandPlanner::new(&self.layout, &self.policy).plan(experiment, &algorithm);
        let script: Script = records.iter().map(|r| r.command.as_str()).collect();

        let log_dir = self.layout.log_dir(&experiment.name, &algorithm.name);
        fs::create_dir_all(&log_dir).to_storage_error(&log_dir, "Failed to create log directory")?;

        let script_path = self.layout.algorithm_script(&experiment.name, &algorithm.name);
        script.write_executable(&script_path)?;

        let commands = records.len();
        self.commands.extend(records);

        Ok(AlgorithmReport {
            binary: algorithm.binary_path(),
            identity: algorithm.identity().clone(),
            source_dir: algorithm.source_dir().to_path_buf(),
            name: algorithm.name,
            script: script_path,
            commands,
            fetch,
        })
    }

    /// Every command of the run, stably sorted by input graph
    fn write_ordered(&mut self) -> Result<(PathBuf, PathBuf)> {
        let mut commands = std::mem::take(&mut self.commands);
        commands.sort_by(|a, b| a.graph.as_os_str().cmp(b.graph.as_os_str()));

        let starter: Script = commands.into_iter().map(|r| r.command).collect();
        let starter_path = self.layout.ordered_starter_script();
        starter.write_executable(&starter_path)?;

        let mut submit = Script::new();
        submit.push(self.system.dispatch(&starter_path));
        let submit_path = self.layout.ordered_submit_script();
        submit.write_executable(&submit_path)?;

        Ok((starter_path, submit_path))
    }
}

fn log_algorithm(experiment: &Experiment, algorithm: &Algorithm) {
    info!(
        "Generating {} calls for algorithm {} using binary {}",
        experiment.commands_per_algorithm(),
        algorithm.name,
        algorithm.binary_path().display()
    );
    if let Some(point) = experiment.sweep.points(&experiment.graphs).next() {
        debug!(
            "  generated arguments: {}",
            shell_words::join(generated_arguments(algorithm, &point))
        );
    }
    debug!("  custom arguments: {}", algorithm.args.join(" "));
    debug!(
        "  timeout: {}",
        match experiment.timeout_minutes {
            0 => "disabled".to_string(),
            m => format!("{m} minutes"),
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Sweep;
    use tempfile::TempDir;

    fn algorithm(name: &str, args: &[&str]) -> AlgorithmConfig {
        AlgorithmConfig {
            name: name.to_string(),
            git_url: "https://example.com/kaminpar.git".to_string(),
            branch: "main".to_string(),
            target: "KaMinPar".to_string(),
            compile_flags: Vec::new(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn experiment(root: &std::path::Path, name: &str, graphs: &[&str]) -> Experiment {
        Experiment {
            name: name.to_string(),
            sweep: Sweep {
                processes: vec![1],
                threads: vec![1],
                seeds: vec![0],
                ks: vec![2],
                epsilons: vec![0.03],
            },
            timeout_minutes: 0,
            graphs: graphs.iter().map(|g| root.join(g)).collect(),
            algorithms: vec![algorithm("a", &["--foo"]), algorithm("b", &["--bar"])],
        }
    }

    #[tokio::test]
    async fn test_shared_identity_builds_once() {
        let root = TempDir::new().unwrap();
        let (manager, mut mock) = SubprocessManager::mock();
        mock.expect_command("git").returns_success().finish();
        mock.expect_command("cmake").returns_success().finish();

        let generator = Generator::new(
            Layout::new(root.path()),
            System::Generic,
            ExecutionPolicy::default(),
            manager,
        );
        let report = generator
            .run(&[experiment(root.path(), "E", &["g/g1.graph"])])
            .await
            .unwrap();

        assert!(mock.verify_called("git", 2)); // clone + checkout
        assert!(mock.verify_called("cmake", 2)); // configure + build
        assert_eq!(report.builds, 1);

        let algorithms: Vec<_> = report.algorithms().collect();
        assert!(algorithms[0].fetch.is_some());
        assert!(algorithms[1].fetch.is_none());

        let a = std::fs::read_to_string(&algorithms[0].script).unwrap();
        let b = std::fs::read_to_string(&algorithms[1].script).unwrap();
        assert!(a.contains("--foo") && !a.contains("--bar"));
        assert!(b.contains("--bar") && !b.contains("--foo"));
    }

    #[tokio::test]
    async fn test_ordered_starter_groups_by_graph() {
        let root = TempDir::new().unwrap();
        let generator = Generator::new(
            Layout::new(root.path()),
            System::Background,
            ExecutionPolicy::default(),
            SubprocessManager::dry_run(),
        );
        let experiments = [
            experiment(root.path(), "E1", &["g/b.graph", "g/c.graph"]),
            experiment(root.path(), "E2", &["g/a.graph", "g/b.graph"]),
        ];
        let report = generator.run(&experiments).await.unwrap();

        assert_eq!(report.total_commands, 8);
        let ordered = std::fs::read_to_string(&report.ordered_starter).unwrap();
        let graphs: Vec<&str> = ordered
            .lines()
            .skip(1)
            .map(|line| {
                ["a.graph", "b.graph", "c.graph"]
                    .into_iter()
                    .find(|g| line.contains(g))
                    .unwrap()
            })
            .collect();
        assert_eq!(
            graphs,
            vec!["a.graph", "a.graph", "b.graph", "b.graph", "b.graph", "b.graph", "c.graph", "c.graph"]
        );

        // stable: E1's b.graph lines precede E2's
        let b_lines: Vec<&str> = ordered.lines().filter(|l| l.contains("b.graph")).collect();
        assert!(b_lines[0].contains("/logs/E1/a/"));
        assert!(b_lines[2].contains("/logs/E2/a/"));

        let submit = std::fs::read_to_string(&report.ordered_submit).unwrap();
        assert!(submit.ends_with("&\ndisown\n"));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_run() {
        let root = TempDir::new().unwrap();
        let (manager, mut mock) = SubprocessManager::mock();
        mock.expect_command("git").returns_exit_code(128).finish();

        let generator = Generator::new(
            Layout::new(root.path()),
            System::Generic,
            ExecutionPolicy::default(),
            manager,
        );
        let err = generator
            .run(&[experiment(root.path(), "E", &["g/g1.graph"])])
            .await
            .unwrap_err();

        assert_eq!(err.code(), crate::error::ErrorCode::EXEC_SUBPROCESS_FAILED);
        assert!(!root.path().join("submit.sh").exists());
        assert!(mock.verify_called("cmake", 0));
    }
}
