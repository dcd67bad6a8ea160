use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::command::ShellCommand;

/// Per-command launcher placed directly around the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallWrapper {
    #[default]
    None,
    Taskset,
    Mpi,
}

impl CallWrapper {
    pub const NAMES: &'static [&'static str] = &["none", "taskset", "mpi"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "taskset" => Some(Self::Taskset),
            "mpi" => Some(Self::Mpi),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Taskset => "taskset",
            Self::Mpi => "mpi",
        }
    }

    pub fn wrap(&self, command: ShellCommand, processes: u32, threads: u32) -> ShellCommand {
        match self {
            Self::None => command,
            Self::Taskset => command.wrapped_in(
                ShellCommand::new("taskset")
                    .arg("-c")
                    .arg(format!("0-{}", threads.saturating_sub(1))),
            ),
            Self::Mpi => command.wrapped_in(
                ShellCommand::new("mpirun")
                    .args(["-n".to_string(), processes.to_string()])
                    .args(["--bind-to", "core", "--map-by"])
                    .raw(format!("socket:PE={threads}")),
            ),
        }
    }
}

impl fmt::Display for CallWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a whole script is handed to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum System {
    #[default]
    Generic,
    Background,
    I10Exclusive,
    I10Nonexclusive,
}

impl System {
    pub const NAMES: &'static [&'static str] =
        &["generic", "background", "i10-exclusive", "i10-nonexclusive"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "generic" => Some(Self::Generic),
            "background" => Some(Self::Background),
            "i10-exclusive" => Some(Self::I10Exclusive),
            "i10-nonexclusive" => Some(Self::I10Nonexclusive),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Background => "background",
            Self::I10Exclusive => "i10-exclusive",
            Self::I10Nonexclusive => "i10-nonexclusive",
        }
    }

    /// The line(s) that start `script` on this system
    pub fn dispatch(&self, script: &Path) -> String {
        let detached = |launcher: ShellCommand| {
            format!("{} &\ndisown", launcher.arg("bash").arg("--").path(script))
        };
        match self {
            Self::Generic => ShellCommand::new("bash").path(script).render(),
            Self::Background => detached(ShellCommand::new("nohup")),
            Self::I10Exclusive => detached(ShellCommand::new("nohup").arg("exclusive")),
            Self::I10Nonexclusive => detached(ShellCommand::new("nohup").arg("nonexclusive")),
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layers applied to every generated command, innermost first:
/// call wrapper, timeout, timing harness
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionPolicy {
    pub call_wrapper: CallWrapper,
    pub time_cmd: Option<String>,
}

impl ExecutionPolicy {
    pub fn wrap(
        &self,
        command: ShellCommand,
        processes: u32,
        threads: u32,
        timeout_minutes: u64,
    ) -> ShellCommand {
        let mut command = self.call_wrapper.wrap(command, processes, threads);
        if timeout_minutes > 0 {
            command = command.wrapped_in(
                ShellCommand::new("timeout")
                    .arg("-v")
                    .arg(format!("{timeout_minutes}m")),
            );
        }
        if let Some(time_cmd) = &self.time_cmd {
            command = command.wrapped_in(ShellCommand::from_raw(time_cmd.as_str()).arg("-v"));
        }
        command
    }
}
