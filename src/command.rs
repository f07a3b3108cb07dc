//! Typed command invocation.
//!
//! Every external program the installer touches is described by a
//! [`CommandSpec`] (argument vector, environment, working directory and a
//! success predicate) and executed through a [`CommandRunner`]. Nothing is
//! ever concatenated into a shell string.

use crate::detection::find_executable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// How a command's exit status is judged.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::{CommandStatus, SuccessPredicate};
///
/// // pkill exits with 1 when nothing matched
/// let pkill = SuccessPredicate::ExitCodes(vec![0, 1]);
/// assert!(pkill.accepts(CommandStatus::exited(1)));
/// assert!(!SuccessPredicate::ZeroExit.accepts(CommandStatus::exited(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuccessPredicate {
    /// Only exit code 0 counts as success.
    #[default]
    ZeroExit,

    /// Any of the listed exit codes counts as success.
    ExitCodes(Vec<i32>),
}

impl SuccessPredicate {
    /// Whether `status` satisfies this predicate.
    ///
    /// A process killed by a signal (no exit code) never does.
    pub fn accepts(&self, status: CommandStatus) -> bool {
        match (self, status.code) {
            (_, None) => false,
            (Self::ZeroExit, Some(code)) => code == 0,
            (Self::ExitCodes(codes), Some(code)) => codes.contains(&code),
        }
    }
}

/// A structured command for programmatic execution.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::CommandSpec;
///
/// let cmd = CommandSpec::new("apt-get")
///     .args(["install", "-y", "steam"])
///     .env("DEBIAN_FRONTEND", "noninteractive");
/// assert_eq!(cmd.to_string(), "apt-get install -y steam");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// The program to execute (e.g., "apt-get", "dnf", "pacman").
    pub program: String,

    /// Arguments to pass to the program.
    pub args: Vec<String>,

    /// Environment variables to set before execution (key, value pairs).
    pub env_vars: Vec<(String, String)>,

    /// Working directory, if different from the current one.
    pub working_dir: Option<PathBuf>,

    /// Which exit statuses count as success.
    pub success: SuccessPredicate,
}

impl CommandSpec {
    /// Start a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env_vars: Vec::new(),
            working_dir: None,
            success: SuccessPredicate::ZeroExit,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for this command only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Run the command from `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace the success predicate.
    pub fn succeeds_with(mut self, success: SuccessPredicate) -> Self {
        self.success = success;
        self
    }

    /// Whether `status` counts as success for this command.
    pub fn accepts(&self, status: CommandStatus) -> bool {
        self.success.accepts(status)
    }

    fn to_tokio(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.env_vars.iter().cloned())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    /// A status for a process that exited with `code`.
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Exit status plus captured standard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// How the command finished.
    pub status: CommandStatus,

    /// Captured stdout, lossily decoded.
    pub stdout: String,
}

/// Executes [`CommandSpec`]s and resolves programs on PATH.
///
/// [`SystemRunner`] is the real implementation; tests provide scripted
/// runners so recipes can be exercised without touching the host.
pub trait CommandRunner {
    /// Run to completion with inherited stdout/stderr.
    fn status(&self, command: &CommandSpec)
        -> impl Future<Output = io::Result<CommandStatus>> + Send;

    /// Run to completion capturing stdout.
    fn output(&self, command: &CommandSpec)
        -> impl Future<Output = io::Result<CommandOutput>> + Send;

    /// Resolve `program` to an executable path, if present.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Runner backed by real processes.
///
/// Programs are resolved on PATH first, then in a few well-known system
/// directories such as `/usr/games`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    async fn status(&self, command: &CommandSpec) -> io::Result<CommandStatus> {
        tracing::debug!(command = %command, "running");
        let status = command
            .to_tokio()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        tracing::debug!(command = %command, code = ?status.code(), "finished");
        Ok(status.into())
    }

    async fn output(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        tracing::debug!(command = %command, "capturing");
        let output = command
            .to_tokio()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await?;
        Ok(CommandOutput {
            status: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        find_executable(program)
    }
}
