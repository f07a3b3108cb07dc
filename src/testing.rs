//! Scripted [`CommandRunner`] for unit tests.

use crate::{CommandOutput, CommandRunner, CommandSpec, CommandStatus};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Exit code reported for scripted failures.
pub(crate) const FAILURE_CODE: i32 = 100;

/// Records every command and answers from a script keyed by the rendered
/// command line. Unscripted commands succeed with empty output.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, u32>>,
    outputs: HashMap<String, String>,
    programs: HashSet<String>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make `locate(program)` succeed.
    pub(crate) fn with_program(mut self, program: &str) -> Self {
        self.programs.insert(program.to_string());
        self
    }

    /// Answer `output(line)` with `stdout`.
    pub(crate) fn with_output(mut self, line: &str, stdout: &str) -> Self {
        self.outputs.insert(line.to_string(), stdout.to_string());
        self
    }

    /// Fail `line` the next `times` invocations, then succeed.
    pub(crate) fn fail_times(self, line: &str, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(line.to_string(), times);
        self
    }

    /// Fail `line` on every invocation.
    pub(crate) fn always_fail(self, line: &str) -> Self {
        self.fail_times(line, u32::MAX)
    }

    /// Command lines run so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How often `line` was run.
    pub(crate) fn count(&self, line: &str) -> usize {
        self.calls().iter().filter(|c| *c == line).count()
    }

    fn next_status(&self, command: &CommandSpec) -> CommandStatus {
        let line = command.to_string();
        self.calls.lock().unwrap().push(line.clone());

        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&line) {
            Some(left) if *left > 0 => {
                if *left != u32::MAX {
                    *left -= 1;
                }
                CommandStatus::exited(FAILURE_CODE)
            }
            _ => CommandStatus::exited(0),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    async fn status(&self, command: &CommandSpec) -> io::Result<CommandStatus> {
        Ok(self.next_status(command))
    }

    async fn output(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        let status = self.next_status(command);
        let stdout = self
            .outputs
            .get(&command.to_string())
            .cloned()
            .unwrap_or_default();
        Ok(CommandOutput { status, stdout })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs
            .contains(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}
