//! Bounded retry of external commands.

use crate::install::InstallProgress;
use crate::{CommandRunner, CommandSpec, RetryPolicy};
use tokio::time::sleep;

/// Result of running a command under a [`RetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// The command succeeded on attempt `attempts`.
    Succeeded {
        /// Attempts used, including the successful one.
        attempts: u32,
    },

    /// Every attempt failed.
    Exhausted {
        /// Attempts used (the policy's maximum).
        attempts: u32,
    },
}

impl RetryOutcome {
    /// Whether the command eventually succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Attempts used.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts } | Self::Exhausted { attempts } => *attempts,
        }
    }
}

/// Runs commands up to the policy's attempt budget.
///
/// The executor only looks at exit statuses. Whether an exhausted command
/// is fatal is for the caller to decide.
pub struct RetryExecutor<'a, R> {
    runner: &'a R,
    policy: RetryPolicy,
    on_progress: &'a (dyn Fn(InstallProgress) + Sync),
}

impl<'a, R: CommandRunner> RetryExecutor<'a, R> {
    /// Create an executor reporting retries to `on_progress`.
    pub fn new(
        runner: &'a R,
        policy: RetryPolicy,
        on_progress: &'a (dyn Fn(InstallProgress) + Sync),
    ) -> Self {
        Self {
            runner,
            policy,
            on_progress,
        }
    }

    /// The policy this executor applies.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run `command` until it succeeds or the budget is spent.
    ///
    /// A command that cannot even be started counts as a failed attempt.
    /// The delay is only applied between attempts, never after the last.
    pub async fn run(&self, command: &CommandSpec) -> RetryOutcome {
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            let succeeded = match self.runner.status(command).await {
                Ok(status) => {
                    tracing::debug!(command = %command, attempt, code = ?status.code, "attempt finished");
                    command.accepts(status)
                }
                Err(e) => {
                    tracing::debug!(command = %command, attempt, error = %e, "failed to start");
                    false
                }
            };

            if succeeded {
                return RetryOutcome::Succeeded { attempts: attempt };
            }

            if attempt < max_attempts {
                (self.on_progress)(InstallProgress::Retrying {
                    command: command.to_string(),
                    attempt,
                    max_attempts,
                    delay: self.policy.delay(),
                });
                sleep(self.policy.delay()).await;
            }
        }

        tracing::warn!(command = %command, attempts = max_attempts, "retry budget exhausted");
        RetryOutcome::Exhausted {
            attempts: max_attempts,
        }
    }
}
