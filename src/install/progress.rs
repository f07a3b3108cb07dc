//! Progress reporting types for provisioning.
//!
//! The [`InstallProgress`] enum represents the discrete events of a run.
//! The installer reports them through a callback; the binary renders them
//! as colored status lines.

use crate::DistroFamily;
use std::time::Duration;

/// Progress events during provisioning.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::InstallProgress;
///
/// fn on_progress(progress: InstallProgress) {
///     match &progress {
///         InstallProgress::StepStarted { index, total, label } => {
///             println!("[{}/{}] {}", index, total, label);
///         }
///         InstallProgress::Retrying { command, attempt, max_attempts, .. } => {
///             println!("{} failed (attempt {}/{})", command, attempt, max_attempts);
///         }
///         other => println!("{}", other.description()),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallProgress {
    /// A recipe was selected for the detected distribution.
    Started {
        /// Normalized distribution identity.
        distro: String,
        /// Its family.
        family: DistroFamily,
    },

    /// A recipe step is about to run.
    StepStarted {
        /// 1-based position in the running recipe.
        index: usize,
        /// Number of steps in the running recipe.
        total: usize,
        /// Step label.
        label: String,
    },

    /// A retried command failed and will be attempted again.
    Retrying {
        /// Rendered command line.
        command: String,
        /// The attempt that just failed (1-based).
        attempt: u32,
        /// Total attempts allowed.
        max_attempts: u32,
        /// Wait before the next attempt.
        delay: Duration,
    },

    /// A step completed.
    StepSucceeded {
        /// Step label.
        label: String,
    },

    /// A step found the system already in the desired state.
    StepUnchanged {
        /// Step label.
        label: String,
        /// Why nothing was done.
        reason: String,
    },

    /// A recommended step failed; the run continues.
    StepWarning {
        /// Step label.
        label: String,
        /// What went wrong.
        message: String,
    },

    /// A step failed and its fallback recipe is starting.
    FallbackStarted {
        /// Label of the failed step.
        label: String,
        /// Name of the fallback recipe.
        fallback: String,
    },

    /// Stopping stale processes and checking the executable.
    Verifying,

    /// Provisioning completed successfully.
    Completed,
}

impl InstallProgress {
    /// Get a human-readable description of the current progress event.
    ///
    /// # Example
    ///
    /// ```rust
    /// use steam_bootstrap::InstallProgress;
    ///
    /// assert_eq!(InstallProgress::Verifying.description(), "Verifying installation");
    /// ```
    pub fn description(&self) -> &'static str {
        match self {
            Self::Started { .. } => "Starting installation",
            Self::StepStarted { .. } => "Running step",
            Self::Retrying { .. } => "Retrying",
            Self::StepSucceeded { .. } => "Step complete",
            Self::StepUnchanged { .. } => "Already configured",
            Self::StepWarning { .. } => "Step failed (non-fatal)",
            Self::FallbackStarted { .. } => "Running fallback",
            Self::Verifying => "Verifying installation",
            Self::Completed => "Installation complete",
        }
    }

    /// Check if this event indicates completion.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
