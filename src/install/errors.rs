//! Error types for provisioning operations.
//!
//! This module defines the error types that can occur while installing the
//! target application. Each error variant includes an actionable fix
//! suggestion naming the manual remedy.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during provisioning.
///
/// Every variant except [`InstallError::RecommendedStepExhausted`] is
/// fatal: it ends the run with a non-zero exit status and nothing that was
/// already applied is rolled back.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::InstallError;
///
/// fn handle_error(error: InstallError) {
///     eprintln!("Provisioning failed: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstallError {
    /// The process is not running as root.
    #[error("Root privileges required")]
    Privilege {
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// No recipe exists for the detected distribution.
    #[error("Unsupported distribution: {id}")]
    UnsupportedEnvironment {
        /// The normalized distribution identity.
        id: String,
        /// Why the environment cannot be handled.
        reason: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// The family's package manager is not installed.
    #[error("Package manager not found: {program}")]
    PackageManagerMissing {
        /// The program that was looked up (e.g. "apt-get").
        program: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A helper program is still not on PATH after its install succeeded.
    #[error("{program} not found after installing it")]
    ProgramMissing {
        /// The program that was looked up (e.g. "wget").
        program: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A critical step failed after its whole retry budget.
    #[error("{step} failed after {attempts} attempt(s)")]
    CriticalStepExhausted {
        /// Label of the failed step.
        step: String,
        /// How many times it was attempted.
        attempts: u32,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A configuration file edit could not be applied or verified.
    #[error("Could not update {}: {message}", path.display())]
    ConfigurationEditVerification {
        /// The configuration file.
        path: PathBuf,
        /// What went wrong.
        message: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// Every step succeeded but the executable is not reachable.
    #[error("Verification failed: {executable} not found after installation")]
    VerificationFailed {
        /// The executable that was looked up.
        executable: String,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },

    /// A recommended step failed after its whole retry budget.
    ///
    /// Never returned as an `Err`; the run continues and the error is
    /// reported as a warning.
    #[error("{step} failed after {attempts} attempt(s); continuing")]
    RecommendedStepExhausted {
        /// Label of the failed step.
        step: String,
        /// How many times it was attempted.
        attempts: u32,
        /// Actionable suggestion for resolving the issue.
        fix: String,
    },
}

impl InstallError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use steam_bootstrap::InstallError;
    ///
    /// let error = InstallError::Privilege {
    ///     fix: "Re-run with sudo".to_string(),
    /// };
    /// assert!(error.fix_suggestion().contains("sudo"));
    /// ```
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::Privilege { fix } => fix,
            Self::UnsupportedEnvironment { fix, .. } => fix,
            Self::PackageManagerMissing { fix, .. } => fix,
            Self::ProgramMissing { fix, .. } => fix,
            Self::CriticalStepExhausted { fix, .. } => fix,
            Self::ConfigurationEditVerification { fix, .. } => fix,
            Self::VerificationFailed { fix, .. } => fix,
            Self::RecommendedStepExhausted { fix, .. } => fix,
        }
    }

    /// Whether this error terminates the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::RecommendedStepExhausted { .. })
    }
}
