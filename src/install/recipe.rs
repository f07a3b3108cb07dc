//! Type definitions for installation recipes.
//!
//! A [`Recipe`] is the ordered list of [`RecipeStep`]s for one
//! distribution family. Recipes are plain data: they are built by the
//! catalog, executed by the installer and can be serialized for display.

use crate::CommandSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a step's failure affects the run.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::Severity;
///
/// assert!(Severity::Critical.is_critical());
/// assert!(!Severity::Recommended.is_critical());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Failure aborts the whole run.
    Critical,

    /// Failure is reported as a warning and the run continues.
    Recommended,
}

impl Severity {
    /// Whether failure of a step with this severity is fatal.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// What a step does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// Check that a program is resolvable. Nothing is run.
    RequireProgram(String),

    /// Install `program` with `install` unless it is already resolvable.
    EnsureProgram {
        /// Program looked up first.
        program: String,
        /// Retried install command used when it is missing.
        install: CommandSpec,
    },

    /// Run a command exactly once.
    Once(CommandSpec),

    /// Run a command through the retry executor.
    Retry(CommandSpec),

    /// Run `install` once; if it fails, run `repair` with retries and then
    /// `install` exactly once more.
    RepairingInstall {
        /// Direct install command.
        install: CommandSpec,
        /// Dependency repair command.
        repair: CommandSpec,
    },

    /// Enable the `[multilib]` repository in the given pacman configuration.
    EnableMultilib {
        /// pacman configuration file.
        config: PathBuf,
    },
}

impl StepAction {
    /// Commands this action may run, in order.
    pub fn commands(&self) -> Vec<&CommandSpec> {
        match self {
            Self::RequireProgram(_) | Self::EnableMultilib { .. } => Vec::new(),
            Self::EnsureProgram { install, .. } => vec![install],
            Self::Once(command) | Self::Retry(command) => vec![command],
            Self::RepairingInstall { install, repair } => vec![install, repair],
        }
    }
}

/// One unit of work in a [`Recipe`].
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::{CommandSpec, Recipe, RecipeStep, StepAction};
///
/// let step = RecipeStep::critical(
///     "Refresh package index",
///     StepAction::Retry(CommandSpec::new("pacman").args(["-Sy", "--noconfirm"])),
/// );
/// let recipe = Recipe::new("Arch Linux").step(step);
/// assert_eq!(recipe.steps.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeStep {
    /// Human-readable label used in progress and error messages.
    pub label: String,

    /// What the step does.
    pub action: StepAction,

    /// Whether failure is fatal.
    pub severity: Severity,

    /// Recipe run when the step fails. Its success recovers the step.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fallback: Option<Recipe>,
}

impl RecipeStep {
    /// A step whose failure aborts the run.
    pub fn critical(label: impl Into<String>, action: StepAction) -> Self {
        Self {
            label: label.into(),
            action,
            severity: Severity::Critical,
            fallback: None,
        }
    }

    /// A step whose failure only warns.
    pub fn recommended(label: impl Into<String>, action: StepAction) -> Self {
        Self {
            label: label.into(),
            action,
            severity: Severity::Recommended,
            fallback: None,
        }
    }

    /// Attach a fallback recipe.
    pub fn with_fallback(mut self, fallback: Recipe) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// An ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name (e.g. "Debian/Ubuntu").
    pub name: String,

    /// Steps in execution order.
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// An empty recipe.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn step(mut self, step: RecipeStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Find a step by label.
    pub fn find(&self, label: &str) -> Option<&RecipeStep> {
        self.steps.iter().find(|s| s.label == label)
    }
}
