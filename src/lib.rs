//! # steam-bootstrap
//!
//! Distribution-aware Steam installer for Linux hosts.
//!
//! This crate detects which package-management ecosystem a host uses
//! (apt, dnf or pacman), builds the matching installation recipe and runs
//! it with bounded retries, fallbacks and a final verification. It backs
//! the `steam-bootstrap` binary but can be driven directly.
//!
//! ## Features
//!
//! - `detect_distribution()` identifies the host from os-release,
//!   `lsb_release` or a release marker file
//! - `recipe_for()` maps a distribution to its `Recipe`
//! - `provision()` runs the whole installation with progress reporting
//! - `CommandRunner` abstracts process execution so recipes can be
//!   exercised without touching the host
//!
//! ## Example
//!
//! ```rust,no_run
//! use steam_bootstrap::{detect_distribution, HostPaths, SystemRunner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let distro = detect_distribution(&SystemRunner::new(), &HostPaths::default()).await;
//!     if distro.family.is_supported() {
//!         println!("{} is supported ({})", distro.id, distro.family.display_name());
//!     }
//! }
//! ```

mod command;
mod detect;
mod detection;
mod distro;
mod options;
mod privilege;

pub mod install;
pub mod telemetry;
pub mod ui;

#[cfg(test)]
mod testing;

pub use command::{
    CommandOutput, CommandRunner, CommandSpec, CommandStatus, SuccessPredicate, SystemRunner,
};
pub use detect::{detect_distribution, release_major};
pub use distro::{Distribution, DistroFamily, UNKNOWN_ID};
pub use options::{HostPaths, ProvisionOptions, RetryPolicy};
pub use privilege::require_root;

// Re-export install types at crate root for convenience
pub use install::{
    apply_multilib, enable_multilib, is_multilib_enabled, plan, provision, recipe_for,
    require_package_manager, InstallError, InstallProgress, MultilibEdit, ProvisionReport, Recipe,
    RecipeStep, RetryExecutor, RetryOutcome, Severity, StepAction,
};
