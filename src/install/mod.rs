//! Steam installation for supported Linux distributions.
//!
//! This module selects an installation [`Recipe`] for the detected
//! distribution family and runs it step by step. Flaky package-manager and
//! network commands are retried, the apt repository install falls back to
//! a direct `.deb` download, and the result is verified at the end.
//!
//! # Example
//!
//! ```rust,no_run
//! use steam_bootstrap::{provision, InstallProgress, ProvisionOptions, SystemRunner};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let report = provision(
//!         &SystemRunner::new(),
//!         sudo::check(),
//!         &ProvisionOptions::default(),
//!         |progress| {
//!             if let InstallProgress::StepStarted { index, total, label } = &progress {
//!                 println!("[{}/{}] {}", index, total, label);
//!             }
//!         },
//!     )
//!     .await;
//!
//!     match report {
//!         Ok(report) => {
//!             for warning in &report.warnings {
//!                 println!("warning: {}", warning);
//!             }
//!         }
//!         Err(e) => eprintln!("{}\n  {}", e, e.fix_suggestion()),
//!     }
//! }
//! ```

mod catalog;
mod errors;
mod executor;
mod multilib;
mod prereq;
mod progress;
mod recipe;
mod retry;
mod verify;

pub use catalog::{
    arch_recipe, debian_recipe, recipe_for, rpm_recipe, rpmfusion_nonfree_url, STEAM_DEB_URL,
    TARGET_PACKAGE,
};
pub use errors::InstallError;
pub use executor::{plan, provision, ProvisionReport};
pub use multilib::{apply_multilib, enable_multilib, is_multilib_enabled, MultilibEdit};
pub use prereq::{is_installed, require_package_manager};
pub use progress::InstallProgress;
pub use recipe::{Recipe, RecipeStep, Severity, StepAction};
pub use retry::{RetryExecutor, RetryOutcome};
pub use verify::{verify_installation, STALE_PROCESSES};
