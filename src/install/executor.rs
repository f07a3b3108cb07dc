//! Recipe execution.
//!
//! This module provides [`provision`], which runs the whole installation
//! (privilege check, detection, recipe execution and verification), and
//! [`plan`], which stops after choosing the recipe.

use super::catalog::recipe_for;
use super::multilib::apply_multilib;
use super::prereq::{is_installed, require_package_manager};
use super::recipe::{Recipe, RecipeStep, StepAction};
use super::retry::{RetryExecutor, RetryOutcome};
use super::verify::verify_installation;
use crate::install::{InstallError, InstallProgress};
use crate::{
    detect_distribution, release_major, require_root, CommandRunner, CommandSpec, Distribution,
    ProvisionOptions,
};
use std::path::PathBuf;
use sudo::RunningAs;

/// Summary of a successful run.
#[derive(Debug)]
pub struct ProvisionReport {
    /// The detected distribution.
    pub distribution: Distribution,

    /// Recommended steps that failed. Never fatal.
    pub warnings: Vec<InstallError>,

    /// Whether a fallback recipe had to run.
    pub fallback_used: bool,

    /// Where the installed executable was found.
    pub executable: PathBuf,
}

/// Detect the host and choose its recipe without running anything that
/// changes the system.
///
/// # Example
///
/// ```rust,no_run
/// use steam_bootstrap::{plan, ProvisionOptions, SystemRunner};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     match plan(&SystemRunner::new(), &ProvisionOptions::default()).await {
///         Ok((distro, recipe)) => {
///             println!("{}: {} steps", distro.id, recipe.steps.len());
///         }
///         Err(e) => eprintln!("{}", e),
///     }
/// }
/// ```
pub async fn plan<R: CommandRunner>(
    runner: &R,
    options: &ProvisionOptions,
) -> Result<(Distribution, Recipe), InstallError> {
    let distribution = detect_distribution(runner, &options.paths).await;
    let major = release_major(runner, &distribution).await;
    tracing::debug!(id = %distribution.id, family = ?distribution.family, ?major, "planning");

    let recipe = recipe_for(&distribution, major, &options.paths)?;
    Ok((distribution, recipe))
}

/// Install Steam on this host.
///
/// This function:
/// 1. Rejects non-root callers before anything else runs
/// 2. Detects the distribution and selects its recipe
/// 3. Runs every step, retrying flaky ones and running fallbacks
/// 4. Stops stale Steam processes and checks `steam` is on PATH
///
/// Critical failures end the run with an error; already applied changes
/// are left in place. Failed recommended steps are collected in
/// [`ProvisionReport::warnings`].
///
/// # Example
///
/// ```rust,no_run
/// use steam_bootstrap::{provision, ProvisionOptions, SystemRunner};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let result = provision(
///         &SystemRunner::new(),
///         sudo::check(),
///         &ProvisionOptions::default(),
///         |progress| println!("{}", progress.description()),
///     )
///     .await;
///
///     match result {
///         Ok(report) => println!("Installed at {}", report.executable.display()),
///         Err(e) => println!("Failed: {}. Fix: {}", e, e.fix_suggestion()),
///     }
/// }
/// ```
pub async fn provision<R, F>(
    runner: &R,
    running_as: RunningAs,
    options: &ProvisionOptions,
    on_progress: F,
) -> Result<ProvisionReport, InstallError>
where
    R: CommandRunner,
    F: Fn(InstallProgress) + Sync,
{
    require_root(running_as)?;

    let (distribution, recipe) = plan(runner, options).await?;
    on_progress(InstallProgress::Started {
        distro: distribution.id.clone(),
        family: distribution.family,
    });

    let mut installer = Installer::new(runner, options, &on_progress);
    installer.run_recipe(&recipe).await?;

    on_progress(InstallProgress::Verifying);
    let executable = verify_installation(runner).await?;

    on_progress(InstallProgress::Completed);
    Ok(ProvisionReport {
        distribution,
        warnings: installer.warnings,
        fallback_used: installer.fallback_used,
        executable,
    })
}

/// How a single action ended, before severity is applied.
#[derive(Debug)]
enum ActionOutcome {
    Done,
    Unchanged(String),
    Exhausted { attempts: u32 },
}

struct Installer<'a, R> {
    runner: &'a R,
    retry: RetryExecutor<'a, R>,
    on_progress: &'a (dyn Fn(InstallProgress) + Sync),
    warnings: Vec<InstallError>,
    fallback_used: bool,
}

impl<'a, R: CommandRunner> Installer<'a, R> {
    fn new(
        runner: &'a R,
        options: &ProvisionOptions,
        on_progress: &'a (dyn Fn(InstallProgress) + Sync),
    ) -> Self {
        Self {
            runner,
            retry: RetryExecutor::new(runner, options.retry, on_progress),
            on_progress,
            warnings: Vec::new(),
            fallback_used: false,
        }
    }

    async fn run_recipe(&mut self, recipe: &Recipe) -> Result<(), InstallError> {
        tracing::info!(recipe = %recipe.name, steps = recipe.steps.len(), "running recipe");
        let total = recipe.steps.len();

        for (i, step) in recipe.steps.iter().enumerate() {
            (self.on_progress)(InstallProgress::StepStarted {
                index: i + 1,
                total,
                label: step.label.clone(),
            });
            self.run_step(step).await?;
        }
        Ok(())
    }

    async fn run_step(&mut self, step: &RecipeStep) -> Result<(), InstallError> {
        let attempts = match self.run_action(&step.action).await? {
            ActionOutcome::Done => {
                (self.on_progress)(InstallProgress::StepSucceeded {
                    label: step.label.clone(),
                });
                return Ok(());
            }
            ActionOutcome::Unchanged(reason) => {
                (self.on_progress)(InstallProgress::StepUnchanged {
                    label: step.label.clone(),
                    reason,
                });
                return Ok(());
            }
            ActionOutcome::Exhausted { attempts } => attempts,
        };

        if let Some(fallback) = &step.fallback {
            tracing::info!(step = %step.label, fallback = %fallback.name, "step failed; running fallback");
            (self.on_progress)(InstallProgress::FallbackStarted {
                label: step.label.clone(),
                fallback: fallback.name.clone(),
            });
            self.fallback_used = true;
            Box::pin(self.run_recipe(fallback)).await?;
            (self.on_progress)(InstallProgress::StepSucceeded {
                label: step.label.clone(),
            });
            return Ok(());
        }

        let fix = remedy(step);
        if step.severity.is_critical() {
            return Err(InstallError::CriticalStepExhausted {
                step: step.label.clone(),
                attempts,
                fix,
            });
        }

        let warning = InstallError::RecommendedStepExhausted {
            step: step.label.clone(),
            attempts,
            fix,
        };
        tracing::warn!(step = %step.label, attempts, "recommended step failed");
        (self.on_progress)(InstallProgress::StepWarning {
            label: step.label.clone(),
            message: warning.to_string(),
        });
        self.warnings.push(warning);
        Ok(())
    }

    async fn run_action(&self, action: &StepAction) -> Result<ActionOutcome, InstallError> {
        let outcome = match action {
            StepAction::RequireProgram(program) => {
                require_package_manager(self.runner, program)?;
                ActionOutcome::Done
            }
            StepAction::EnsureProgram { program, install } => {
                if is_installed(self.runner, program) {
                    return Ok(ActionOutcome::Unchanged(format!(
                        "{} is already installed",
                        program
                    )));
                }
                match self.retry.run(install).await {
                    RetryOutcome::Exhausted { attempts } => ActionOutcome::Exhausted { attempts },
                    RetryOutcome::Succeeded { .. } if !is_installed(self.runner, program) => {
                        tracing::warn!(%program, command = %install, "installed program not on PATH");
                        return Err(InstallError::ProgramMissing {
                            program: program.clone(),
                            fix: format!(
                                "`{}` succeeded but {} is not on PATH; install it manually and re-run",
                                install, program
                            ),
                        });
                    }
                    RetryOutcome::Succeeded { .. } => ActionOutcome::Done,
                }
            }
            StepAction::Once(command) => {
                if self.run_once(command).await {
                    ActionOutcome::Done
                } else {
                    ActionOutcome::Exhausted { attempts: 1 }
                }
            }
            StepAction::Retry(command) => self.retry.run(command).await.into(),
            StepAction::RepairingInstall { install, repair } => {
                if self.run_once(install).await {
                    return Ok(ActionOutcome::Done);
                }
                tracing::info!(command = %install, repair = %repair, "install failed; repairing");
                if let RetryOutcome::Exhausted { attempts } = self.retry.run(repair).await {
                    return Ok(ActionOutcome::Exhausted { attempts });
                }
                if self.run_once(install).await {
                    ActionOutcome::Done
                } else {
                    ActionOutcome::Exhausted { attempts: 2 }
                }
            }
            StepAction::EnableMultilib { config } => {
                if apply_multilib(config).await? {
                    ActionOutcome::Done
                } else {
                    ActionOutcome::Unchanged("multilib is already enabled".to_string())
                }
            }
        };
        Ok(outcome)
    }

    async fn run_once(&self, command: &CommandSpec) -> bool {
        match self.runner.status(command).await {
            Ok(status) => command.accepts(status),
            Err(e) => {
                tracing::debug!(command = %command, error = %e, "failed to start");
                false
            }
        }
    }
}

impl From<RetryOutcome> for ActionOutcome {
    fn from(outcome: RetryOutcome) -> Self {
        match outcome {
            RetryOutcome::Succeeded { .. } => Self::Done,
            RetryOutcome::Exhausted { attempts } => Self::Exhausted { attempts },
        }
    }
}

/// Manual remedy for a failed step: run its first command by hand.
fn remedy(step: &RecipeStep) -> String {
    match step.action.commands().first() {
        Some(command) => format!(
            "Run `{}` as root to see the error, fix it, then re-run steam-bootstrap",
            command
        ),
        None => "Re-run steam-bootstrap with -vv for details".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::Severity;
    use crate::testing::ScriptedRunner;
    use crate::{HostPaths, RetryPolicy};
    use std::fs;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    fn options_in(dir: &TempDir) -> ProvisionOptions {
        ProvisionOptions {
            retry: RetryPolicy::new(3, Duration::from_secs(5)),
            paths: HostPaths {
                os_release: dir.path().join("os-release"),
                release_marker: dir.path().join("redhat-release"),
                pacman_conf: dir.path().join("pacman.conf"),
                download_dir: dir.path().to_path_buf(),
            },
        }
    }

    fn no_progress(_: InstallProgress) {}

    #[tokio::test(start_paused = true)]
    async fn test_fallback_recovers_step() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new().always_fail("install");
        let recipe = Recipe::new("Test").step(
            RecipeStep::critical("Install", StepAction::Retry(CommandSpec::new("install")))
                .with_fallback(Recipe::new("Fallback").step(RecipeStep::critical(
                    "Alternative",
                    StepAction::Retry(CommandSpec::new("alternative")),
                ))),
        );

        let mut installer = Installer::new(&runner, &options, &no_progress);
        installer.run_recipe(&recipe).await.unwrap();

        assert!(installer.fallback_used);
        assert_eq!(runner.count("install"), 3);
        assert_eq!(runner.count("alternative"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_critical_failure_stops_recipe() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new().always_fail("first");
        let recipe = Recipe::new("Test")
            .step(RecipeStep::critical(
                "First",
                StepAction::Retry(CommandSpec::new("first")),
            ))
            .step(RecipeStep::critical(
                "Second",
                StepAction::Retry(CommandSpec::new("second")),
            ));

        let mut installer = Installer::new(&runner, &options, &no_progress);
        let err = installer.run_recipe(&recipe).await.unwrap_err();

        assert!(matches!(
            err,
            InstallError::CriticalStepExhausted { ref step, attempts: 3, .. } if step == "First"
        ));
        assert!(err.fix_suggestion().contains("`first`"));
        assert_eq!(runner.count("second"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recommended_failure_warns() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new().always_fail("extras");
        let events = Mutex::new(Vec::new());
        let record = |p: InstallProgress| events.lock().unwrap().push(p);
        let recipe = Recipe::new("Test")
            .step(RecipeStep::recommended(
                "Extras",
                StepAction::Retry(CommandSpec::new("extras")),
            ))
            .step(RecipeStep::critical(
                "Next",
                StepAction::Retry(CommandSpec::new("next")),
            ));

        let mut installer = Installer::new(&runner, &options, &record);
        installer.run_recipe(&recipe).await.unwrap();

        assert_eq!(installer.warnings.len(), 1);
        assert!(!installer.warnings[0].is_fatal());
        assert_eq!(runner.count("next"), 1);
        drop(installer);
        assert!(events
            .into_inner()
            .unwrap()
            .iter()
            .any(|e| matches!(e, InstallProgress::StepWarning { label, .. } if label == "Extras")));
    }

    #[tokio::test]
    async fn test_once_is_not_retried() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new().always_fail("dpkg --add-architecture i386");
        let step = RecipeStep::critical(
            "Enable i386 architecture",
            StepAction::Once(CommandSpec::new("dpkg").args(["--add-architecture", "i386"])),
        );

        let mut installer = Installer::new(&runner, &options, &no_progress);
        let err = installer.run_step(&step).await.unwrap_err();

        assert!(matches!(err, InstallError::CriticalStepExhausted { attempts: 1, .. }));
        assert_eq!(runner.count("dpkg --add-architecture i386"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repairing_install() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new().fail_times("dpkg -i steam.deb", 1);
        let step = RecipeStep::critical(
            "Install downloaded package",
            StepAction::RepairingInstall {
                install: CommandSpec::new("dpkg").args(["-i", "steam.deb"]),
                repair: CommandSpec::new("apt-get").args(["install", "-f", "-y"]),
            },
        );

        let mut installer = Installer::new(&runner, &options, &no_progress);
        installer.run_step(&step).await.unwrap();

        assert_eq!(
            runner.calls(),
            vec!["dpkg -i steam.deb", "apt-get install -f -y", "dpkg -i steam.deb"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_repairing_install_second_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new().always_fail("dpkg -i steam.deb");
        let step = RecipeStep::critical(
            "Install downloaded package",
            StepAction::RepairingInstall {
                install: CommandSpec::new("dpkg").args(["-i", "steam.deb"]),
                repair: CommandSpec::new("apt-get").args(["install", "-f", "-y"]),
            },
        );

        let mut installer = Installer::new(&runner, &options, &no_progress);
        let err = installer.run_step(&step).await.unwrap_err();

        assert!(matches!(err, InstallError::CriticalStepExhausted { .. }));
        assert_eq!(runner.count("dpkg -i steam.deb"), 2);
    }

    #[tokio::test]
    async fn test_ensure_program_present_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new().with_program("wget");
        let step = RecipeStep::critical(
            "Ensure wget is installed",
            StepAction::EnsureProgram {
                program: "wget".to_string(),
                install: CommandSpec::new("apt-get").args(["install", "-y", "wget"]),
            },
        );

        let mut installer = Installer::new(&runner, &options, &no_progress);
        installer.run_step(&step).await.unwrap();
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_program_still_absent_after_install_is_fatal() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        // The install exits 0 but wget never shows up on PATH
        let runner = ScriptedRunner::new();
        let step = RecipeStep::critical(
            "Ensure wget is installed",
            StepAction::EnsureProgram {
                program: "wget".to_string(),
                install: CommandSpec::new("apt-get").args(["install", "-y", "wget"]),
            },
        );

        let mut installer = Installer::new(&runner, &options, &no_progress);
        let err = installer.run_step(&step).await.unwrap_err();

        match err {
            InstallError::ProgramMissing { program, fix } => {
                assert_eq!(program, "wget");
                assert!(fix.contains("apt-get install -y wget"));
            }
            other => panic!("expected ProgramMissing, got {:?}", other),
        }
        assert_eq!(runner.count("apt-get install -y wget"), 1);
    }

    #[tokio::test]
    async fn test_missing_package_manager_is_fatal_even_if_recommended() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        let runner = ScriptedRunner::new();
        let step = RecipeStep {
            label: "Check package manager".to_string(),
            action: StepAction::RequireProgram("pacman".to_string()),
            severity: Severity::Recommended,
            fallback: None,
        };

        let mut installer = Installer::new(&runner, &options, &no_progress);
        let err = installer.run_step(&step).await.unwrap_err();
        assert!(matches!(err, InstallError::PackageManagerMissing { .. }));
    }

    #[tokio::test]
    async fn test_enable_multilib_step() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        fs::write(
            &options.paths.pacman_conf,
            "#[multilib]\n#Include = /etc/pacman.d/mirrorlist\n",
        )
        .unwrap();
        let runner = ScriptedRunner::new();
        let step = RecipeStep::critical(
            "Enable multilib repository",
            StepAction::EnableMultilib {
                config: options.paths.pacman_conf.clone(),
            },
        );

        let mut installer = Installer::new(&runner, &options, &no_progress);
        installer.run_step(&step).await.unwrap();
        assert!(crate::is_multilib_enabled(
            &fs::read_to_string(&options.paths.pacman_conf).unwrap()
        ));
    }

    #[tokio::test]
    async fn test_provision_rejects_user_first() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        fs::write(&options.paths.os_release, "ID=ubuntu\n").unwrap();
        let runner = ScriptedRunner::new().with_program("lsb_release");

        let err = provision(&runner, RunningAs::User, &options, no_progress)
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::Privilege { .. }));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_plan_rpm_uses_version() {
        let dir = TempDir::new().unwrap();
        let options = options_in(&dir);
        fs::write(&options.paths.os_release, "ID=fedora\nVERSION_ID=40\n").unwrap();
        let runner = ScriptedRunner::new();

        let (distro, recipe) = plan(&runner, &options).await.unwrap();
        assert_eq!(distro.id, "fedora");
        let add_repo = recipe.find("Add RPM Fusion nonfree repository").unwrap();
        assert!(add_repo.action.commands()[0]
            .to_string()
            .contains("rpmfusion-nonfree-release-40"));
        assert!(runner.calls().is_empty());
    }
}
