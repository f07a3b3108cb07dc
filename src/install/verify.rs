//! Post-install verification.
//!
//! Stale Steam processes are stopped so the next launch picks up the new
//! installation, then the `steam` executable must be resolvable.

use super::catalog::TARGET_PACKAGE;
use crate::{CommandRunner, CommandSpec, InstallError, SuccessPredicate};
use std::path::PathBuf;

/// Processes stopped before verification.
pub const STALE_PROCESSES: &[&str] = &["steam", "steamwebhelper"];

/// Stop stale processes and locate the installed executable.
///
/// Stopping is best-effort: `pkill` exiting 1 (nothing matched) is
/// success, and any other failure is only logged.
pub async fn verify_installation<R: CommandRunner>(runner: &R) -> Result<PathBuf, InstallError> {
    stop_stale_processes(runner).await;

    match runner.locate(TARGET_PACKAGE) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "executable found");
            Ok(path)
        }
        None => Err(InstallError::VerificationFailed {
            executable: TARGET_PACKAGE.to_string(),
            fix: "Every step reported success but steam is not on PATH. Check /usr/games and /usr/bin, or reinstall the steam package".to_string(),
        }),
    }
}

async fn stop_stale_processes<R: CommandRunner>(runner: &R) {
    for &process in STALE_PROCESSES {
        let command = CommandSpec::new("pkill")
            .args(["-x", process])
            .succeeds_with(SuccessPredicate::ExitCodes(vec![0, 1]));

        match runner.status(&command).await {
            Ok(status) if command.accepts(status) => {}
            Ok(status) => {
                tracing::debug!(process, code = ?status.code, "pkill failed; ignoring");
            }
            Err(e) => {
                tracing::debug!(process, error = %e, "pkill could not run; ignoring");
            }
        }
    }
}
