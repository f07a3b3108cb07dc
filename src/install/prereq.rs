//! Program availability checks run before and during a recipe.

use crate::{CommandRunner, InstallError};
use std::path::PathBuf;

/// Check that the package manager a recipe drives is installed.
///
/// Returns its resolved path, or [`InstallError::PackageManagerMissing`]
/// with a remedy naming the package that provides it.
///
/// # Example
///
/// ```rust,no_run
/// use steam_bootstrap::{require_package_manager, SystemRunner};
///
/// match require_package_manager(&SystemRunner::new(), "pacman") {
///     Ok(path) => println!("pacman at {}", path.display()),
///     Err(e) => eprintln!("{} ({})", e, e.fix_suggestion()),
/// }
/// ```
pub fn require_package_manager<R: CommandRunner>(
    runner: &R,
    program: &str,
) -> Result<PathBuf, InstallError> {
    match runner.locate(program) {
        Some(path) => {
            tracing::debug!(program, path = %path.display(), "package manager found");
            Ok(path)
        }
        None => Err(InstallError::PackageManagerMissing {
            program: program.to_string(),
            fix: format!(
                "Install {} (package {}) or check that it is on PATH",
                program,
                providing_package(program)
            ),
        }),
    }
}

/// Whether `program` is already installed.
pub fn is_installed<R: CommandRunner>(runner: &R, program: &str) -> bool {
    let found = runner.locate(program);
    tracing::debug!(program, found = found.is_some(), "program lookup");
    found.is_some()
}

fn providing_package(program: &str) -> &str {
    match program {
        "apt-get" => "apt",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    #[test]
    fn test_package_manager_present() {
        let runner = ScriptedRunner::new().with_program("dnf");
        let path = require_package_manager(&runner, "dnf").unwrap();
        assert_eq!(path, PathBuf::from("/usr/bin/dnf"));
    }

    #[test]
    fn test_package_manager_missing() {
        let runner = ScriptedRunner::new();
        let err = require_package_manager(&runner, "apt-get").unwrap_err();
        match &err {
            InstallError::PackageManagerMissing { program, .. } => assert_eq!(program, "apt-get"),
            other => panic!("Unexpected error type: {:?}", other),
        }
        assert!(err.fix_suggestion().contains("package apt"));
    }

    #[test]
    fn test_is_installed() {
        let runner = ScriptedRunner::new().with_program("wget");
        assert!(is_installed(&runner, "wget"));
        assert!(!is_installed(&runner, "curl"));
    }
}
