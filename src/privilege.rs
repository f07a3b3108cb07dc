//! Root privilege check.

use crate::InstallError;
use sudo::RunningAs;

/// Fail unless the process runs with an effective uid of 0.
///
/// Both a root login and a setuid-root binary pass; a regular user does
/// not. Call once before anything touches the host.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::require_root;
/// use sudo::RunningAs;
///
/// assert!(require_root(RunningAs::Root).is_ok());
/// assert!(require_root(RunningAs::User).is_err());
/// ```
pub fn require_root(running_as: RunningAs) -> Result<(), InstallError> {
    match running_as {
        RunningAs::Root | RunningAs::Suid => Ok(()),
        RunningAs::User => Err(InstallError::Privilege {
            fix: "Re-run with sudo: sudo steam-bootstrap".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_passes() {
        assert!(require_root(RunningAs::Root).is_ok());
        assert!(require_root(RunningAs::Suid).is_ok());
    }

    #[test]
    fn test_user_rejected() {
        let err = require_root(RunningAs::User).unwrap_err();
        assert!(matches!(err, InstallError::Privilege { .. }));
        assert!(err.fix_suggestion().contains("sudo"));
    }
}
