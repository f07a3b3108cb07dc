//! PATH-based executable lookup with fallback locations.

use std::path::PathBuf;

/// System fallback paths to check if executable not found in PATH.
///
/// Debian installs the Steam launcher into `/usr/games`, which is not on
/// root's PATH by default.
const FALLBACK_PATHS: &[&str] = &["/usr/games", "/usr/local/bin", "/usr/bin", "/usr/sbin"];

/// Find an executable by name.
///
/// This function first tries to find the executable using the system PATH
/// via the `which` crate. If not found, it checks common fallback locations.
///
/// # Arguments
///
/// * `name` - The executable name to search for (e.g., "apt-get", "steam")
///
/// # Returns
///
/// `Some(PathBuf)` if the executable is found, `None` otherwise.
pub(crate) fn find_executable(name: &str) -> Option<PathBuf> {
    // Primary: PATH lookup via which crate
    if let Ok(path) = which::which(name) {
        return Some(path);
    }

    FALLBACK_PATHS
        .iter()
        .map(|dir| PathBuf::from(dir).join(name))
        .find(|path| path.is_file())
}
