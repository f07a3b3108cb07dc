//! Provisioning configuration.
//!
//! This module provides the [`RetryPolicy`] handed to the retry executor,
//! the [`HostPaths`] the detector and Arch recipe read from, and
//! [`ProvisionOptions`] bundling both. All of them are plain immutable
//! values; nothing is stored in globals.

use std::path::PathBuf;
use std::time::Duration;

/// Retry budget for flaky package-manager and network operations.
///
/// A command is attempted up to `max_attempts` times with a fixed `delay`
/// between consecutive attempts.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 3);
/// assert_eq!(policy.delay(), Duration::from_secs(5));
///
/// let policy = RetryPolicy::new(0, Duration::ZERO);
/// assert_eq!(policy.max_attempts(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Total attempts, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fixed wait between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

/// Host files and directories the installer reads or writes.
///
/// The defaults are the real system locations; tests point them at
/// temporary files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    /// Structured host identity file.
    ///
    /// Default: `/etc/os-release`
    pub os_release: PathBuf,

    /// Distribution release marker, used when neither os-release nor
    /// `lsb_release` is available.
    ///
    /// Default: `/etc/redhat-release`
    pub release_marker: PathBuf,

    /// pacman configuration holding the `[multilib]` section.
    ///
    /// Default: `/etc/pacman.conf`
    pub pacman_conf: PathBuf,

    /// Where downloaded package files are stored.
    ///
    /// Default: `/tmp`
    pub download_dir: PathBuf,
}

impl Default for HostPaths {
    fn default() -> Self {
        Self {
            os_release: PathBuf::from("/etc/os-release"),
            release_marker: PathBuf::from("/etc/redhat-release"),
            pacman_conf: PathBuf::from("/etc/pacman.conf"),
            download_dir: PathBuf::from("/tmp"),
        }
    }
}

/// Everything a provisioning run is configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Retry budget shared by every retried step.
    pub retry: RetryPolicy,

    /// Host file locations.
    pub paths: HostPaths,
}
