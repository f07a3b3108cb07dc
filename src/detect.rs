//! Distribution detection functions.

use crate::detection::{first_token, parse_os_release, query_identity};
use crate::{CommandRunner, CommandSpec, Distribution, DistroFamily, HostPaths};
use regex::Regex;
use std::path::Path;

/// Detect the host distribution.
///
/// Sources are consulted in priority order and the first one yielding a
/// non-empty identity wins:
///
/// 1. `ID` from the os-release file
/// 2. `lsb_release -si`, when `lsb_release` is on PATH
/// 3. The first token of the release-marker file
/// 4. The `"unknown"` sentinel
///
/// Detection never fails and never retries; an unidentifiable host simply
/// yields [`Distribution::unknown`].
///
/// # Example
///
/// ```rust,no_run
/// use steam_bootstrap::{detect_distribution, HostPaths, SystemRunner};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let distro = detect_distribution(&SystemRunner::new(), &HostPaths::default()).await;
///     println!("{} ({})", distro.id, distro.family.display_name());
/// }
/// ```
pub async fn detect_distribution<R: CommandRunner>(runner: &R, paths: &HostPaths) -> Distribution {
    if let Some(content) = read_if_present(&paths.os_release).await {
        let release = parse_os_release(&content);
        if let Some(id) = release.id {
            tracing::debug!(%id, source = %paths.os_release.display(), "identity from os-release");
            return Distribution::new(&id, release.version_id);
        }
    }

    if let Some(id) = query_identity(runner).await {
        tracing::debug!(%id, "identity from lsb_release");
        return Distribution::new(&id, None);
    }

    let marker = read_if_present(&paths.release_marker).await;
    if let Some(id) = marker.as_deref().and_then(first_token) {
        tracing::debug!(%id, source = %paths.release_marker.display(), "identity from release marker");
        return Distribution::new(&id, None);
    }

    tracing::debug!("no identity source available");
    Distribution::unknown()
}

async fn read_if_present(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "identity source unreadable");
            None
        }
    }
}

/// Determine the release major version of an RPM-like host.
///
/// Uses the leading digits of `VERSION_ID` ("39", "9.3" → 9), falling back
/// to `rpm -E %fedora` on Fedora and `rpm -E %rhel` on CentOS/RHEL.
/// Returns `None` for other families or when nothing usable is found.
pub async fn release_major<R: CommandRunner>(runner: &R, distro: &Distribution) -> Option<u32> {
    if distro.family != DistroFamily::RpmLike {
        return None;
    }

    if let Some(major) = distro.version_id.as_deref().and_then(leading_number) {
        return Some(major);
    }

    let macro_name = if distro.id == "fedora" {
        "%fedora"
    } else {
        "%rhel"
    };
    let command = CommandSpec::new("rpm").args(["-E", macro_name]);
    match runner.output(&command).await {
        Ok(output) if command.accepts(output.status) => leading_number(output.stdout.trim()),
        Ok(output) => {
            tracing::debug!(code = ?output.status.code, "rpm macro query failed");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "rpm macro query failed to start");
            None
        }
    }
}

/// Leading decimal digits of `text`.
///
/// An unexpanded rpm macro such as `%fedora` has none and yields `None`.
fn leading_number(text: &str) -> Option<u32> {
    let re = Regex::new(r"^(\d+)").expect("Invalid version regex");
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
