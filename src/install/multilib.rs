//! Enabling pacman's `[multilib]` repository.
//!
//! The text transform ([`enable_multilib`]) and the check
//! ([`is_multilib_enabled`]) are pure; [`apply_multilib`] wraps them with
//! file I/O and verifies the result by re-reading the file.

use crate::InstallError;
use std::path::Path;

const SECTION_HEADER: &str = "[multilib]";
const DEFAULT_INCLUDE: &str = "Include = /etc/pacman.d/mirrorlist";

/// Result of [`enable_multilib`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultilibEdit {
    /// The section is already active; the text needs no change.
    AlreadyEnabled,

    /// The updated configuration text.
    Edited(String),
}

/// Strip a leading `#` (and the whitespace after it) from a line.
fn uncommented(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('#')
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

/// Whether an uncommented line is an `Include = ...` directive.
fn is_include(line: &str) -> bool {
    line.split_once('=').is_some_and(|(key, _)| key.trim() == "Include")
}

/// Whether an uncommented line is a `Key = value` directive.
fn is_directive(line: &str) -> bool {
    line.split_once('=').is_some_and(|(key, _)| {
        let key = key.trim();
        !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// Index one past the last line of the section whose header is at `header`.
///
/// A section ends at the next header, commented or not.
fn section_end(lines: &[&str], header: usize) -> usize {
    lines[header + 1..]
        .iter()
        .position(|line| uncommented(line).starts_with('['))
        .map_or(lines.len(), |offset| header + 1 + offset)
}

/// Enable the `[multilib]` section, touching as little as possible.
///
/// - An uncommented header whose section has an uncommented `Include`
///   is already enabled and is left alone, whatever other directives
///   (such as `SigLevel`) sit between them.
/// - An uncommented header without an active `Include` gets the first
///   commented `Include` of its section uncommented, or the default
///   mirrorlist include inserted below the header.
/// - A commented header is uncommented together with the commented
///   directives directly below it. If none of them is an `Include`, the
///   default one is inserted after them.
/// - A configuration with no multilib section at all gets one appended.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::{enable_multilib, MultilibEdit};
///
/// let conf = "[core]\nInclude = /etc/pacman.d/mirrorlist\n\n#[multilib]\n#Include = /etc/pacman.d/mirrorlist\n";
/// let MultilibEdit::Edited(text) = enable_multilib(conf) else { panic!() };
/// assert!(text.contains("\n[multilib]\nInclude = /etc/pacman.d/mirrorlist\n"));
/// ```
pub fn enable_multilib(text: &str) -> MultilibEdit {
    if is_multilib_enabled(text) {
        return MultilibEdit::AlreadyEnabled;
    }

    let original: Vec<&str> = text.lines().collect();
    let mut lines: Vec<String> = original.iter().map(|line| line.to_string()).collect();

    let active = original.iter().position(|line| line.trim() == SECTION_HEADER);
    let commented = original
        .iter()
        .position(|line| uncommented(line) == SECTION_HEADER);

    if let Some(i) = active {
        let end = section_end(&original, i);
        match (i + 1..end).find(|&j| is_include(uncommented(original[j]))) {
            Some(j) => lines[j] = uncommented(original[j]).to_string(),
            None => lines.insert(i + 1, DEFAULT_INCLUDE.to_string()),
        }
    } else if let Some(i) = commented {
        lines[i] = SECTION_HEADER.to_string();
        let block = original[i + 1..]
            .iter()
            .take_while(|line| {
                line.trim().starts_with('#') && is_directive(uncommented(line))
            })
            .count();
        let body = i + 1..i + 1 + block;
        for (line, source) in lines[body.clone()].iter_mut().zip(&original[body.clone()]) {
            *line = uncommented(source).to_string();
        }
        if !original[body].iter().any(|line| is_include(uncommented(line))) {
            lines.insert(i + 1 + block, DEFAULT_INCLUDE.to_string());
        }
    } else {
        if lines.last().is_some_and(|last| !last.trim().is_empty()) {
            lines.push(String::new());
        }
        lines.push(SECTION_HEADER.to_string());
        lines.push(DEFAULT_INCLUDE.to_string());
    }

    let mut edited = lines.join("\n");
    edited.push('\n');
    MultilibEdit::Edited(edited)
}

/// Whether `text` has an uncommented `[multilib]` header whose section
/// contains an uncommented `Include` line.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::is_multilib_enabled;
///
/// assert!(is_multilib_enabled("[multilib]\nInclude = /etc/pacman.d/mirrorlist\n"));
/// assert!(is_multilib_enabled("[multilib]\nSigLevel = PackageRequired\nInclude = /etc/pacman.d/mirrorlist\n"));
/// assert!(!is_multilib_enabled("#[multilib]\n#Include = /etc/pacman.d/mirrorlist\n"));
/// ```
pub fn is_multilib_enabled(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim() == SECTION_HEADER)
        .any(|(i, _)| {
            lines[i + 1..section_end(&lines, i)]
                .iter()
                .any(|line| is_include(line.trim()))
        })
}

/// Enable multilib in the pacman configuration at `path`.
///
/// Returns `Ok(false)` when the section was already enabled and the file
/// was left untouched, `Ok(true)` after a verified edit.
pub async fn apply_multilib(path: &Path) -> Result<bool, InstallError> {
    let edit_error = |message: String| InstallError::ConfigurationEditVerification {
        path: path.to_path_buf(),
        message,
        fix: format!(
            "Uncomment the [multilib] section and its Include line in {}, then run pacman -Sy",
            path.display()
        ),
    };

    let original = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| edit_error(format!("failed to read: {}", e)))?;

    let edited = match enable_multilib(&original) {
        MultilibEdit::AlreadyEnabled => {
            tracing::debug!(path = %path.display(), "multilib already enabled");
            return Ok(false);
        }
        MultilibEdit::Edited(edited) => edited,
    };

    tokio::fs::write(path, edited)
        .await
        .map_err(|e| edit_error(format!("failed to write: {}", e)))?;

    let reread = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| edit_error(format!("failed to re-read: {}", e)))?;
    if !is_multilib_enabled(&reread) {
        return Err(edit_error(
            "multilib section is still disabled after editing".to_string(),
        ));
    }

    tracing::debug!(path = %path.display(), "multilib enabled");
    Ok(true)
}
