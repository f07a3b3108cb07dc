//! `/etc/os-release` parsing.

/// The fields of an os-release file the detector cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OsRelease {
    /// Lowercased `ID`, if present and non-empty.
    pub id: Option<String>,

    /// `VERSION_ID`, if present and non-empty.
    pub version_id: Option<String>,
}

/// Parse os-release content.
///
/// Values may be bare, single- or double-quoted. Comment lines and
/// unknown keys are ignored; the last assignment of a key wins.
pub(crate) fn parse_os_release(content: &str) -> OsRelease {
    let mut release = OsRelease::default();

    for line in content.lines().map(str::trim) {
        if line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "ID" => release.id = Some(value.to_lowercase()),
            "VERSION_ID" => release.version_id = Some(value.to_string()),
            _ => {}
        }
    }

    release
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}
