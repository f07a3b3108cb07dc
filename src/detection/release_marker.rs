//! Release-marker file parsing (e.g. `/etc/redhat-release`).

/// First whitespace-delimited token of `content`, lowercased.
///
/// `"Fedora release 39 (Thirty Nine)"` yields `"fedora"`.
pub(crate) fn first_token(content: &str) -> Option<String> {
    content
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
}
