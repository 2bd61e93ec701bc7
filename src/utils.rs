/// Check if a string contains at least one alphabetic character.
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// Check if a string is shaped like a translation key.
///
/// A key is a dot-segmented sequence of identifier-like tokens: every
/// segment is non-empty and contains only `[A-Za-z0-9_-]` characters.
pub fn looks_like_key(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    candidate.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    })
}

/// Check if a string could be meant as a translation key at all.
///
/// Looser than [`looks_like_key`]: malformed dot shapes (leading/trailing
/// or doubled dots) pass so they can be reported as invalid, but prose,
/// whitespace, and punctuation-bearing strings do not.
pub fn is_key_candidate(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}

/// Convert a path relative to a root into a `/`-separated string.
///
/// Returns `None` if the path is not under the root.
pub fn relative_slash_path(root: &std::path::Path, path: &std::path::Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    Some(out)
}
