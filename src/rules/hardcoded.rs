//! Hardcoded text detection in JSX files.
//!
//! A line-based scan: JSX text between tags on a line and a fixed list of
//! prose-bearing attributes. Deliberately shallow, so the prose predicate
//! does the heavy lifting in keeping noise out.

use std::{
    collections::BTreeSet,
    path::Path,
    sync::LazyLock,
};

use regex::Regex;

use crate::config::HardcodedPolicy;
use crate::issues::{HardcodedKind, HardcodedTextIssue, Issue};
use crate::utils::{contains_alphabetic, looks_like_key};

/// Comment marker suppressing findings on the following line.
pub const SUPPRESS_MARKER: &str = "gloss-ignore";

/// JSX attributes whose string values are user-facing prose.
pub const CHECKED_ATTRIBUTES: &[&str] = &[
    "title",
    "label",
    "placeholder",
    "alt",
    "aria-label",
    "aria-description",
    "aria-placeholder",
];

// Text between a closing `>` and the next `<` on one line.
static JSX_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*([^<>{}\n]+?)\s*<").unwrap());

// Text trailing an opening tag to end of line, and leading text before a
// closing tag at line start.
static JSX_TEXT_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*([^<>{}\n]+?)\s*$").unwrap());
static JSX_TEXT_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^<>{}\n]+?)\s*</").unwrap());

static CHECKED_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(title|label|placeholder|alt|aria-label|aria-description|aria-placeholder)\s*=\s*["']([^"'\n]+)["']"#,
    )
    .unwrap()
});

const NON_PROSE_LITERALS: &[&str] = &["true", "false", "null", "undefined"];

// Characters that mark a string as code rather than copy.
const CODE_CHARS: &[char] = &[
    ';', '=', '{', '}', '(', ')', '<', '>', '[', ']', '/', '\\', '|', '&', '*', '+', '~', '^',
    '$', '#', '@', '%',
];

/// Decide whether a candidate string is reportable prose.
fn is_prose(
    text: &str,
    policy: &HardcodedPolicy,
    excludes: &[Regex],
    known_keys: &BTreeSet<String>,
) -> bool {
    let text = text.trim();
    if text.len() < policy.min_length || !contains_alphabetic(text) {
        return false;
    }
    if NON_PROSE_LITERALS.contains(&text) {
        return false;
    }
    if text.starts_with("http://") || text.starts_with("https://") || text.starts_with("//") {
        return false;
    }
    if text.contains(CODE_CHARS) {
        return false;
    }
    if looks_like_key(text) && (text.contains('.') || known_keys.contains(text)) {
        return false;
    }
    !excludes.iter().any(|re| re.is_match(text))
}

fn is_jsx_file(relative_path: &str) -> bool {
    Path::new(relative_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "tsx" || ext == "jsx")
}

/// Scan the given files for hardcoded prose.
///
/// `known_keys` is the set of translated keys; strings shaped like them
/// are treated as keys, not copy. Unreadable files are skipped.
pub fn check(
    root: &Path,
    files: &[String],
    policy: &HardcodedPolicy,
    known_keys: &BTreeSet<String>,
) -> Vec<Issue> {
    if !policy.enabled {
        return Vec::new();
    }

    // Patterns were validated with the config; one failing here is a
    // programming error upstream, so it is simply skipped.
    let excludes: Vec<Regex> = policy
        .exclude_patterns
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect();

    let mut seen: BTreeSet<(String, usize, HardcodedKind, String)> = BTreeSet::new();
    let mut issues = Vec::new();

    for rel in files.iter().filter(|rel| is_jsx_file(rel)) {
        let Ok(code) = std::fs::read_to_string(root.join(rel)) else {
            continue;
        };

        let mut previous_line = "";
        for (index, line) in code.lines().enumerate() {
            let suppressed = previous_line.contains(SUPPRESS_MARKER);
            previous_line = line;
            if suppressed {
                continue;
            }

            let line_no = index + 1;
            let mut candidates: Vec<(HardcodedKind, &str)> = Vec::new();

            for pattern in [&*JSX_TEXT, &*JSX_TEXT_TAIL, &*JSX_TEXT_HEAD] {
                for caps in pattern.captures_iter(line) {
                    if let Some(m) = caps.get(1) {
                        candidates.push((HardcodedKind::JsxText, m.as_str()));
                    }
                }
            }
            for caps in CHECKED_ATTR.captures_iter(line) {
                if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
                    candidates.push((
                        HardcodedKind::Attribute(name.as_str().to_string()),
                        value.as_str(),
                    ));
                }
            }

            for (kind, text) in candidates {
                if !is_prose(text, policy, &excludes, known_keys) {
                    continue;
                }
                let text = text.trim().to_string();
                if seen.insert((rel.clone(), line_no, kind.clone(), text.clone())) {
                    issues.push(Issue::Hardcoded(HardcodedTextIssue {
                        file: rel.clone(),
                        line: line_no,
                        kind,
                        text,
                    }));
                }
            }
        }
    }
    issues
}
