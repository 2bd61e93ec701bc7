//! Placeholder and ICU plural analysis of translation values.
//!
//! Values are parsed just deeply enough to compare locales: the set of
//! placeholder names (`{name}` and the variables heading ICU arguments)
//! and, per `plural` argument, the set of category labels. Anything that
//! does not look like a well-formed brace block is ignored rather than
//! reported, since the source of truth for message syntax is the runtime
//! that renders these values.

use std::collections::{BTreeMap, BTreeSet};

const PLURAL_KEYWORDS: &[&str] = &["zero", "one", "two", "few", "many", "other"];

fn is_identifier(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_category_label(token: &str) -> bool {
    if let Some(exact) = token.strip_prefix('=') {
        return !exact.is_empty() && exact.chars().all(|c| c.is_ascii_digit());
    }
    PLURAL_KEYWORDS.contains(&token)
}

/// Byte index just past the `}` matching the `{` at `open`, if balanced.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn top_level_comma(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn collect_names(text: &str, out: &mut BTreeSet<String>) {
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('{') {
        let open = pos + offset;
        let Some(end) = matching_brace(text, open) else {
            return; // unbalanced tail carries no placeholders
        };
        let inner = &text[open + 1..end - 1];

        match top_level_comma(inner) {
            Some(comma) => {
                let name = inner[..comma].trim();
                if is_identifier(name) {
                    out.insert(name.to_string());
                }
                // The argument tail is a branch list, not message text.
                collect_branch_bodies(&inner[comma + 1..], out);
            }
            None => {
                let name = inner.trim();
                if is_identifier(name) {
                    out.insert(name.to_string());
                } else {
                    collect_names(inner, out);
                }
            }
        }
        pos = end;
    }
}

/// Blocks in a branch list are branch bodies. Literal body text like
/// `male {He}` names nothing; only the body's own interior is message
/// text and can hold further placeholders.
fn collect_branch_bodies(text: &str, out: &mut BTreeSet<String>) {
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('{') {
        let open = pos + offset;
        let Some(end) = matching_brace(text, open) else {
            return;
        };
        collect_names(&text[open + 1..end - 1], out);
        pos = end;
    }
}

/// Order-independent set of placeholder names in one value.
pub fn placeholder_names(value: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_names(value, &mut names);
    names
}

fn collect_plurals(text: &str, out: &mut BTreeMap<String, BTreeSet<String>>) {
    let mut pos = 0;
    while let Some(offset) = text[pos..].find('{') {
        let open = pos + offset;
        let Some(end) = matching_brace(text, open) else {
            return;
        };
        let inner = &text[open + 1..end - 1];

        if let Some(first_comma) = top_level_comma(inner) {
            let variable = inner[..first_comma].trim();
            let rest = &inner[first_comma + 1..];

            let (arg_type, branches) = match top_level_comma(rest) {
                Some(second_comma) => (rest[..second_comma].trim(), &rest[second_comma + 1..]),
                None => (rest.trim(), ""),
            };

            if arg_type == "plural" && is_identifier(variable) {
                let categories = out.entry(variable.to_string()).or_default();
                scan_branch_labels(branches, categories);
            }
            // Nested plurals can sit inside any branch body.
            collect_plurals(rest, out);
        } else {
            collect_plurals(inner, out);
        }
        pos = end;
    }
}

/// Scan `one {...} =0 {...} other {...}` labels at brace depth zero.
fn scan_branch_labels(branches: &str, out: &mut BTreeSet<String>) {
    let mut token = String::new();
    let mut token_done = false;
    let mut pos = 0;
    let bytes_len = branches.len();

    while pos < bytes_len {
        let c = branches[pos..].chars().next().unwrap();
        match c {
            '{' => {
                // The last completed token is this body's label, whether
                // or not whitespace separates them.
                let label = token.trim();
                if is_category_label(label) {
                    out.insert(label.to_string());
                }
                token.clear();
                token_done = false;
                match matching_brace(branches, pos) {
                    Some(end) => pos = end,
                    None => return,
                }
            }
            c if c.is_whitespace() => {
                token_done = !token.is_empty();
                pos += c.len_utf8();
            }
            c => {
                if token_done {
                    token.clear();
                    token_done = false;
                }
                token.push(c);
                pos += c.len_utf8();
            }
        }
    }
}

/// Per plural variable, the set of category labels appearing in the value.
pub fn plural_categories(value: &str) -> BTreeMap<String, BTreeSet<String>> {
    let mut out = BTreeMap::new();
    collect_plurals(value, &mut out);
    out
}
