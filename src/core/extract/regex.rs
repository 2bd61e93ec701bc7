//! Regex extraction mode.
//!
//! A shallow textual scan that trades precision for speed and resilience:
//! it never fails on broken source, but it only sees literal call shapes.

use std::sync::LazyLock;

use regex::Regex;

use super::RewriteOutcome;

// `t(...)` / `translate(...)` where the callee is not a member access.
static PLAIN_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^.\w])(?:t|translate)\s*\(\s*["'`]([^"'`\n]+)["'`]"#).unwrap()
});

// `i18n.t(...)`.
static NAMESPACED_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bi18n\s*\.\s*t\s*\(\s*["'`]([^"'`\n]+)["'`]"#).unwrap()
});

// `i18nKey="..."` JSX attribute, with or without an expression wrapper.
static I18N_KEY_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bi18nKey\s*=\s*\{?\s*["'`]([^"'`\n]+)["'`]"#).unwrap()
});

static STATIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:type\s+)?[^'"\n]*?from\s*["']([^"']+)["']"#).unwrap()
});

static SIDE_EFFECT_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*import\s*["']([^"']+)["']"#).unwrap());

static REEXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*export\s+[^'"\n]*?from\s*["']([^"']+)["']"#).unwrap()
});

static DYNAMIC_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bimport\s*\(\s*["']([^"']+)["']\s*\)"#).unwrap());

/// Collect `(position, capture)` pairs for every match of `pattern`.
fn captures_with_position(pattern: &Regex, code: &str, out: &mut Vec<(usize, String)>) {
    for caps in pattern.captures_iter(code) {
        if let Some(m) = caps.get(1) {
            out.push((m.start(), m.as_str().to_string()));
        }
    }
}

/// All translation key hits in file order, duplicates kept.
pub fn extract_keys(code: &str) -> Vec<String> {
    let mut hits: Vec<(usize, String)> = Vec::new();
    captures_with_position(&PLAIN_CALL, code, &mut hits);
    captures_with_position(&NAMESPACED_CALL, code, &mut hits);
    captures_with_position(&I18N_KEY_ATTR, code, &mut hits);
    hits.sort_by_key(|(pos, _)| *pos);
    hits.into_iter().map(|(_, key)| key).collect()
}

/// All import specifiers in file order.
pub fn extract_imports(code: &str) -> Vec<String> {
    let mut hits: Vec<(usize, String)> = Vec::new();
    captures_with_position(&STATIC_IMPORT, code, &mut hits);
    captures_with_position(&SIDE_EFFECT_IMPORT, code, &mut hits);
    captures_with_position(&REEXPORT, code, &mut hits);
    captures_with_position(&DYNAMIC_IMPORT, code, &mut hits);
    hits.sort_by_key(|(pos, _)| *pos);
    hits.into_iter().map(|(_, spec)| spec).collect()
}

/// Replace quoted occurrences of `old` with `new`, preserving quote style.
pub fn rewrite_key(code: &str, old: &str, new: &str) -> RewriteOutcome {
    let mut text = code.to_string();
    let mut replacements = 0;

    for quote in ['"', '\'', '`'] {
        let needle = format!("{quote}{old}{quote}");
        let replacement = format!("{quote}{new}{quote}");
        replacements += text.matches(&needle).count();
        text = text.replace(&needle, &replacement);
    }

    RewriteOutcome { text, replacements }
}
