//! Issue types produced by the consistency checker.
//!
//! Each issue is self-contained: the reporter renders it without looking
//! anything else up, and the JSON output serializes it as-is.

use enum_dispatch::enum_dispatch;
use serde::Serialize;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    Missing,
    InvalidKey,
    Placeholder,
    Orphan,
    Hardcoded,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Missing => write!(f, "missing"),
            Rule::InvalidKey => write!(f, "invalid-key"),
            Rule::Placeholder => write!(f, "placeholder"),
            Rule::Orphan => write!(f, "orphan"),
            Rule::Hardcoded => write!(f, "hardcoded"),
        }
    }
}

impl Rule {
    /// Placeholder findings escalate to errors only under strict mode.
    pub fn severity(&self, strict: bool) -> Severity {
        match self {
            Rule::Missing | Rule::InvalidKey => Severity::Error,
            Rule::Placeholder => {
                if strict {
                    Severity::Error
                } else {
                    Severity::Warning
                }
            }
            Rule::Orphan | Rule::Hardcoded => Severity::Warning,
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Key referenced in code or present in some locale, but untranslated in
/// the listed locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingTranslationIssue {
    pub key: String,
    /// Locales where the value is absent or empty after trimming.
    pub locales: Vec<String>,
    pub used_in_code: bool,
}

/// Translated key with no usage hits anywhere in the scanned tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanKeyIssue {
    pub key: String,
    /// Locales holding a non-empty value for the key.
    pub locales: Vec<String>,
}

/// Why a key name is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidKeyReason {
    LeadingDot,
    TrailingDot,
    EmptySegment,
}

impl std::fmt::Display for InvalidKeyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidKeyReason::LeadingDot => write!(f, "leading dot"),
            InvalidKeyReason::TrailingDot => write!(f, "trailing dot"),
            InvalidKeyReason::EmptySegment => write!(f, "empty segment"),
        }
    }
}

/// Malformed key name, in a locale file or in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidKeyIssue {
    pub key: String,
    pub reason: InvalidKeyReason,
}

/// Placeholder or plural-category disagreement between two locales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderMismatchIssue {
    pub key: String,
    pub reference_locale: String,
    pub locale: String,
    /// Set when the mismatch is in one plural variable's categories
    /// rather than in the placeholder name set.
    pub variable: Option<String>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Kind of source position carrying hardcoded text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum HardcodedKind {
    JsxText,
    Attribute(String),
}

/// User-facing prose living in JSX instead of a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardcodedTextIssue {
    pub file: String,
    pub line: usize,
    #[serde(flatten)]
    pub kind: HardcodedKind,
    pub text: String,
}

// ============================================================
// Issue Enum
// ============================================================

/// A consistency issue found during a check run.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Issue {
    Missing(MissingTranslationIssue),
    InvalidKey(InvalidKeyIssue),
    Placeholder(PlaceholderMismatchIssue),
    Orphan(OrphanKeyIssue),
    Hardcoded(HardcodedTextIssue),
}

impl Issue {
    pub fn severity(&self, strict: bool) -> Severity {
        self.rule().severity(strict)
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Uniform view of an issue for the reporter. `enum_dispatch` keeps the
/// dispatch on `Issue` static.
#[enum_dispatch]
pub trait Report {
    /// Rule identifier.
    fn rule(&self) -> Rule;

    /// Primary message to display (key name, text, etc.).
    fn message(&self) -> String;

    /// Optional details for the trailing note line.
    fn details(&self) -> Option<String> {
        None
    }
}

impl Report for MissingTranslationIssue {
    fn rule(&self) -> Rule {
        Rule::Missing
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn details(&self) -> Option<String> {
        let origin = if self.used_in_code {
            "used in code"
        } else {
            "translated elsewhere"
        };
        Some(format!("missing in: {} ({})", self.locales.join(", "), origin))
    }
}

impl Report for OrphanKeyIssue {
    fn rule(&self) -> Rule {
        Rule::Orphan
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn details(&self) -> Option<String> {
        Some(format!("translated but unused in: {}", self.locales.join(", ")))
    }
}

impl Report for InvalidKeyIssue {
    fn rule(&self) -> Rule {
        Rule::InvalidKey
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn details(&self) -> Option<String> {
        Some(self.reason.to_string())
    }
}

impl Report for PlaceholderMismatchIssue {
    fn rule(&self) -> Rule {
        Rule::Placeholder
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn details(&self) -> Option<String> {
        let subject = match &self.variable {
            Some(variable) => format!("plural categories of {{{}}}", variable),
            None => "placeholders".to_string(),
        };
        Some(format!(
            "{} in {} expected [{}] (per {}), got [{}]",
            subject,
            self.locale,
            self.expected.join(", "),
            self.reference_locale,
            self.actual.join(", "),
        ))
    }
}

impl Report for HardcodedTextIssue {
    fn rule(&self) -> Rule {
        Rule::Hardcoded
    }

    fn message(&self) -> String {
        format!("\"{}\"", self.text)
    }

    fn details(&self) -> Option<String> {
        let place = match &self.kind {
            HardcodedKind::JsxText => "JSX text".to_string(),
            HardcodedKind::Attribute(name) => format!("attribute '{}'", name),
        };
        Some(format!("{} at {}:{}", place, self.file, self.line))
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rule()
            .cmp(&other.rule())
            .then_with(|| self.message().cmp(&other.message()))
            .then_with(|| self.details().cmp(&other.details()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================
// Check report
// ============================================================

/// Run totals; `ok` mirrors the exit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub files_scanned: usize,
    pub keys_used: usize,
    pub keys_translated: usize,
    pub missing_translations: usize,
    pub orphan_keys: usize,
    pub invalid_keys: usize,
    pub placeholder_mismatches: usize,
    pub hardcoded_texts: usize,
    pub total_issues: usize,
    pub error_issues: usize,
    pub warning_issues: usize,
    pub ok: bool,
}

/// Everything one `check` run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub issues: Vec<Issue>,
    pub strict_placeholders: bool,
    pub summary: CheckSummary,
}

impl CheckReport {
    /// Assemble a report, sorting issues and deriving the summary split.
    pub fn new(
        mut issues: Vec<Issue>,
        strict_placeholders: bool,
        files_scanned: usize,
        keys_used: usize,
        keys_translated: usize,
    ) -> Self {
        issues.sort();

        let by_rule = |rule: Rule| issues.iter().filter(|i| i.rule() == rule).count();
        let error_issues = issues
            .iter()
            .filter(|i| i.severity(strict_placeholders) == Severity::Error)
            .count();
        let warning_issues = issues.len() - error_issues;

        let summary = CheckSummary {
            files_scanned,
            keys_used,
            keys_translated,
            missing_translations: by_rule(Rule::Missing),
            orphan_keys: by_rule(Rule::Orphan),
            invalid_keys: by_rule(Rule::InvalidKey),
            placeholder_mismatches: by_rule(Rule::Placeholder),
            hardcoded_texts: by_rule(Rule::Hardcoded),
            total_issues: issues.len(),
            error_issues,
            warning_issues,
            ok: error_issues == 0,
        };

        Self {
            issues,
            strict_placeholders,
            summary,
        }
    }
}

// ============================================================
// Tests
// ============================================================
