//! Report formatting and printing utilities.
//!
//! Human-readable output for each command. JSON output is serialized
//! directly from the result types and never passes through here.

use std::collections::BTreeMap;
use std::io::{self, Write};

use colored::Colorize;

use crate::config::CONFIG_FILE_NAME;
use crate::core::engine::RenameOutcome;
use crate::core::graph::KeyUsageMap;
use crate::core::scanner::UsageEntry;
use crate::issues::{CheckReport, Report, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of files to display per usage entry.
const MAX_FILES_DISPLAY: usize = 3;

pub fn print_check(result: &CheckReport) {
    print_check_to(result, &mut io::stdout().lock());
}

/// Print a check report to a custom writer. Useful for testing.
pub fn print_check_to<W: Write>(result: &CheckReport, writer: &mut W) {
    for issue in &result.issues {
        let severity_str = match issue.severity(result.strict_placeholders) {
            Severity::Error => "error".bold().red(),
            Severity::Warning => "warning".bold().yellow(),
        };

        let _ = writeln!(
            writer,
            "{}: {}  {}",
            severity_str,
            issue.message(),
            issue.rule().to_string().dimmed().cyan()
        );
        if let Some(details) = issue.details() {
            let _ = writeln!(writer, "  {} {} {}", "=".blue(), "note:".bold(), details);
        }
        let _ = writeln!(writer);
    }

    print_check_summary(result, writer);
}

fn print_check_summary<W: Write>(result: &CheckReport, writer: &mut W) {
    let summary = &result.summary;

    if result.issues.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source {}, {} {} in use - no issues found",
                summary.files_scanned,
                if summary.files_scanned == 1 {
                    "file"
                } else {
                    "files"
                },
                summary.keys_used,
                if summary.keys_used == 1 { "key" } else { "keys" }
            )
            .green()
        );
        return;
    }

    let total = summary.error_issues + summary.warning_issues;
    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        total,
        summary.error_issues,
        if summary.error_issues == 1 {
            "error"
        } else {
            "errors"
        }
        .red(),
        summary.warning_issues,
        if summary.warning_issues == 1 {
            "warning"
        } else {
            "warnings"
        }
        .yellow()
    );
}

pub fn print_usage(usage: &BTreeMap<String, UsageEntry>) {
    print_usage_to(usage, &mut io::stdout().lock());
}

pub fn print_usage_to<W: Write>(usage: &BTreeMap<String, UsageEntry>, writer: &mut W) {
    for (key, entry) in usage {
        let _ = writeln!(
            writer,
            "{}  {}",
            key.bold(),
            format!(
                "{} {}",
                entry.count,
                if entry.count == 1 { "use" } else { "uses" }
            )
            .dimmed()
        );

        let display_count = entry.files.len().min(MAX_FILES_DISPLAY);
        for file in entry.files.iter().take(display_count) {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), file);
        }
        let remaining = entry.files.len().saturating_sub(display_count);
        if remaining > 0 {
            let _ = writeln!(writer, "  {}", format!("(and {} more)", remaining).dimmed());
        }
    }

    let _ = writeln!(
        writer,
        "\n{} {} in use",
        usage.len(),
        if usage.len() == 1 { "key" } else { "keys" }
    );
}

pub fn print_pages(map: &KeyUsageMap) {
    print_pages_to(map, &mut io::stdout().lock());
}

pub fn print_pages_to<W: Write>(map: &KeyUsageMap, writer: &mut W) {
    for page in &map.pages {
        let _ = writeln!(writer, "{} {}", page.file.bold(), page.id.dimmed().cyan());
        for key in &page.keys {
            let _ = writeln!(writer, "  {}", key);
        }
        let _ = writeln!(writer);
    }

    let _ = writeln!(
        writer,
        "{} {} ({} files scanned)",
        map.pages.len(),
        if map.pages.len() == 1 {
            "page"
        } else {
            "pages"
        },
        map.files.len()
    );
}

pub fn print_rename(old: &str, new: &str, outcome: &RenameOutcome, moved_locales: usize) {
    print_rename_to(old, new, outcome, moved_locales, &mut io::stdout().lock());
}

pub fn print_rename_to<W: Write>(
    old: &str,
    new: &str,
    outcome: &RenameOutcome,
    moved_locales: usize,
    writer: &mut W,
) {
    if outcome.replacements == 0 && moved_locales == 0 {
        let _ = writeln!(
            writer,
            "No occurrences of \"{}\" found ({} files scanned).",
            old, outcome.files_scanned
        );
        return;
    }

    let _ = writeln!(
        writer,
        "{} \"{}\" to \"{}\"",
        "Renamed".green().bold(),
        old,
        new
    );
    if outcome.replacements > 0 {
        let _ = writeln!(
            writer,
            "  - {} replacement(s) in {} file(s) ({} scanned)",
            outcome.replacements,
            outcome.changed_files.len(),
            outcome.files_scanned
        );
        for file in &outcome.changed_files {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), file);
        }
    }
    if moved_locales > 0 {
        let _ = writeln!(writer, "  - moved in {} locale file(s)", moved_locales);
    }
}

pub fn print_init() {
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );
}

// ============================================================
// Tests
// ============================================================
