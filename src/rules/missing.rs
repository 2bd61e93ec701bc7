//! Missing translation detection.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::scanner::UsageEntry;
use crate::core::store::FlatMapByLocale;
use crate::issues::{Issue, MissingTranslationIssue};

/// Report every key that lacks a non-empty value in some locale.
///
/// The key universe is the union of translated keys and keys used in code,
/// so a key referenced only in source still surfaces as missing in every
/// locale.
pub fn check(
    translations: &FlatMapByLocale,
    usage: &BTreeMap<String, UsageEntry>,
    locales: &[String],
) -> Vec<Issue> {
    let mut keys: BTreeSet<&String> = usage.keys().collect();
    for flat in translations.values() {
        keys.extend(flat.keys());
    }

    let mut issues = Vec::new();
    for key in keys {
        let missing_in: Vec<String> = locales
            .iter()
            .filter(|locale| {
                translations
                    .get(*locale)
                    .and_then(|flat| flat.get(key))
                    .is_none_or(|value| value.trim().is_empty())
            })
            .cloned()
            .collect();

        if !missing_in.is_empty() {
            issues.push(Issue::Missing(MissingTranslationIssue {
                key: key.clone(),
                locales: missing_in,
                used_in_code: usage.contains_key(key),
            }));
        }
    }
    issues
}
