//! Malformed key name detection.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::scanner::UsageEntry;
use crate::core::store::FlatMapByLocale;
use crate::issues::{InvalidKeyIssue, InvalidKeyReason, Issue};

/// Classify a malformed key. Leading dot is checked first, so `".a."`
/// reports as a leading dot.
pub fn classify(key: &str) -> Option<InvalidKeyReason> {
    if key.starts_with('.') {
        Some(InvalidKeyReason::LeadingDot)
    } else if key.ends_with('.') {
        Some(InvalidKeyReason::TrailingDot)
    } else if key.contains("..") {
        Some(InvalidKeyReason::EmptySegment)
    } else {
        None
    }
}

/// Report malformed keys from locale files and from code, deduplicated.
pub fn check(translations: &FlatMapByLocale, usage: &BTreeMap<String, UsageEntry>) -> Vec<Issue> {
    let mut keys: BTreeSet<&String> = usage.keys().collect();
    for flat in translations.values() {
        keys.extend(flat.keys());
    }

    keys.into_iter()
        .filter_map(|key| {
            classify(key).map(|reason| {
                Issue::InvalidKey(InvalidKeyIssue {
                    key: key.clone(),
                    reason,
                })
            })
        })
        .collect()
}
