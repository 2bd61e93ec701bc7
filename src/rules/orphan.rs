//! Orphan key detection.

use std::collections::BTreeMap;

use crate::core::scanner::UsageEntry;
use crate::core::store::FlatMapByLocale;
use crate::issues::{Issue, OrphanKeyIssue};

/// Report translated keys with zero usage hits in the scanned tree.
pub fn check(translations: &FlatMapByLocale, usage: &BTreeMap<String, UsageEntry>) -> Vec<Issue> {
    let mut valued: BTreeMap<&String, Vec<String>> = BTreeMap::new();
    for (locale, flat) in translations {
        for (key, value) in flat {
            if !value.trim().is_empty() {
                valued.entry(key).or_default().push(locale.clone());
            }
        }
    }

    valued
        .into_iter()
        .filter(|(key, _)| !usage.contains_key(*key))
        .map(|(key, locales)| {
            Issue::Orphan(OrphanKeyIssue {
                key: key.clone(),
                locales,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::FlatMap;
    use pretty_assertions::assert_eq;

    fn flat(pairs: &[(&str, &str)]) -> FlatMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unused_translated_key_is_orphan() {
        let mut translations = FlatMapByLocale::new();
        translations.insert("en".to_string(), flat(&[("old.banner", "Gone")]));
        translations.insert("nl".to_string(), flat(&[("old.banner", "Weg")]));

        let issues = check(&translations, &BTreeMap::new());
        assert_eq!(issues.len(), 1);
        let Issue::Orphan(issue) = &issues[0] else {
            panic!("expected orphan issue");
        };
        assert_eq!(issue.key, "old.banner");
        assert_eq!(issue.locales, vec!["en", "nl"]);
    }

    #[test]
    fn test_used_key_is_not_orphan() {
        let mut translations = FlatMapByLocale::new();
        translations.insert("en".to_string(), flat(&[("common.ok", "OK")]));

        let mut usage = BTreeMap::new();
        usage.insert(
            "common.ok".to_string(),
            UsageEntry {
                count: 2,
                files: vec!["a.tsx".to_string()],
            },
        );

        assert_eq!(check(&translations, &usage), Vec::new());
    }

    #[test]
    fn test_empty_values_do_not_make_orphans() {
        let mut translations = FlatMapByLocale::new();
        translations.insert("en".to_string(), flat(&[("blank.key", "  ")]));

        assert_eq!(check(&translations, &BTreeMap::new()), Vec::new());
    }
}
