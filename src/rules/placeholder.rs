//! Cross-locale placeholder and plural-category comparison.

use std::collections::BTreeSet;

use crate::core::placeholder::{placeholder_names, plural_categories};
use crate::core::store::FlatMapByLocale;
use crate::issues::{Issue, PlaceholderMismatchIssue};

fn to_vec(set: &BTreeSet<String>) -> Vec<String> {
    set.iter().cloned().collect()
}

/// Compare placeholder name sets and plural categories across locales.
///
/// Only keys valued in at least two locales are compared. The reference
/// locale is the default locale when it holds a value, otherwise the first
/// valued locale in configured order; the reference itself is never
/// reported against.
pub fn check(
    translations: &FlatMapByLocale,
    default_locale: &str,
    locale_order: &[String],
) -> Vec<Issue> {
    let mut keys: BTreeSet<&String> = BTreeSet::new();
    for flat in translations.values() {
        keys.extend(flat.keys());
    }

    let mut issues = Vec::new();
    for key in keys {
        let valued: Vec<(&String, &String)> = locale_order
            .iter()
            .filter_map(|locale| {
                translations
                    .get(locale)
                    .and_then(|flat| flat.get(key))
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| (locale, value))
            })
            .collect();

        if valued.len() < 2 {
            continue;
        }

        let (reference_locale, reference_value) = valued
            .iter()
            .find(|(locale, _)| locale.as_str() == default_locale)
            .copied()
            .unwrap_or(valued[0]);

        let expected_names = placeholder_names(reference_value);
        let expected_plurals = plural_categories(reference_value);

        for (locale, value) in &valued {
            if locale == &reference_locale {
                continue;
            }

            let actual_names = placeholder_names(value);
            if actual_names != expected_names {
                issues.push(Issue::Placeholder(PlaceholderMismatchIssue {
                    key: key.clone(),
                    reference_locale: reference_locale.clone(),
                    locale: (*locale).clone(),
                    variable: None,
                    expected: to_vec(&expected_names),
                    actual: to_vec(&actual_names),
                }));
            }

            let actual_plurals = plural_categories(value);
            let variables: BTreeSet<&String> = expected_plurals
                .keys()
                .chain(actual_plurals.keys())
                .collect();
            for variable in variables {
                let empty = BTreeSet::new();
                let expected = expected_plurals.get(variable).unwrap_or(&empty);
                let actual = actual_plurals.get(variable).unwrap_or(&empty);
                if expected != actual {
                    issues.push(Issue::Placeholder(PlaceholderMismatchIssue {
                        key: key.clone(),
                        reference_locale: reference_locale.clone(),
                        locale: (*locale).clone(),
                        variable: Some(variable.clone()),
                        expected: to_vec(expected),
                        actual: to_vec(actual),
                    }));
                }
            }
        }
    }
    issues
}
