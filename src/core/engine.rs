//! Orchestration of scans, checks, and store operations.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::core::cache::{CacheBucket, SignatureCache};
use crate::core::extract::KeyExtractor;
use crate::core::graph::{self, KeyUsageMap};
use crate::core::matcher::ScanMatcher;
use crate::core::scanner::{self, FileScan, UsageEntry};
use crate::core::store::{self, FlatMapByLocale, StoreError};
use crate::issues::{CheckReport, Issue};
use crate::rules;

/// Result of rewriting one key across the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOutcome {
    pub changed_files: Vec<String>,
    pub files_scanned: usize,
    pub replacements: usize,
}

/// One engine instance per project root.
///
/// The cache is owned but injectable, so long-lived callers can keep it
/// warm across runs while one-shot CLI invocations start cold.
pub struct Engine {
    config: Config,
    cache: SignatureCache,
    verbose: bool,
}

impl Engine {
    pub fn new(config: Config, verbose: bool) -> Self {
        Self::with_cache(config, SignatureCache::new(), verbose)
    }

    pub fn with_cache(config: Config, cache: SignatureCache, verbose: bool) -> Self {
        Self {
            config,
            cache,
            verbose,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn source_root(&self) -> PathBuf {
        PathBuf::from(&self.config.source_root)
    }

    fn bucket(&self) -> CacheBucket {
        // Spellings like `./src` and `src` must land in the same bucket.
        let raw = self.source_root();
        let root = raw.canonicalize().unwrap_or(raw);
        CacheBucket {
            root,
            includes: self.config.includes.clone(),
            excludes: self.config.excludes.clone(),
            mode: self.config.extraction_mode,
        }
    }

    fn extractor(&self) -> KeyExtractor {
        KeyExtractor::new(self.config.extraction_mode)
    }

    fn scan(&mut self) -> Result<BTreeMap<String, FileScan>> {
        let matcher = ScanMatcher::new(&self.config.includes, &self.config.excludes)?;
        let root = self.source_root();
        let files = scanner::list_source_files(&root, &matcher);

        let scans = scanner::scan_files(
            &root,
            &files,
            &self.extractor(),
            &self.bucket(),
            &mut self.cache,
            self.verbose,
        );

        self.cache.persist_metrics(&root, self.verbose);
        Ok(scans)
    }

    /// Read every configured locale from the translation store.
    pub fn read_translations(&self) -> FlatMapByLocale {
        store::read_all(&self.config.resolved_translations_dir(), &self.config.locales)
    }

    /// Write the full locale set back through the locked atomic path.
    pub fn write_translations(&self, data: &FlatMapByLocale) -> Result<(), StoreError> {
        store::write_all(
            &self.config.resolved_translations_dir(),
            data,
            self.config.lock_timeout_ms,
        )
    }

    /// Aggregate key usage across the scanned tree.
    pub fn scan_usage(&mut self) -> Result<BTreeMap<String, UsageEntry>> {
        let scans = self.scan()?;
        Ok(scanner::aggregate_usage(&scans))
    }

    /// Per-file keys plus per-page import-closure keys.
    pub fn build_key_usage_map(&mut self) -> Result<KeyUsageMap> {
        let scans = self.scan()?;
        Ok(graph::build_key_usage_map(&scans))
    }

    /// Run every rule and assemble the check report.
    pub fn run_check(&mut self) -> Result<CheckReport> {
        let scans = self.scan()?;
        let usage = scanner::aggregate_usage(&scans);
        let translations = self.read_translations();

        let translated_keys: BTreeSet<String> = translations
            .values()
            .flat_map(|flat| flat.keys().cloned())
            .collect();

        let scanned_files: Vec<String> = scans.keys().cloned().collect();

        let mut issues: Vec<Issue> = Vec::new();
        issues.extend(rules::missing::check(
            &translations,
            &usage,
            &self.config.locales,
        ));
        issues.extend(rules::orphan::check(&translations, &usage));
        issues.extend(rules::invalid_key::check(&translations, &usage));
        issues.extend(rules::placeholder::check(
            &translations,
            &self.config.default_locale,
            &self.config.locales,
        ));
        issues.extend(rules::hardcoded::check(
            &self.source_root(),
            &scanned_files,
            &self.config.hardcoded,
            &translated_keys,
        ));

        Ok(CheckReport::new(
            issues,
            self.config.strict_placeholders,
            scans.len(),
            usage.len(),
            translated_keys.len(),
        ))
    }

    /// Rewrite every literal use of `old` in the source tree.
    pub fn rename_key_usage(&mut self, old: &str, new: &str) -> Result<RenameOutcome> {
        let matcher = ScanMatcher::new(&self.config.includes, &self.config.excludes)?;
        let root = self.source_root();
        let files = scanner::list_source_files(&root, &matcher);
        let extractor = self.extractor();

        let mut changed_files = Vec::new();
        let mut replacements = 0;

        for rel in &files {
            let path = root.join(rel);
            let Ok(code) = fs::read_to_string(&path) else {
                if self.verbose {
                    eprintln!("Warning: skipping unreadable file: {}", path.display());
                }
                continue;
            };

            let outcome = match extractor.rewrite_key(&code, rel, old, new) {
                Ok(outcome) => outcome,
                Err(err) => {
                    if self.verbose {
                        eprintln!("Warning: skipping {}: {:#}", rel, err);
                    }
                    continue;
                }
            };

            if outcome.replacements > 0 {
                fs::write(&path, outcome.text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                replacements += outcome.replacements;
                changed_files.push(rel.clone());
            }
        }

        Ok(RenameOutcome {
            changed_files,
            files_scanned: files.len(),
            replacements,
        })
    }

    /// Move `old` to `new` in every locale that holds it.
    ///
    /// No-op for locales without the key; an existing value under `new`
    /// is overwritten.
    pub fn rename_translation_key(&self, old: &str, new: &str) -> Result<usize, StoreError> {
        let mut data = self.read_translations();
        let mut moved = 0;
        for flat in data.values_mut() {
            if let Some(value) = flat.remove(old) {
                flat.insert(new.to_string(), value);
                moved += 1;
            }
        }
        if moved > 0 {
            self.write_translations(&data)?;
        }
        Ok(moved)
    }
}
