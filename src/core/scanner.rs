//! Source tree walking and usage aggregation.
//!
//! Walking and extraction are decoupled: the walk produces relative
//! `/`-separated paths, extraction runs over that list with the cache in
//! front of it. Files that cannot be read or parsed are skipped so one
//! broken file never sinks a whole scan.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::core::cache::{CacheBucket, CacheEntry, FileSignature, SignatureCache};
use crate::core::extract::KeyExtractor;
use crate::core::matcher::ScanMatcher;
use crate::utils::relative_slash_path;

/// Directory names never descended into.
pub const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    "out",
    "coverage",
    "target",
    "vendor",
];

pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Extraction output for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileScan {
    /// Key hits in file order, duplicates kept.
    pub keys: Vec<String>,
    pub imports: Vec<String>,
}

/// Aggregated usage of one translation key across the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    /// Total hits, counting repeats within a file.
    pub count: usize,
    /// Files referencing the key, deduplicated and sorted.
    pub files: Vec<String>,
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Walk the tree and return eligible relative paths, sorted.
pub fn list_source_files(root: &Path, matcher: &ScanMatcher) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| IGNORED_DIRS.contains(&name)))
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_source_extension(entry.path()))
        .filter_map(|entry| relative_slash_path(root, entry.path()))
        .filter(|rel| matcher.matches(rel))
        .collect();
    files.sort();
    files
}

/// Extract keys and imports for every listed file, cache-first.
///
/// Cache hits are resolved sequentially; misses are extracted in parallel
/// and merged back sequentially so the cache needs no locking.
pub fn scan_files(
    root: &Path,
    files: &[String],
    extractor: &KeyExtractor,
    bucket: &CacheBucket,
    cache: &mut SignatureCache,
    verbose: bool,
) -> BTreeMap<String, FileScan> {
    let mut results: BTreeMap<String, FileScan> = BTreeMap::new();
    let mut misses: Vec<(String, FileSignature)> = Vec::new();

    for rel in files {
        let path = root.join(rel);
        let Some(signature) = FileSignature::probe(&path) else {
            if verbose {
                eprintln!("Warning: skipping unreadable file: {}", path.display());
            }
            continue;
        };

        if let Some(entry) = cache.get(bucket, rel, signature) {
            results.insert(
                rel.clone(),
                FileScan {
                    keys: entry.keys.clone(),
                    imports: entry.imports.clone(),
                },
            );
        } else {
            misses.push((rel.clone(), signature));
        }
    }

    let extracted: Vec<(String, FileSignature, Result<FileScan>)> = misses
        .into_par_iter()
        .map(|(rel, signature)| {
            let path = root.join(&rel);
            let scan = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))
                .and_then(|code| {
                    Ok(FileScan {
                        keys: extractor.extract_keys(&code, &rel)?,
                        imports: extractor.extract_imports(&code, &rel)?,
                    })
                });
            (rel, signature, scan)
        })
        .collect();

    for (rel, signature, scan) in extracted {
        match scan {
            Ok(scan) => {
                cache.insert(
                    bucket,
                    rel.clone(),
                    CacheEntry {
                        signature,
                        keys: scan.keys.clone(),
                        imports: scan.imports.clone(),
                    },
                );
                results.insert(rel, scan);
            }
            Err(err) => {
                if verbose {
                    eprintln!("Warning: skipping {}: {:#}", rel, err);
                }
            }
        }
    }

    results
}

/// Fold per-file scans into per-key usage.
pub fn aggregate_usage(scans: &BTreeMap<String, FileScan>) -> BTreeMap<String, UsageEntry> {
    let mut usage: BTreeMap<String, UsageEntry> = BTreeMap::new();
    for (file, scan) in scans {
        for key in &scan.keys {
            let entry = usage.entry(key.clone()).or_default();
            entry.count += 1;
            if !entry.files.contains(file) {
                entry.files.push(file.clone());
            }
        }
    }
    usage
}
