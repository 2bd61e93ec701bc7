//! Per-file extraction cache keyed by file signatures.
//!
//! The cache is a pure accelerator: every lookup is validated against the
//! fresh `(mtime, size)` signature of the file, so a stale entry can only
//! produce a miss, never a wrong answer. Entries live in buckets so scans
//! over different roots or with different filters never mix.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use serde::Serialize;

use crate::config::ExtractionMode;

pub const METRICS_DIR_NAME: &str = ".gloss";
pub const METRICS_FILE_NAME: &str = "cache-metrics.json";

/// Change signature of one file. Content hashing is deliberately avoided;
/// a stale signature only costs a re-extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub mtime_ms: u64,
    pub size: u64,
}

impl FileSignature {
    /// Read the signature from file metadata. `None` when the file is
    /// missing or its mtime is unavailable.
    pub fn probe(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        let mtime_ms = metadata
            .modified()
            .ok()?
            .duration_since(UNIX_EPOCH)
            .ok()?
            .as_millis() as u64;
        Some(Self {
            mtime_ms,
            size: metadata.len(),
        })
    }
}

/// Identity of one scan configuration.
///
/// Scans agree on cached data only when the root, the filters, and the
/// extraction mode all agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheBucket {
    pub root: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub mode: ExtractionMode,
}

/// Cached extraction output for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub signature: FileSignature,
    /// Key hits with duplicates preserved, so cached and cold scans agree
    /// on usage counts.
    pub keys: Vec<String>,
    pub imports: Vec<String>,
}

/// In-memory extraction cache. An explicit service owned by the caller;
/// nothing in the engine requires it to be warm.
#[derive(Debug, Default)]
pub struct SignatureCache {
    buckets: HashMap<CacheBucket, HashMap<String, CacheEntry>>,
}

impl SignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a file's entry, validating it against the fresh signature.
    pub fn get(
        &self,
        bucket: &CacheBucket,
        relative_path: &str,
        fresh: FileSignature,
    ) -> Option<&CacheEntry> {
        let entry = self.buckets.get(bucket)?.get(relative_path)?;
        (entry.signature == fresh).then_some(entry)
    }

    pub fn insert(&mut self, bucket: &CacheBucket, relative_path: String, entry: CacheEntry) {
        self.buckets
            .entry(bucket.clone())
            .or_default()
            .insert(relative_path, entry);
    }

    /// Drop every entry for one scan configuration.
    pub fn clear(&mut self, bucket: &CacheBucket) {
        self.buckets.remove(bucket);
    }

    pub fn clear_all(&mut self) {
        self.buckets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn metrics(&self) -> Vec<BucketMetrics> {
        let mut out: Vec<BucketMetrics> = self
            .buckets
            .iter()
            .map(|(bucket, entries)| BucketMetrics {
                root: bucket.root.to_string_lossy().into_owned(),
                mode: bucket.mode.as_str(),
                file_count: entries.len(),
                total_size_bytes: entries.values().map(|e| e.signature.size).sum(),
                oldest_mtime_ms: entries.values().map(|e| e.signature.mtime_ms).min(),
            })
            .collect();
        out.sort_by(|a, b| a.root.cmp(&b.root).then(a.mode.cmp(b.mode)));
        out
    }

    /// Persist a metrics snapshot under `<root>/.gloss/`.
    ///
    /// Best-effort: any failure is reported through the verbose channel and
    /// swallowed, since metrics must never affect a scan's outcome.
    pub fn persist_metrics(&self, root: &Path, verbose: bool) {
        let snapshot = MetricsSnapshot {
            buckets: self.metrics(),
        };

        let result = (|| -> std::io::Result<()> {
            let dir = root.join(METRICS_DIR_NAME);
            fs::create_dir_all(&dir)?;
            let content = serde_json::to_string_pretty(&snapshot)
                .map_err(std::io::Error::other)?;
            fs::write(dir.join(METRICS_FILE_NAME), format!("{}\n", content))
        })();

        if let Err(err) = result
            && verbose
        {
            eprintln!("Warning: failed to persist cache metrics: {}", err);
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsSnapshot {
    buckets: Vec<BucketMetrics>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketMetrics {
    root: String,
    mode: &'static str,
    file_count: usize,
    total_size_bytes: u64,
    oldest_mtime_ms: Option<u64>,
}
