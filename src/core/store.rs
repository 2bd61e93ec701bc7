//! Translation store I/O.
//!
//! The store owns the on-disk layout (`<root>/<locale>.json`), the write
//! lock, and the atomic multi-locale write protocol. Reads are lock-free
//! and tolerate missing or broken files; writes are serialized across
//! processes through an exclusive lock file and promoted via temp-file
//! rename so a reader never observes a truncated locale file.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;

use crate::core::tree::{FlatMap, flatten, to_canonical_json, unflatten};

pub const LOCK_FILE_NAME: &str = ".gloss.lock";

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Flat translations for every configured locale.
pub type FlatMapByLocale = BTreeMap<String, FlatMap>;

/// Errors from the translation store.
///
/// `LockTimeout` is the one variant callers are expected to match on: it is
/// retryable and guarantees that no partial write was promoted.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("timed out after {timeout_ms}ms waiting for translation lock at {}", path.display())]
    LockTimeout { path: PathBuf, timeout_ms: u64 },
    #[error("failed to serialize locale '{locale}'")]
    Serialize {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Path of one locale's translation file.
pub fn locale_file(dir: &Path, locale: &str) -> PathBuf {
    dir.join(format!("{}.json", locale))
}

/// Read all configured locales into flat maps.
///
/// A missing or unparseable locale file yields an empty map for that
/// locale; reads never fail and never take the lock.
pub fn read_all(dir: &Path, locales: &[String]) -> FlatMapByLocale {
    let mut out = FlatMapByLocale::new();
    for locale in locales {
        let tree = fs::read_to_string(locale_file(dir, locale))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));
        out.insert(locale.clone(), flatten(&tree));
    }
    out
}

/// Write all locales atomically under the store lock.
///
/// Every locale is first serialized to a uniquely suffixed temp file in the
/// target directory; only once the whole batch has been written is each
/// temp file renamed onto its final path. A failure before the rename phase
/// unlinks every temp file and leaves the previous locale set untouched.
pub fn write_all(dir: &Path, data: &FlatMapByLocale, lock_timeout_ms: u64) -> Result<(), StoreError> {
    fs::create_dir_all(dir)?;
    let _lock = LockGuard::acquire(dir, lock_timeout_ms)?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
    let result = stage_temp_files(dir, data, &mut staged);

    if let Err(err) = result {
        for (temp, _) in &staged {
            let _ = fs::remove_file(temp);
        }
        return Err(err);
    }

    for (index, (temp, target)) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(temp, target) {
            for (remaining, _) in &staged[index..] {
                let _ = fs::remove_file(remaining);
            }
            return Err(err.into());
        }
    }

    Ok(())
}

fn stage_temp_files(
    dir: &Path,
    data: &FlatMapByLocale,
    staged: &mut Vec<(PathBuf, PathBuf)>,
) -> Result<(), StoreError> {
    for (locale, flat) in data {
        let tree = unflatten(flat);
        let content = to_canonical_json(&tree).map_err(|source| StoreError::Serialize {
            locale: locale.clone(),
            source,
        })?;

        let temp = dir.join(format!("{}.json.tmp.{}", locale, temp_suffix()));
        fs::write(&temp, content)?;
        staged.push((temp, locale_file(dir, locale)));
    }
    Ok(())
}

fn temp_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!(
        "{}.{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// Exclusive marker file owned for the duration of one write transaction.
///
/// Released (deleted) on drop, regardless of whether the write succeeded.
struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    fn acquire(dir: &Path, timeout_ms: u64) -> Result<Self, StoreError> {
        let path = dir.join(LOCK_FILE_NAME);
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(_) => return Ok(Self { path }),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(StoreError::LockTimeout {
                            path,
                            timeout_ms,
                        });
                    }
                    thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn make_flat(pairs: &[(&str, &str)]) -> FlatMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn locales(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let mut data = FlatMapByLocale::new();
        data.insert(
            "en".to_string(),
            make_flat(&[("auth.login.title", "Welcome"), ("common.ok", "OK")]),
        );
        data.insert("nl".to_string(), make_flat(&[("common.ok", "OK")]));

        write_all(dir.path(), &data, 1_000).unwrap();

        let read = read_all(dir.path(), &locales(&["en", "nl"]));
        assert_eq!(read, data);
    }

    #[test]
    fn test_write_is_deterministic() {
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();

        // Key order that disagrees between dotted-path sort and per-level
        // sort, so canonicalization has to do real work.
        let flat = make_flat(&[("a-b.c", "1"), ("a.c", "2"), ("a.b", "3")]);

        let mut data = FlatMapByLocale::new();
        data.insert("en".to_string(), flat);

        write_all(dir_a.path(), &data, 1_000).unwrap();
        write_all(dir_b.path(), &data, 1_000).unwrap();
        write_all(dir_b.path(), &data, 1_000).unwrap();

        let bytes_a = fs::read(locale_file(dir_a.path(), "en")).unwrap();
        let bytes_b = fs::read(locale_file(dir_b.path(), "en")).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn test_written_file_is_sorted_pretty_with_newline() {
        let dir = tempdir().unwrap();
        let mut data = FlatMapByLocale::new();
        data.insert(
            "en".to_string(),
            make_flat(&[("b.z", "1"), ("b.a", "2"), ("a", "3")]),
        );

        write_all(dir.path(), &data, 1_000).unwrap();

        let content = fs::read_to_string(locale_file(dir.path(), "en")).unwrap();
        assert_eq!(
            content,
            "{\n  \"a\": \"3\",\n  \"b\": {\n    \"a\": \"2\",\n    \"z\": \"1\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_read_missing_file_yields_empty() {
        let dir = tempdir().unwrap();
        let read = read_all(dir.path(), &locales(&["en", "nl"]));
        assert_eq!(read.get("en"), Some(&FlatMap::new()));
        assert_eq!(read.get("nl"), Some(&FlatMap::new()));
    }

    #[test]
    fn test_read_unparseable_file_yields_empty() {
        let dir = tempdir().unwrap();
        fs::write(locale_file(dir.path(), "en"), "{ not json").unwrap();

        let read = read_all(dir.path(), &locales(&["en"]));
        assert_eq!(read.get("en"), Some(&FlatMap::new()));
    }

    #[test]
    fn test_read_coerces_scalar_leaves() {
        let dir = tempdir().unwrap();
        fs::write(
            locale_file(dir.path(), "en"),
            r#"{"count": 3, "on": true, "gone": null}"#,
        )
        .unwrap();

        let read = read_all(dir.path(), &locales(&["en"]));
        assert_eq!(read["en"], make_flat(&[("count", "3"), ("on", "true")]));
    }

    #[test]
    fn test_held_lock_times_out() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE_NAME), "").unwrap();

        let mut data = FlatMapByLocale::new();
        data.insert("en".to_string(), make_flat(&[("a", "1")]));

        let err = write_all(dir.path(), &data, 80).unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout { .. }));

        // Nothing was promoted and no temp files were left behind.
        assert!(!locale_file(dir.path(), "en").exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_lock_released_after_failed_acquire_holder_finishes() {
        let dir = tempdir().unwrap();
        let lock_path = dir.path().join(LOCK_FILE_NAME);
        fs::write(&lock_path, "").unwrap();

        // Simulate another process finishing its transaction shortly.
        let holder = {
            let lock_path = lock_path.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                fs::remove_file(lock_path).unwrap();
            })
        };

        let mut data = FlatMapByLocale::new();
        data.insert("en".to_string(), make_flat(&[("a", "1")]));

        write_all(dir.path(), &data, 2_000).unwrap();
        holder.join().unwrap();

        assert!(locale_file(dir.path(), "en").exists());
        assert!(!lock_path.exists(), "lock must be released after the write");
    }

    #[test]
    fn test_lock_guard_releases_on_drop() {
        let dir = tempdir().unwrap();
        {
            let _guard = LockGuard::acquire(dir.path(), 100).unwrap();
            assert!(dir.path().join(LOCK_FILE_NAME).exists());
        }
        assert!(!dir.path().join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_concurrent_writes_serialize() {
        let dir = tempdir().unwrap();
        let path = dir.path().to_path_buf();

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let path = path.clone();
                thread::spawn(move || {
                    let mut data = FlatMapByLocale::new();
                    data.insert(
                        "en".to_string(),
                        make_flat(&[("common.ok", &format!("OK-{}", i))]),
                    );
                    write_all(&path, &data, 5_000)
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap().unwrap();
        }

        // All writers completed; the surviving file is one full write.
        let read = read_all(&path, &locales(&["en"]));
        let value = read["en"].get("common.ok").unwrap();
        assert!(value.starts_with("OK-"));
        assert!(!path.join(LOCK_FILE_NAME).exists());
    }
}
