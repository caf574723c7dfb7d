//! Processed-file marker cache.
//!
//! Re-encoding a folder of photos that was already normalized is wasted work.
//! This module lets the pipeline skip files whose path, modification time,
//! and size haven't changed since a previous run.
//!
//! # Design
//!
//! The cache is a flat directory of `<key>.txt` marker files. Existence is
//! the only signal: a marker present for a file's current key means "already
//! processed". Marker contents (source path + wall-clock timestamp) are
//! informational for humans poking at the cache dir and are never parsed
//! back.
//!
//! ## Cache keys
//!
//! `key = sha256("{path}_{mtime}_{size}")`, hex-encoded. The digest is used
//! for change detection only — collision resistance is not a security
//! requirement here. Any change to the file's path, mtime, or size produces
//! a different key, so invalidation is implicit: the old marker is simply
//! never looked up again. Markers are not deleted.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Cache key for a file: digest of its path, mtime, and size.
///
/// Fails if the file cannot be stat'd (missing, permissions).
pub fn cache_key(path: &Path) -> io::Result<String> {
    let meta = fs::metadata(path)?;
    let mtime = meta
        .modified()?
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let identity = format!(
        "{}_{}.{:09}_{}",
        path.display(),
        mtime.as_secs(),
        mtime.subsec_nanos(),
        meta.len()
    );
    let digest = Sha256::digest(identity.as_bytes());
    Ok(format!("{:x}", digest))
}

/// Marker-file cache rooted at a single directory.
#[derive(Debug, Clone)]
pub struct MarkerCache {
    dir: PathBuf,
    enabled: bool,
}

impl MarkerCache {
    pub fn new(dir: PathBuf, enabled: bool) -> Self {
        Self { dir, enabled }
    }

    fn marker_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", key))
    }

    /// True iff caching is enabled and a marker exists for the file's
    /// current key. Stat failures are treated as a miss.
    pub fn is_cached(&self, path: &Path) -> bool {
        if !self.enabled {
            return false;
        }
        match cache_key(path) {
            Ok(key) => self.marker_path(&key).exists(),
            Err(_) => false,
        }
    }

    /// Record a file as processed. No-op when caching is disabled.
    ///
    /// Ensures the cache directory exists first, so a cache dir deleted
    /// mid-run doesn't fail the batch.
    pub fn mark(&self, path: &Path) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let key = cache_key(path)?;
        fs::create_dir_all(&self.dir)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let contents = format!("Processed: {}\nTimestamp: {}\n", path.display(), timestamp);
        fs::write(self.marker_path(&key), contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn cache_key_deterministic() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"data");

        let k1 = cache_key(&file).unwrap();
        let k2 = cache_key(&file).unwrap();
        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 64); // SHA-256 hex is 64 chars
    }

    #[test]
    fn cache_key_changes_with_size() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"version 1");
        let k1 = cache_key(&file).unwrap();

        fs::write(&file, b"version 2 is longer").unwrap();
        let k2 = cache_key(&file).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn cache_key_changes_with_mtime() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"same bytes");
        let k1 = cache_key(&file).unwrap();

        // Same length, different mtime
        std::thread::sleep(Duration::from_millis(20));
        fs::write(&file, b"same bytes").unwrap();
        let k2 = cache_key(&file).unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn cache_key_differs_per_path() {
        let tmp = TempDir::new().unwrap();
        let a = write_file(tmp.path(), "a.jpg", b"data");
        let b = write_file(tmp.path(), "b.jpg", b"data");
        assert_ne!(cache_key(&a).unwrap(), cache_key(&b).unwrap());
    }

    #[test]
    fn cache_key_missing_file_errors() {
        assert!(cache_key(Path::new("/nonexistent/x.jpg")).is_err());
    }

    #[test]
    fn mark_then_is_cached() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"data");
        let cache = MarkerCache::new(tmp.path().join("cache"), true);

        assert!(!cache.is_cached(&file));
        cache.mark(&file).unwrap();
        assert!(cache.is_cached(&file));
    }

    #[test]
    fn mark_creates_cache_dir() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"data");
        let cache_dir = tmp.path().join("deep").join("cache");
        let cache = MarkerCache::new(cache_dir.clone(), true);

        cache.mark(&file).unwrap();
        assert!(cache_dir.is_dir());
    }

    #[test]
    fn marker_contains_source_path() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"data");
        let cache_dir = tmp.path().join("cache");
        let cache = MarkerCache::new(cache_dir.clone(), true);
        cache.mark(&file).unwrap();

        let key = cache_key(&file).unwrap();
        let contents = fs::read_to_string(cache_dir.join(format!("{key}.txt"))).unwrap();
        assert!(contents.contains(&file.display().to_string()));
        assert!(contents.contains("Timestamp:"));
    }

    #[test]
    fn modified_file_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"original");
        let cache = MarkerCache::new(tmp.path().join("cache"), true);
        cache.mark(&file).unwrap();

        fs::write(&file, b"modified with different length").unwrap();
        assert!(!cache.is_cached(&file));
    }

    #[test]
    fn disabled_cache_never_hits_and_never_writes() {
        let tmp = TempDir::new().unwrap();
        let file = write_file(tmp.path(), "a.jpg", b"data");
        let cache_dir = tmp.path().join("cache");
        let cache = MarkerCache::new(cache_dir.clone(), false);

        cache.mark(&file).unwrap();
        assert!(!cache.is_cached(&file));
        assert!(!cache_dir.exists());
    }

    #[test]
    fn missing_file_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = MarkerCache::new(tmp.path().join("cache"), true);
        assert!(!cache.is_cached(Path::new("/nonexistent/x.jpg")));
    }
}
