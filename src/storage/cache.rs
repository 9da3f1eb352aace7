// src/storage/cache.rs

//! File-backed cache document.
//!
//! The document is read once when the cache is opened and rewritten whole on
//! flush (write to `<path>.tmp`, then rename). With the default
//! [`FlushPolicy::Always`] every write is flushed immediately; with
//! [`FlushPolicy::Deferred`] writes are batched and the remainder is flushed
//! on [`PersistentCache::flush`] or when the cache is dropped.

use std::collections::btree_map::Entry;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{CacheConfig, FlushPolicy};
use crate::storage::{CacheDocument, Namespace, Pages, Places};

/// Durable key-value cache owned by the top-level driver.
#[derive(Debug)]
pub struct PersistentCache {
    path: PathBuf,
    document: CacheDocument,
    policy: FlushPolicy,
    pending: usize,
}

impl PersistentCache {
    /// Open the cache described by `config`.
    pub fn open(config: &CacheConfig) -> Self {
        Self::open_at(&config.path, config.flush)
    }

    /// Open the cache at `path`, starting empty if nothing usable is there.
    pub fn open_at(path: impl Into<PathBuf>, policy: FlushPolicy) -> Self {
        let path = path.into();
        let document = load(&path);
        log::debug!(
            "Opened cache {} ({} pages, {} places)",
            path.display(),
            document.pages.len(),
            document.places.len()
        );
        Self {
            path,
            document,
            policy,
            pending: 0,
        }
    }

    pub fn get<N: Namespace>(&self, key: &str) -> Option<&N::Value> {
        N::entries(&self.document).get(key)
    }

    pub fn contains<N: Namespace>(&self, key: &str) -> bool {
        N::entries(&self.document).contains_key(key)
    }

    /// Store a value under `key` unless the key is already present.
    ///
    /// Entries are never replaced. A failed flush is logged and the write
    /// stays pending, so the next [`flush`](Self::flush) or drop retries it.
    pub fn put<N: Namespace>(&mut self, key: impl Into<String>, value: N::Value) {
        match N::entries_mut(&mut self.document).entry(key.into()) {
            Entry::Occupied(entry) => {
                log::debug!(
                    "{} entry for {} already cached, keeping it",
                    N::LABEL,
                    entry.key()
                );
                return;
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
        self.pending += 1;

        let due = match self.policy {
            FlushPolicy::Always => true,
            FlushPolicy::Deferred { max_pending } => self.pending >= max_pending,
        };
        if due {
            if let Err(e) = self.flush() {
                log::warn!(
                    "Failed to flush cache to {}: {}. {} write(s) pending",
                    self.path.display(),
                    e,
                    self.pending
                );
            }
        }
    }

    /// Write pending changes to disk.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending == 0 {
            return Ok(());
        }
        self.document.updated_at = Some(Utc::now());
        save(&self.path, &self.document)?;
        log::debug!(
            "Flushed {} cache write(s) to {}",
            self.pending,
            self.path.display()
        );
        self.pending = 0;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Writes not yet on disk.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn page_count(&self) -> usize {
        self.document.pages.len()
    }

    pub fn place_count(&self) -> usize {
        self.document.places.len()
    }

    /// Time of the last flush, from this process or an earlier run.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.document.updated_at
    }

    /// Number of cached pages and place results.
    pub fn len(&self) -> usize {
        Pages::entries(&self.document).len() + Places::entries(&self.document).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for PersistentCache {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!(
                "Failed to flush cache to {} on shutdown: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Read a cache document from `path`.
///
/// A missing file yields an empty document. An unreadable or malformed file
/// also yields an empty document, after it is moved aside to
/// `<path>.corrupt` (or `<path>.corrupt.N` when earlier backups exist) so
/// the next flush cannot destroy it.
pub fn load(path: &Path) -> CacheDocument {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No cache at {}, starting empty", path.display());
            return CacheDocument::default();
        }
        Err(e) => {
            log::warn!("Cache {} is unreadable: {}", path.display(), e);
            set_aside(path);
            return CacheDocument::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(document) => document,
        Err(e) => {
            log::warn!("Cache {} is not a valid cache document: {}", path.display(), e);
            set_aside(path);
            CacheDocument::default()
        }
    }
}

/// Write a cache document to `path` atomically (write to temp, then rename).
pub fn save(path: &Path, document: &CacheDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let bytes = serde_json::to_vec(document)?;
    let tmp = sibling(path, "tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn set_aside(path: &Path) {
    let aside = backup_path(path);
    match fs::rename(path, &aside) {
        Ok(()) => log::warn!(
            "Moved unusable cache to {}, starting empty",
            aside.display()
        ),
        Err(e) => log::warn!(
            "Could not move unusable cache to {}: {}. Starting empty",
            aside.display(),
            e
        ),
    }
}

/// First of `<path>.corrupt`, `<path>.corrupt.1`, ... that does not exist.
fn backup_path(path: &Path) -> PathBuf {
    let first = sibling(path, "corrupt");
    if !first.exists() {
        return first;
    }
    let mut n = 1u32;
    loop {
        let candidate = sibling(path, &format!("corrupt.{n}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// `path` with an extra extension appended, e.g. `cache.json.tmp`.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NearbyPlaces;
    use tempfile::TempDir;

    fn sample_document() -> CacheDocument {
        let mut document = CacheDocument::default();
        document.pages.insert(
            "https://example.test/index.htm".to_string(),
            "<html><body>index</body></html>".to_string(),
        );
        document.places.insert(
            "49931".to_string(),
            NearbyPlaces::ranked(["Cafe (Restaurants): 1 Main St, Houghton"]),
        );
        document.places.insert("82190".to_string(), NearbyPlaces::new());
        document
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        let document = sample_document();

        save(&path, &document).unwrap();
        assert_eq!(load(&path), document);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.json");

        assert_eq!(load(&path), CacheDocument::default());
        assert!(!sibling(&path, "corrupt").exists());
    }

    #[test]
    fn test_load_corrupt_file_is_empty_and_set_aside() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        fs::write(&path, b"{ not json").unwrap();

        assert_eq!(load(&path), CacheDocument::default());
        assert!(!path.exists());
        assert_eq!(
            fs::read(sibling(&path, "corrupt")).unwrap(),
            b"{ not json".to_vec()
        );
    }

    #[test]
    fn test_repeated_corruption_keeps_every_backup() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");

        fs::write(&path, b"FIRST").unwrap();
        assert_eq!(load(&path), CacheDocument::default());
        fs::write(&path, b"SECOND").unwrap();
        assert_eq!(load(&path), CacheDocument::default());

        assert_eq!(fs::read(sibling(&path, "corrupt")).unwrap(), b"FIRST".to_vec());
        assert_eq!(
            fs::read(sibling(&path, "corrupt.1")).unwrap(),
            b"SECOND".to_vec()
        );
    }

    #[test]
    fn test_load_flat_legacy_layout_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        fs::write(&path, br#"{"https://example.test/": "<html></html>"}"#).unwrap();

        assert_eq!(load(&path), CacheDocument::default());
        assert!(sibling(&path, "corrupt").exists());
    }

    #[test]
    fn test_save_creates_parent_dir_and_leaves_no_temp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/cache.json");

        save(&path, &sample_document()).unwrap();
        assert!(path.exists());
        assert!(!sibling(&path, "tmp").exists());
    }

    #[test]
    fn test_put_always_flushes_each_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        let mut cache = PersistentCache::open_at(&path, FlushPolicy::Always);

        cache.put::<Pages>("https://example.test/a", "<a/>".to_string());
        assert_eq!(cache.pending(), 0);

        let on_disk = load(&path);
        assert_eq!(on_disk.pages.get("https://example.test/a").unwrap(), "<a/>");
        assert!(on_disk.updated_at.is_some());
    }

    #[test]
    fn test_put_never_replaces_existing_entry() {
        let tmp = TempDir::new().unwrap();
        let mut cache = PersistentCache::open_at(tmp.path().join("c.json"), FlushPolicy::Always);

        cache.put::<Pages>("k", "first".to_string());
        cache.put::<Pages>("k", "second".to_string());
        assert_eq!(cache.get::<Pages>("k").map(String::as_str), Some("first"));
    }

    #[test]
    fn test_namespaces_are_disjoint() {
        let tmp = TempDir::new().unwrap();
        let mut cache = PersistentCache::open_at(tmp.path().join("c.json"), FlushPolicy::Always);

        cache.put::<Places>("49931", NearbyPlaces::new());
        assert!(cache.contains::<Places>("49931"));
        assert!(!cache.contains::<Pages>("49931"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_deferred_flushes_at_threshold() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        let mut cache =
            PersistentCache::open_at(&path, FlushPolicy::Deferred { max_pending: 2 });

        cache.put::<Pages>("a", "1".to_string());
        assert_eq!(cache.pending(), 1);
        assert!(!path.exists());

        cache.put::<Pages>("b", "2".to_string());
        assert_eq!(cache.pending(), 0);
        assert_eq!(load(&path).pages.len(), 2);
    }

    #[test]
    fn test_drop_flushes_pending_writes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        {
            let mut cache =
                PersistentCache::open_at(&path, FlushPolicy::Deferred { max_pending: 100 });
            cache.put::<Places>("49931", NearbyPlaces::ranked(["x"]));
            assert!(!path.exists());
        }

        let reopened = PersistentCache::open_at(&path, FlushPolicy::Always);
        assert_eq!(reopened.place_count(), 1);
        assert!(reopened.updated_at().is_some());
    }

    #[test]
    fn test_failed_flush_keeps_write_pending() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("cache.json");
        let mut cache = PersistentCache::open_at(&path, FlushPolicy::Always);

        cache.put::<Pages>("k", "v".to_string());
        assert!(cache.contains::<Pages>("k"));
        assert_eq!(cache.pending(), 1);
        assert!(cache.flush().is_err());
        assert_eq!(cache.pending(), 1);

        fs::remove_file(&blocker).unwrap();
        cache.flush().unwrap();
        assert_eq!(cache.pending(), 0);
        assert_eq!(load(&path).pages.get("k").map(String::as_str), Some("v"));
    }
}
