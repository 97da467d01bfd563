//! In-process shard cache: read-through with mtime staleness detection,
//! write-through via the atomic writer, bounded by a simple
//! insertion-order-first eviction.
//!
//! The maps are Mutex-guarded so concurrent access cannot corrupt them.
//! A read-modify-write sequence spanning two calls (get, then put) is NOT
//! serialized; two concurrent logical mutations of the same key can race
//! and one can be lost. Known limitation of the current design.

use crate::errors::AppResult;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use super::paths::{self, ShardKey};
use super::{ShardRecord, atomic, migrate};

/// Default bound on cached shards per family.
pub const DEFAULT_MAX_CACHE_ENTRIES: usize = 64;

struct CacheEntry<T> {
    records: Vec<T>,
    /// Modification time of the backing file observed at fill/refresh.
    /// The entry is valid only while the file still reports this mtime.
    mtime: SystemTime,
}

struct Inner<T> {
    entries: HashMap<ShardKey, CacheEntry<T>>,
    /// Insertion order, consulted for eviction. Not an LRU.
    order: VecDeque<ShardKey>,
}

/// Cache over one shard family directory (`logs/` or `bills/`).
pub struct ShardCache<T: ShardRecord> {
    family_dir: PathBuf,
    backup_dir: PathBuf,
    max_entries: usize,
    inner: Mutex<Inner<T>>,
}

impl<T: ShardRecord> ShardCache<T> {
    pub fn new(family_dir: PathBuf, backup_dir: PathBuf, max_entries: usize) -> Self {
        Self {
            family_dir,
            backup_dir,
            max_entries: max_entries.max(1),
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn family_dir(&self) -> &Path {
        &self.family_dir
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // a poisoned lock only means another thread panicked mid-update;
        // the maps themselves are still structurally sound
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn shard_path(&self, key: &ShardKey) -> PathBuf {
        paths::shard_path(&self.family_dir, key)
    }

    /// Records for `key`. Serves the cached list while the backing file's
    /// mtime matches; otherwise reads through the format migrator. The
    /// returned Vec is owned by the caller, mutating it never touches the
    /// cached copy.
    pub fn get(&self, key: &ShardKey) -> AppResult<Vec<T>> {
        let path = self.shard_path(key);

        {
            let inner = self.lock();
            if let Some(entry) = inner.entries.get(key)
                && let Ok(meta) = fs::metadata(&path)
                && meta.modified().ok() == Some(entry.mtime)
            {
                return Ok(entry.records.clone());
            }
        }

        let records = migrate::load_with_migration::<T>(&path, &self.backup_dir)?;

        let mut inner = self.lock();
        match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                Self::insert_entry(
                    &mut inner,
                    self.max_entries,
                    key.clone(),
                    records.clone(),
                    mtime,
                );
            }
            // absent shards are not cached; the entry, if any, is dead
            Err(_) => Self::drop_entry(&mut inner, key),
        }

        Ok(records)
    }

    /// Replace the shard's contents, writing through the atomic writer and
    /// refreshing the cache entry with the post-write mtime. Takes ownership
    /// of `records`; an empty list deletes the shard file.
    pub fn put(&self, key: &ShardKey, records: Vec<T>) -> AppResult<()> {
        let path = self.shard_path(key);
        atomic::write_shard(&path, &self.backup_dir, &records)?;

        let mut inner = self.lock();
        if records.is_empty() {
            Self::drop_entry(&mut inner, key);
        } else {
            let mtime = fs::metadata(&path)?.modified()?;
            Self::insert_entry(&mut inner, self.max_entries, key.clone(), records, mtime);
        }
        Ok(())
    }

    /// Validate and append one record to the shard derived from its date.
    /// Returns the key it landed in.
    pub fn append(&self, record: T) -> AppResult<ShardKey> {
        record.validate()?;
        let key = record.shard_key();
        let mut records = self.get(&key)?;
        records.push(record);
        self.put(&key, records)?;
        Ok(key)
    }

    /// Remove the first record structurally equal to `record`.
    /// `Ok(false)` when nothing in the current shard matches.
    pub fn remove(&self, record: &T) -> AppResult<bool> {
        let key = record.shard_key();
        let mut records = self.get(&key)?;
        match records.iter().position(|r| r == record) {
            Some(pos) => {
                records.remove(pos);
                self.put(&key, records)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace `old` with `new_record`, which may land in a different shard
    /// when the date moved. `Ok(false)` when `old` no longer matches anything.
    pub fn update(&self, old: &T, new_record: T) -> AppResult<bool> {
        new_record.validate()?;
        if !self.remove(old)? {
            return Ok(false);
        }
        self.append(new_record)?;
        Ok(true)
    }

    pub fn invalidate(&self, key: &ShardKey) {
        let mut inner = self.lock();
        Self::drop_entry(&mut inner, key);
    }

    pub fn invalidate_all(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Union of on-disk shard keys and currently cached ones, sorted.
    pub fn shard_keys(&self) -> AppResult<Vec<ShardKey>> {
        let mut keys: BTreeSet<ShardKey> =
            paths::list_shard_keys(&self.family_dir)?.into_iter().collect();
        for key in self.lock().entries.keys() {
            keys.insert(key.clone());
        }
        Ok(keys.into_iter().collect())
    }

    fn insert_entry(
        inner: &mut Inner<T>,
        max_entries: usize,
        key: ShardKey,
        records: Vec<T>,
        mtime: SystemTime,
    ) {
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.records = records;
            entry.mtime = mtime;
            return;
        }

        while inner.entries.len() >= max_entries {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.entries.insert(key.clone(), CacheEntry { records, mtime });
        inner.order.push_back(key);
    }

    fn drop_entry(inner: &mut Inner<T>, key: &ShardKey) {
        inner.entries.remove(key);
        inner.order.retain(|k| k != key);
    }
}
