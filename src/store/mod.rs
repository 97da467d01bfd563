//! The sharded record store: one JSON file per year-month key, a cache per
//! record family, atomic writes with pre-write backups, and the legacy
//! migration paths.
//!
//! Serves one interactive session at a time. The caches tolerate concurrent
//! access, but logical read-modify-write sequences are not serialized across
//! calls (see `cache`).

use crate::config::Config;
use crate::errors::AppResult;
use crate::models::{Bill, WorkEntry};
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub mod atomic;
pub mod cache;
pub mod filters;
pub mod migrate;
pub mod paths;

pub use cache::ShardCache;
pub use filters::{FilterIndex, is_filter_match, matches_record};
pub use migrate::{MigrationReport, ShardFormat};
pub use paths::ShardKey;

/// A record family that can live in monthly shards.
pub trait ShardRecord: Serialize + DeserializeOwned + Clone + PartialEq {
    /// Directory name of the family under the records root.
    const FAMILY_DIR: &'static str;
    /// Container property used by the legacy single-object schema.
    const LEGACY_FIELD: &'static str;

    fn record_date(&self) -> NaiveDate;

    /// Company or description, whatever populates the filter index.
    fn label(&self) -> &str;

    fn validate(&self) -> AppResult<()>;

    /// Hook for schema fixups applied on every load (no-op by default).
    fn normalize_legacy(&mut self) {}

    fn shard_key(&self) -> ShardKey {
        ShardKey::from_date(self.record_date())
    }
}

impl ShardRecord for WorkEntry {
    const FAMILY_DIR: &'static str = "logs";
    const LEGACY_FIELD: &'static str = "registros";

    fn record_date(&self) -> NaiveDate {
        self.date
    }

    fn label(&self) -> &str {
        &self.company
    }

    fn validate(&self) -> AppResult<()> {
        WorkEntry::validate(self)
    }
}

impl ShardRecord for Bill {
    const FAMILY_DIR: &'static str = "bills";
    const LEGACY_FIELD: &'static str = "bills";

    fn record_date(&self) -> NaiveDate {
        self.date
    }

    fn label(&self) -> &str {
        &self.description
    }

    fn validate(&self) -> AppResult<()> {
        Bill::validate(self)
    }

    fn normalize_legacy(&mut self) {
        Bill::normalize_legacy(self)
    }
}

/// Both record families under one records root, wired from a `Config` by the
/// composition root. No global state.
pub struct ShardStore {
    root: PathBuf,
    pub logs: ShardCache<WorkEntry>,
    pub bills: ShardCache<Bill>,
}

impl ShardStore {
    /// Open (and create, if needed) the directory layout under `root`:
    /// `logs/`, `bills/` and `backups/`.
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let root = cfg.records_root();
        let backup_dir = root.join("backups");

        let logs_dir = root.join(WorkEntry::FAMILY_DIR);
        let bills_dir = root.join(Bill::FAMILY_DIR);
        fs::create_dir_all(&logs_dir)?;
        fs::create_dir_all(&bills_dir)?;
        fs::create_dir_all(&backup_dir)?;

        Ok(Self {
            logs: ShardCache::new(logs_dir, backup_dir.clone(), cfg.max_cache_entries),
            bills: ShardCache::new(bills_dir, backup_dir, cfg.max_cache_entries),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    /// Union of the keys of both families, sorted.
    pub fn all_shard_keys(&self) -> AppResult<Vec<ShardKey>> {
        let mut keys: BTreeSet<ShardKey> = self.logs.shard_keys()?.into_iter().collect();
        keys.extend(self.bills.shard_keys()?);
        Ok(keys.into_iter().collect())
    }

    /// Drop every cache entry in both families. Call after anything that may
    /// have touched the files without going through the caches.
    pub fn clear_cache(&self) {
        self.logs.invalidate_all();
        self.bills.invalidate_all();
    }

    /// Drop the entry for one key in both families.
    pub fn clear_cache_key(&self, key: &ShardKey) {
        self.logs.invalidate(key);
        self.bills.invalidate(key);
    }

    /// One-time split of a legacy monolithic file into shards.
    pub fn migrate_legacy_file(&self, path: &Path) -> AppResult<Option<MigrationReport>> {
        migrate::split_monolithic(path, self)
    }

    /// Full-scan rebuild of the years/months/companies lookup index.
    pub fn rebuild_filter_index(&self) -> AppResult<FilterIndex> {
        filters::rebuild_filter_index(self)
    }

    /// Prune old pre-write snapshots, keeping the newest `keep`.
    pub fn rotate_backups(&self, keep: usize) -> AppResult<usize> {
        atomic::rotate_backups(&self.backup_dir(), keep)
    }
}
