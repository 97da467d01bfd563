//! Schema detection and the legacy-format upgrade paths.
//!
//! Two distinct migrations live here:
//! - per-shard: a shard file still wrapped in the legacy container object is
//!   rewritten in place as a bare array the first time it is loaded;
//! - whole-file: the original monolithic `worklog.json` is split into
//!   monthly shards once, then renamed to a `-migrated-backup` sibling.

use crate::errors::{AppError, AppResult};
use crate::models::{Bill, WorkEntry};
use crate::ui::messages::{success, warning};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::atomic;
use super::paths::ShardKey;
use super::{ShardRecord, ShardStore};

/// Outcome of the cheap textual probe run before any full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardFormat {
    /// No file on disk.
    Missing,
    /// Bare JSON array (current schema).
    Current,
    /// Container object carrying the legacy record property.
    Legacy,
    /// Neither shape; the file needs quarantine.
    Corrupt,
}

/// Decide the format from the first token and the presence of the legacy
/// container property, without attempting a full decode.
pub fn probe_format(path: &Path, legacy_field: &str) -> AppResult<ShardFormat> {
    if !path.exists() {
        return Ok(ShardFormat::Missing);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::file_op(format!("read {}", path.display()), e))?;
    let head = content.trim_start();

    if head.starts_with('[') {
        Ok(ShardFormat::Current)
    } else if head.starts_with('{') && content.contains(&format!("\"{}\"", legacy_field)) {
        Ok(ShardFormat::Legacy)
    } else {
        Ok(ShardFormat::Corrupt)
    }
}

/// Load a shard, transparently upgrading legacy container files in place.
///
/// Decode failures surface as `DataCorruption` carrying the original cause;
/// they are never swallowed.
pub fn load_with_migration<T: ShardRecord>(path: &Path, backup_dir: &Path) -> AppResult<Vec<T>> {
    match probe_format(path, T::LEGACY_FIELD)? {
        ShardFormat::Missing => Ok(Vec::new()),
        ShardFormat::Current => {
            let content = fs::read_to_string(path)
                .map_err(|e| AppError::file_op(format!("read {}", path.display()), e))?;
            let mut records: Vec<T> = serde_json::from_str(&content)
                .map_err(|e| corruption(path, e))?;
            for r in &mut records {
                r.normalize_legacy();
            }
            Ok(records)
        }
        ShardFormat::Legacy => {
            let content = fs::read_to_string(path)
                .map_err(|e| AppError::file_op(format!("read {}", path.display()), e))?;
            let container: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| corruption(path, e))?;
            let list = container
                .get(T::LEGACY_FIELD)
                .cloned()
                .unwrap_or(serde_json::Value::Array(Vec::new()));
            let mut records: Vec<T> =
                serde_json::from_value(list).map_err(|e| corruption(path, e))?;
            for r in &mut records {
                r.normalize_legacy();
            }

            // rewrite in place as a bare array; next load sees current format
            atomic::write_shard(path, backup_dir, &records)?;
            Ok(records)
        }
        ShardFormat::Corrupt => Err(AppError::DataCorruption {
            path: path.display().to_string(),
            message: "file is neither a record array nor a legacy container".into(),
        }),
    }
}

/// Recommended policy for `DataCorruption`: snapshot the offending file
/// untouched, then remove it so the shard reads as empty going forward.
pub fn quarantine_shard(path: &Path, backup_dir: &Path) -> AppResult<()> {
    if !path.exists() {
        return Ok(());
    }
    let dest = atomic::backup_file(path, backup_dir)?;
    fs::remove_file(path)
        .map_err(|e| AppError::file_op(format!("quarantine {}", path.display()), e))?;
    warning(format!(
        "Quarantined corrupt shard {} → {}",
        path.display(),
        dest.display()
    ));
    Ok(())
}

/// Shape of the original single-file schema.
#[derive(Debug, Deserialize)]
struct LegacyWorklog {
    #[serde(default)]
    registros: Vec<WorkEntry>,
    #[serde(default)]
    bills: BTreeMap<String, Vec<Bill>>,
}

/// What the whole-file splitter did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub work_shards: usize,
    pub bill_shards: usize,
    pub work_records: usize,
    pub bill_records: usize,
}

/// One-time upgrade: split a legacy monolithic file into monthly shards and
/// retire the original under a `-migrated-backup` name.
///
/// Returns `Ok(None)` when the file is absent, which makes a second run a
/// no-op (the first run renamed it away).
pub fn split_monolithic(path: &Path, store: &ShardStore) -> AppResult<Option<MigrationReport>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::file_op(format!("read {}", path.display()), e))?;
    let legacy: LegacyWorklog =
        serde_json::from_str(&content).map_err(|e| corruption(path, e))?;

    let mut report = MigrationReport::default();

    let mut by_key: BTreeMap<ShardKey, Vec<WorkEntry>> = BTreeMap::new();
    for entry in legacy.registros {
        by_key.entry(entry.shard_key()).or_default().push(entry);
    }
    for (key, entries) in by_key {
        report.work_records += entries.len();
        report.work_shards += 1;
        store.logs.put(&key, entries)?;
    }

    for (raw_key, mut bills) in legacy.bills {
        let key = ShardKey::parse(&raw_key)?;
        // empty groups produce no shard file and must not inflate the report
        if bills.is_empty() {
            continue;
        }
        for b in &mut bills {
            b.normalize_legacy();
        }
        report.bill_records += bills.len();
        report.bill_shards += 1;
        store.bills.put(&key, bills)?;
    }

    retire_monolith(path)?;
    success(format!(
        "Migrated {} work entries and {} bills from {}",
        report.work_records,
        report.bill_records,
        path.display()
    ));

    Ok(Some(report))
}

/// Move (not copy) the consumed monolith to `<stem>-migrated-backup.json`.
fn retire_monolith(path: &Path) -> AppResult<()> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AppError::Migration(format!("unusable path {}", path.display())))?;
    let dest = path.with_file_name(format!("{stem}-migrated-backup.json"));

    // rename first, fall back to copy + remove across filesystems
    if fs::rename(path, &dest).is_err() {
        fs::copy(path, &dest)
            .map_err(|e| AppError::file_op(format!("retire {}", path.display()), e))?;
        fs::remove_file(path)
            .map_err(|e| AppError::file_op(format!("retire {}", path.display()), e))?;
    }
    Ok(())
}

fn corruption(path: &Path, cause: serde_json::Error) -> AppError {
    AppError::DataCorruption {
        path: path.display().to_string(),
        message: cause.to_string(),
    }
}
