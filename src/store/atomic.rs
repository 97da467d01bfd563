//! Crash-safe shard writes: snapshot, write-to-temp, rename, verify.
//!
//! The live shard file is never visible in a half-written state. All
//! intermediate bytes go to a sibling `*.json.tmp` file that becomes the
//! shard only through the final rename.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Backups older than the newest N are pruned by `rotate_backups`.
pub const DEFAULT_BACKUP_KEEP: usize = 10;

/// Write `records` to `path` atomically.
///
/// An empty list deletes the shard file (empty ⇒ absent on disk). Otherwise
/// the current file, if any, is first copied into `backup_dir` under a
/// timestamped name; a failed backup is reported and the write proceeds,
/// backups are a safety net, not a correctness requirement.
///
/// After the rename the file is re-read and must deserialize to the written
/// record count; a mismatch is reported as a `FileOperation` error even
/// though the rename already succeeded.
pub fn write_shard<T: Serialize>(
    path: &Path,
    backup_dir: &Path,
    records: &[T],
) -> AppResult<()> {
    if records.is_empty() {
        if path.exists() {
            fs::remove_file(path)
                .map_err(|e| AppError::file_op(format!("delete {}", path.display()), e))?;
        }
        return Ok(());
    }

    if path.exists() {
        if let Err(e) = backup_file(path, backup_dir) {
            warning(format!(
                "Backup of {} failed ({e}); writing without snapshot",
                path.display()
            ));
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(records)?;
    let tmp = temp_sibling(path);

    fs::write(&tmp, json)
        .map_err(|e| AppError::file_op(format!("write temp file {}", tmp.display()), e))?;

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(AppError::file_op(
            format!("rename {} over {}", tmp.display(), path.display()),
            e,
        ));
    }

    verify_written(path, records.len())
}

/// Copy a live shard into the backup directory under
/// `<original-filename>_backup_<yyyyMMdd_HHmmss>.json`.
pub fn backup_file(path: &Path, backup_dir: &Path) -> AppResult<PathBuf> {
    fs::create_dir_all(backup_dir)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| AppError::InvalidKey(path.display().to_string()))?;

    let base = format!("{}_backup_{}", stem, Local::now().format("%Y%m%d_%H%M%S"));

    // two overwrites within one second would collide on the timestamp;
    // snapshots are immutable, so disambiguate instead of clobbering
    let mut dest = backup_dir.join(format!("{base}.json"));
    let mut n = 1;
    while dest.exists() {
        dest = backup_dir.join(format!("{base}_{n}.json"));
        n += 1;
    }

    fs::copy(path, &dest)
        .map_err(|e| AppError::file_op(format!("backup copy to {}", dest.display()), e))?;

    Ok(dest)
}

/// Delete all but the newest `keep` backup files, oldest first.
/// Returns the number of files removed.
pub fn rotate_backups(backup_dir: &Path, keep: usize) -> AppResult<usize> {
    if !backup_dir.exists() {
        return Ok(0);
    }

    let mut backups: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let mtime = entry.metadata()?.modified()?;
        backups.push((path, mtime));
    }

    // newest first
    backups.sort_by(|a, b| b.1.cmp(&a.1));

    let mut removed = 0;
    for (path, _) in backups.into_iter().skip(keep) {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warning(format!("Could not prune backup {}: {e}", path.display())),
        }
    }

    Ok(removed)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Post-rename check: the file must exist, hold more than bare brackets,
/// and decode to the count we just wrote.
fn verify_written(path: &Path, expected: usize) -> AppResult<()> {
    let meta = fs::metadata(path)
        .map_err(|e| AppError::file_op(format!("verify {}", path.display()), e))?;

    if meta.len() <= 2 {
        return Err(AppError::file_op(
            format!("verify {}: file suspiciously small", path.display()),
            std::io::Error::other("truncated shard"),
        ));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| AppError::file_op(format!("verify read {}", path.display()), e))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&content)?;

    if values.len() != expected {
        return Err(AppError::file_op(
            format!(
                "verify {}: wrote {} records, read back {}",
                path.display(),
                expected,
                values.len()
            ),
            std::io::Error::other("record count mismatch"),
        ));
    }

    Ok(())
}
