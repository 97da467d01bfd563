//! Shard key parsing and path resolution. Pure functions, no I/O except
//! directory listing in `list_shard_keys`.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("valid shard key regex"));

/// A validated `YYYY-MM` partition key. The sole partition key for both
/// record families.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShardKey(String);

impl ShardKey {
    /// Parse a `YYYY-MM` string, rejecting anything that does not match the
    /// strict 4-digit-year/2-digit-month pattern.
    pub fn parse(s: &str) -> AppResult<Self> {
        if KEY_RE.is_match(s) {
            Ok(ShardKey(s.to_string()))
        } else {
            Err(AppError::InvalidKey(s.to_string()))
        }
    }

    /// Derive the key from a record's date.
    pub fn from_date(date: NaiveDate) -> Self {
        ShardKey(format!("{:04}-{:02}", date.year(), date.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Four-digit year component.
    pub fn year(&self) -> &str {
        &self.0[..4]
    }

    /// Zero-padded two-digit month component.
    pub fn month(&self) -> &str {
        &self.0[5..]
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShardKey {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ShardKey::parse(&s)
    }
}

impl From<ShardKey> for String {
    fn from(k: ShardKey) -> String {
        k.0
    }
}

/// Canonical file path of a shard within one family directory.
pub fn shard_path(family_dir: &Path, key: &ShardKey) -> PathBuf {
    family_dir.join(format!("{}.json", key))
}

/// All shard keys present on disk for one family, sorted ascending.
/// Files whose stem is not a valid key are skipped.
pub fn list_shard_keys(family_dir: &Path) -> AppResult<Vec<ShardKey>> {
    let mut keys = Vec::new();

    if !family_dir.exists() {
        return Ok(keys);
    }

    for entry in std::fs::read_dir(family_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            && let Ok(key) = ShardKey::parse(stem)
        {
            keys.push(key);
        }
    }

    keys.sort();
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strict_year_month() {
        assert!(ShardKey::parse("2025-03").is_ok());
        assert!(ShardKey::parse("1999-12").is_ok());
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["2025-3", "25-03", "2025-13", "2025-00", "2025/03", "2025-031", ""] {
            assert!(ShardKey::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn derives_key_from_date() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let key = ShardKey::from_date(d);
        assert_eq!(key.as_str(), "2025-03");
        assert_eq!(key.year(), "2025");
        assert_eq!(key.month(), "03");
    }

    #[test]
    fn shard_path_is_deterministic() {
        let key = ShardKey::parse("2024-07").unwrap();
        let p = shard_path(Path::new("/data/logs"), &key);
        assert_eq!(p, PathBuf::from("/data/logs/2024-07.json"));
    }
}
