//! Filter matching and the rebuild-on-demand lookup index.
//!
//! There is no secondary index on disk; `rebuild_filter_index` does a full
//! scan of every shard in both families, O(total records). Rebuilds are
//! explicitly triggered so the cost stays visible to the caller.

use crate::errors::AppResult;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

use super::{ShardRecord, ShardStore};

/// Wildcard filter value.
pub const FILTER_ALL: &str = "All";

/// "All" (or empty) matches everything; anything else requires exact
/// string equality.
pub fn is_filter_match(filter: &str, actual: &str) -> bool {
    filter.is_empty() || filter == FILTER_ALL || filter == actual
}

/// Year, month, and company/label filters ANDed against one record.
/// Month comparison uses the zero-padded two-digit form.
pub fn matches_record(
    year_filter: &str,
    month_filter: &str,
    label_filter: &str,
    date: NaiveDate,
    label: &str,
) -> bool {
    is_filter_match(year_filter, &format!("{:04}", date.year()))
        && is_filter_match(month_filter, &format!("{:02}", date.month()))
        && is_filter_match(label_filter, label)
}

/// Distinct years, months per year, and companies/labels across all shards.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilterIndex {
    pub years: Vec<String>,
    pub months_by_year: BTreeMap<String, Vec<String>>,
    pub companies: Vec<String>,
}

/// Full scan over the union of both shard families.
pub fn rebuild_filter_index(store: &ShardStore) -> AppResult<FilterIndex> {
    let mut years = BTreeSet::new();
    let mut months: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut companies = BTreeSet::new();

    scan_family(&store.logs, &mut years, &mut months, &mut companies)?;
    scan_family(&store.bills, &mut years, &mut months, &mut companies)?;

    Ok(FilterIndex {
        years: years.into_iter().collect(),
        months_by_year: months
            .into_iter()
            .map(|(y, m)| (y, m.into_iter().collect()))
            .collect(),
        companies: companies.into_iter().collect(),
    })
}

fn scan_family<T: ShardRecord>(
    cache: &super::ShardCache<T>,
    years: &mut BTreeSet<String>,
    months: &mut BTreeMap<String, BTreeSet<String>>,
    companies: &mut BTreeSet<String>,
) -> AppResult<()> {
    for key in cache.shard_keys()? {
        years.insert(key.year().to_string());
        months
            .entry(key.year().to_string())
            .or_default()
            .insert(key.month().to_string());

        for record in cache.get(&key)? {
            companies.insert(record.label().to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_and_empty_match_everything() {
        assert!(is_filter_match("All", "2024"));
        assert!(is_filter_match("", "2024"));
        assert!(is_filter_match("All", ""));
    }

    #[test]
    fn exact_match_required_otherwise() {
        assert!(is_filter_match("2024", "2024"));
        assert!(!is_filter_match("2024", "2023"));
        assert!(!is_filter_match("03", "3"));
    }

    #[test]
    fn dimensions_are_anded() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert!(matches_record("2025", "03", "Acme", d, "Acme"));
        assert!(matches_record("All", "All", "All", d, "Acme"));
        assert!(!matches_record("2025", "03", "Globex", d, "Acme"));
        assert!(!matches_record("2024", "03", "Acme", d, "Acme"));
        assert!(!matches_record("2025", "04", "Acme", d, "Acme"));
    }
}
