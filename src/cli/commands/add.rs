use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{RateUnit, WorkEntry};
use crate::store::ShardStore;
use crate::ui::messages::success;
use chrono::NaiveDate;

/// Append a work entry to the shard derived from its date.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        date,
        company,
        hours,
        minutes,
        double_pay,
        rate,
        unit,
    } = cmd
    {
        //
        // 1. Parse date (mandatory, ISO on the command line)
        //
        let d = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(date.to_string()))?;

        //
        // 2. Parse rate unit
        //
        let unit_final: RateUnit = unit.parse()?;

        //
        // 3. Build and store the entry
        //
        let entry = WorkEntry::new(
            d,
            company.clone(),
            *hours,
            *minutes,
            *double_pay,
            *rate,
            unit_final,
        );

        let store = ShardStore::open(cfg)?;
        let key = store.logs.append(entry)?;

        success(format!("Added work entry for {company} to shard {key}"));
    }

    Ok(())
}
