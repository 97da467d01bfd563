use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{Bill, Category};
use crate::store::ShardStore;
use crate::ui::messages::success;
use chrono::NaiveDate;

/// Append an expense record to the shard derived from its date.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Bill {
        date,
        description,
        amount,
        category,
    } = cmd
    {
        let d = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidDate(date.to_string()))?;

        let cat = match category {
            Some(c) => c.parse()?,
            None => Category::Other,
        };

        let bill = Bill::new(description.clone(), *amount, d, cat);

        let store = ShardStore::open(cfg)?;
        let key = store.bills.append(bill)?;

        success(format!("Added bill '{description}' to shard {key}"));
    }

    Ok(())
}
