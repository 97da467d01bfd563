use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::ShardStore;
use crate::ui::messages::info;

/// Rebuild the lookup index by full scan and print it.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Filters = cmd {
        let store = ShardStore::open(cfg)?;
        let index = store.rebuild_filter_index()?;

        info(format!("Years:     {}", index.years.join(", ")));
        for (year, months) in &index.months_by_year {
            println!("  {year}: {}", months.join(", "));
        }
        info(format!("Companies: {}", index.companies.join(", ")));
    }

    Ok(())
}
