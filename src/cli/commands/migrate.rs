use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::ShardStore;
use crate::ui::messages::{info, success};
use std::path::Path;

/// Split a legacy monolithic worklog file into monthly shards.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Migrate { file } = cmd {
        let store = ShardStore::open(cfg)?;

        match store.migrate_legacy_file(Path::new(file))? {
            Some(report) => {
                success(format!(
                    "Wrote {} work shard(s) ({} entries) and {} bill shard(s) ({} bills)",
                    report.work_shards,
                    report.work_records,
                    report.bill_shards,
                    report.bill_records
                ));
            }
            None => info(format!("Nothing to migrate: {file} not found")),
        }
    }

    Ok(())
}
