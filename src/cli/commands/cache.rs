use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::{ShardKey, ShardStore};
use crate::ui::messages::{info, success};

/// Inspect or clear the in-process shard cache.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Cache { clear, key } = cmd {
        let store = ShardStore::open(cfg)?;

        if *clear {
            match key {
                Some(raw) => {
                    let key = ShardKey::parse(raw)?;
                    store.clear_cache_key(&key);
                    success(format!("Dropped cached shard {key}"));
                }
                None => {
                    store.clear_cache();
                    success("Dropped all cached shards");
                }
            }
        } else {
            info(format!(
                "Cached shards: {} work, {} bill",
                store.logs.cached_len(),
                store.bills.cached_len()
            ));
        }
    }

    Ok(())
}
