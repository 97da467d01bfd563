use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::ShardStore;
use crate::ui::messages::{info, success};

/// Prune pre-write backup snapshots.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup { rotate, keep } = cmd {
        if !*rotate {
            info("Nothing to do. Use --rotate to prune old snapshots.");
            return Ok(());
        }

        let store = ShardStore::open(cfg)?;
        let keep = keep.unwrap_or(cfg.max_backups);
        let removed = store.rotate_backups(keep)?;

        success(format!(
            "Backup rotation done: kept the newest {keep}, removed {removed}"
        ));
    }

    Ok(())
}
