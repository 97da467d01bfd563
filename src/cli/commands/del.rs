use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::store::{ShardKey, ShardStore};
use crate::ui::messages::{info, success};

/// Delete one record by shard key and position.
///
/// The store identifies records by structural equality, so the handler loads
/// the shard, picks the record at the given position and asks the store to
/// remove the first match.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { key, index, bills } = cmd {
        let key = ShardKey::parse(key)?;
        let store = ShardStore::open(cfg)?;

        let (removed, remaining) = if *bills {
            let records = store.bills.get(&key)?;
            let target = records.get(*index).cloned().ok_or_else(|| {
                AppError::NotFound(format!("no bill at index {index} in shard {key}"))
            })?;
            (store.bills.remove(&target)?, records.len() - 1)
        } else {
            let records = store.logs.get(&key)?;
            let target = records.get(*index).cloned().ok_or_else(|| {
                AppError::NotFound(format!("no work entry at index {index} in shard {key}"))
            })?;
            (store.logs.remove(&target)?, records.len() - 1)
        };

        if !removed {
            return Err(AppError::NotFound(format!(
                "record at index {index} vanished from shard {key}"
            )));
        }

        success(format!("Removed record {index} from shard {key}"));
        if remaining == 0 {
            info(format!("Shard {key} is now empty; its file was deleted"));
        }
    }

    Ok(())
}
