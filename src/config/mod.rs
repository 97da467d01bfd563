use crate::errors::{AppError, AppResult};
use crate::store::cache::DEFAULT_MAX_CACHE_ENTRIES;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding `logs/`, `bills/` and `backups/`.
    pub records: String,

    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: usize,

    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

fn default_max_cache_entries() -> usize {
    DEFAULT_MAX_CACHE_ENTRIES
}

fn default_max_backups() -> usize {
    crate::store::atomic::DEFAULT_BACKUP_KEEP
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records: Self::records_dir().to_string_lossy().to_string(),
            max_cache_entries: default_max_cache_entries(),
            max_backups: default_max_backups(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("worklogger")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".worklogger")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("worklogger.conf")
    }

    /// Default records root (next to the config file)
    pub fn records_dir() -> PathBuf {
        Self::config_dir().join("records")
    }

    /// Records root as a path, with `~/` expanded.
    pub fn records_root(&self) -> PathBuf {
        if self.records.starts_with("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(self.records.trim_start_matches("~/"));
        }
        PathBuf::from(&self.records)
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            serde_yaml::from_str(&content).map_err(|_| AppError::ConfigLoad)
        } else {
            Ok(Config::default())
        }
    }

    /// Initialize configuration and the records directory layout
    pub fn init_all(custom_root: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // records root: user provided or default
        let root = if let Some(name) = custom_root {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::records_dir()
        };

        let config = Config {
            records: root.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        fs::create_dir_all(root.join("logs"))?;
        fs::create_dir_all(root.join("bills"))?;
        fs::create_dir_all(root.join("backups"))?;

        println!("✅ Records root: {:?}", root);

        Ok(root)
    }
}
