#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;
use worklogger::config::Config;

pub fn wl() -> Command {
    cargo_bin_cmd!("worklogger")
}

/// Create a unique records root inside the system temp dir and remove any
/// leftovers from previous runs
pub fn setup_test_root(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_worklogger", name));
    let root = path.to_string_lossy().to_string();
    fs::remove_dir_all(&root).ok();
    root
}

/// Config pointing at a test root, never touching the user's home
pub fn test_config(root: &str) -> Config {
    Config {
        records: root.to_string(),
        max_cache_entries: 64,
        max_backups: 10,
    }
}

/// Same, with a custom cache bound
pub fn test_config_with_cache(root: &str, max_cache_entries: usize) -> Config {
    Config {
        records: root.to_string(),
        max_cache_entries,
        max_backups: 10,
    }
}

/// Seed a root with a couple of work entries via the CLI
pub fn init_root_with_data(root: &str) {
    wl()
        .args([
            "--root", root, "--test", "add", "2025-09-01", "Acme", "--hours", "8", "--rate", "20",
        ])
        .assert()
        .success();

    wl()
        .args([
            "--root", root, "--test", "add", "2025-09-15", "Globex", "--hours", "6", "--rate",
            "25",
        ])
        .assert()
        .success();
}
