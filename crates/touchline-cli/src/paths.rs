//! XDG base directories and the default locations derived from them.
//!
//! Respects `XDG_CONFIG_HOME` and `XDG_DATA_HOME`, falling back to
//! `~/.config` and `~/.local/share`.

use std::path::PathBuf;

const APP_DIR: &str = "touchline";

fn config_base() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn data_base() -> Option<PathBuf> {
    std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
}

/// `$XDG_CONFIG_HOME/touchline/config.toml`
pub fn config_file() -> Option<PathBuf> {
    config_base().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// `$XDG_CONFIG_HOME/touchline/brkeys.json`
pub fn credentials_file() -> Option<PathBuf> {
    config_base().map(|d| d.join(APP_DIR).join("brkeys.json"))
}

/// `$XDG_DATA_HOME/touchline/team_snapshots`
pub fn snapshot_dir() -> Option<PathBuf> {
    data_base().map(|d| d.join(APP_DIR).join("team_snapshots"))
}
