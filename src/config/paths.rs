//! Config file location
//!
//! `PROVIDER_NOP_CONFIG_DIR` overrides everything. Otherwise the file lives in
//! a `provider-nop` directory under the platform's config home.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "provider-nop";

/// Environment variable naming the config directory directly
pub const CONFIG_DIR_ENV: &str = "PROVIDER_NOP_CONFIG_DIR";

/// Directory holding `config.yaml`
pub fn config_dir() -> PathBuf {
    match std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => config_home().join(APP_NAME),
    }
}

/// `$XDG_CONFIG_HOME` or `~/.config` on Unix, the roaming AppData folder on Windows
fn config_home() -> PathBuf {
    #[cfg(not(windows))]
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        return PathBuf::from(xdg);
    }

    let Some(dirs) = directories::BaseDirs::new() else {
        return PathBuf::from(".config");
    };
    if cfg!(windows) {
        dirs.config_dir().to_path_buf()
    } else {
        dirs.home_dir().join(".config")
    }
}

/// Get the root configuration file path
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
