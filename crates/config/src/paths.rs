// Config directory resolution
// Default ~/.config/avalia, replaced wholesale by $AVALIA_CONFIG_DIR

use std::ffi::OsString;
use std::path::PathBuf;

use crate::ConfigError;

pub const CONFIG_DIR_ENV: &str = "AVALIA_CONFIG_DIR";

/// Directory holding `config.toml` and `session.json`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    config_dir_from(std::env::var_os(CONFIG_DIR_ENV))
}

pub fn config_dir_from(override_dir: Option<OsString>) -> Result<PathBuf, ConfigError> {
    match override_dir.filter(|d| !d.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => dirs::config_dir()
            .map(|d| d.join("avalia"))
            .ok_or(ConfigError::NoConfigDir),
    }
}
