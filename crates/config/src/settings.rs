// Client settings
// Loaded from <config dir>/config.toml, every field optional

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use avalia_assign::{default_catalog, SheetSpec};

use crate::ConfigError;

pub const API_BASE_URL_ENV: &str = "AVALIA_API_BASE_URL";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One `[[sheets]]` entry. `display_name` defaults to `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend endpoint (the deployed spreadsheet script URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    pub timeout_secs: u64,

    /// Sheet catalog override. Absent = built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<SheetEntry>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sheets: None,
        }
    }
}

impl Settings {
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join("config.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be at least 1".into()));
        }

        if let Some(url) = &self.api_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "api_base_url must be an http(s) URL, got '{}'",
                    url
                )));
            }
        }

        let mut seen = HashSet::new();
        for entry in self.sheets.iter().flatten() {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Validation("sheet name cannot be empty".into()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "sheet '{}' is listed more than once",
                    entry.name
                )));
            }
        }

        Ok(())
    }

    /// Load `config.toml` from `dir`. A missing file yields defaults.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::config_path(dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Sheets to load, in display order.
    pub fn sheet_catalog(&self) -> Vec<SheetSpec> {
        match &self.sheets {
            None => default_catalog(),
            Some(entries) => entries
                .iter()
                .map(|e| {
                    let display = e.display_name.clone().unwrap_or_else(|| e.name.clone());
                    SheetSpec::new(e.name.clone(), display)
                })
                .collect(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backend URL: `env_override` (from `AVALIA_API_BASE_URL`) first, then the file.
    pub fn effective_api_base_url(&self, env_override: Option<String>) -> Result<String, ConfigError> {
        env_override
            .filter(|u| !u.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .map(|u| u.trim().to_string())
            .ok_or(ConfigError::MissingApiBaseUrl)
    }

    /// Same, reading the override from the process environment.
    pub fn api_base_url(&self) -> Result<String, ConfigError> {
        self.effective_api_base_url(std::env::var(API_BASE_URL_ENV).ok())
    }
}
