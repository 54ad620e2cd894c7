//! Logged-in evaluator, persisted between runs.
//!
//! Reads/writes `<config dir>/session.json` (0600 on Unix). A file that no
//! longer parses is treated as logged out and removed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use avalia_assign::Evaluator;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub evaluator: Evaluator,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self { path: dir.join("session.json") }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<StoredSession>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| ConfigError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding unreadable session");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, evaluator: &Evaluator) -> Result<StoredSession, ConfigError> {
        let session = StoredSession {
            evaluator: evaluator.clone(),
            saved_at: Utc::now(),
        };
        let write_err = |e: String| ConfigError::Write {
            path: self.path.clone(),
            message: e,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(&session).map_err(|e| write_err(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| write_err(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions).map_err(|e| write_err(e.to_string()))?;
        }

        Ok(session)
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, ConfigError> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).map_err(|e| ConfigError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(true)
    }
}
