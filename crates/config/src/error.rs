use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    /// No platform config directory and no override
    NoConfigDir,
    Read { path: PathBuf, message: String },
    Write { path: PathBuf, message: String },
    Parse(String),
    Validation(String),
    /// Neither the settings file nor the environment name a backend
    MissingApiBaseUrl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "could not determine config directory"),
            Self::Read { path, message } => write!(f, "cannot read {}: {}", path.display(), message),
            Self::Write { path, message } => write!(f, "cannot write {}: {}", path.display(), message),
            Self::Parse(msg) => write!(f, "config parse error: {}", msg),
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
            Self::MissingApiBaseUrl => write!(f, "backend URL is not configured"),
        }
    }
}

impl std::error::Error for ConfigError {}
