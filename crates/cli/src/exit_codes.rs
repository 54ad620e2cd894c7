//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                               |
//! |---------|-----------|-------------------------------------------|
//! | 0       | Universal | Success                                   |
//! | 1       | Universal | General error (unspecified)               |
//! | 2       | Universal | CLI usage error (bad args)                |
//! | 3-9     | session   | Login state and assignment                |
//! | 10-19   | config    | Settings file and environment             |
//! | 20-29   | backend   | Transport and server responses            |
//! | 30-39   | score     | Score validation and saving               |

use avalia_assign::PipelineError;
use avalia_client::ClientError;
use avalia_config::ConfigError;

use crate::CliError;

// =============================================================================
// Universal (0-2)
// =============================================================================

pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown sheet or rubric number.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Session (3-9)
// =============================================================================

/// No stored session; run `avalia login`.
pub const EXIT_NOT_LOGGED_IN: u8 = 3;

/// Loads succeeded but nothing (or not the requested group) is assigned.
pub const EXIT_NOTHING_ASSIGNED: u8 = 4;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Config file unreadable/invalid, backend URL missing, empty sheet catalog.
pub const EXIT_CONFIG: u8 = 10;

// =============================================================================
// Backend (20-29)
// =============================================================================

/// Backend unreachable (connection refused, DNS, timeout), or every sheet failed.
pub const EXIT_NETWORK: u8 = 20;

/// Backend answered with a non-2xx status.
pub const EXIT_HTTP: u8 = 21;

/// Backend answered `success: false` (wrong password, unknown sheet, ...).
pub const EXIT_API_REJECTED: u8 = 22;

/// Backend answered with something that is not the expected JSON.
pub const EXIT_PARSE: u8 = 23;

// =============================================================================
// Score (30-39)
// =============================================================================

/// At least one score is outside 1..=5.
pub const EXIT_SCORE_INVALID: u8 = 30;

/// Save accepted but the backend reported 0 updated rows.
pub const EXIT_SAVE_NO_ROWS: u8 = 31;

// =============================================================================
// Error mapping
// =============================================================================

pub fn client_exit_code(err: &ClientError) -> u8 {
    match err {
        ClientError::Network(_) => EXIT_NETWORK,
        ClientError::Http(..) => EXIT_HTTP,
        ClientError::Api(_) => EXIT_API_REJECTED,
        ClientError::Parse(_) => EXIT_PARSE,
    }
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let hint = match &err {
            ClientError::Network(_) => Some("check your connection and the configured backend URL".to_string()),
            ClientError::Parse(_) => {
                Some("the backend URL may point to a login page instead of the deployed script".to_string())
            }
            _ => None,
        };
        CliError { code: client_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::MissingApiBaseUrl => Some(format!(
                "set api_base_url in config.toml or the {} environment variable",
                avalia_config::API_BASE_URL_ENV
            )),
            _ => None,
        };
        CliError { code: EXIT_CONFIG, message: err.to_string(), hint }
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoSheetsConfigured => CliError {
                code: EXIT_CONFIG,
                message: err.to_string(),
                hint: Some("add [[sheets]] entries to config.toml or remove the empty list".into()),
            },
            PipelineError::AllSheetsFailed { .. } => CliError {
                code: EXIT_NETWORK,
                message: err.to_string(),
                hint: Some("check your connection and try again".into()),
            },
        }
    }
}
