// Configuration loading

mod error;
pub mod paths;
pub mod session;
pub mod settings;

pub use error::ConfigError;
pub use paths::{config_dir, CONFIG_DIR_ENV};
pub use session::{SessionStore, StoredSession};
pub use settings::{Settings, SheetEntry, API_BASE_URL_ENV};
