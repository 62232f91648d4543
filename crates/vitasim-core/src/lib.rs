//! VitaSim core — conversation types, configuration, and shared errors.
//!
//! - [`types`]: `Role`, `Turn`, `ConversationHistory`, `SessionConfiguration`
//! - [`config`]: `~/.vitasim/config.json` schema and loader
//! - [`error`]: `ConfigError`, `HistoryError`

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{ConfigError, HistoryError};
pub use types::{
    ConversationHistory, HarmBlockThreshold, HarmCategory, Role, SafetySetting,
    SessionConfiguration, Turn,
};
