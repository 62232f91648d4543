//! Error types shared across the workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup errors. Raised only while building the session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no API key configured; set VITASIM_PROVIDER__API_KEY or GEMINI_API_KEY, \
         or add provider.apiKey to the config file"
    )]
    MissingApiKey,

    #[error("instruction text must not be empty")]
    EmptyInstruction,

    #[error("model identifier must not be empty")]
    EmptyModel,

    #[error("failed to read instruction file {path}: {source}")]
    InstructionFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// A training pair that cannot be appended to the history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("user text of a training example must not be empty")]
    EmptyUserText,

    #[error("assistant text of a training example must not be empty")]
    EmptyAssistantText,
}
