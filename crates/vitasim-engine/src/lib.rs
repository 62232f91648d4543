//! VitaSim engine — conversation state around a single remote chat session.
//!
//! This crate contains:
//! - **manager**: `SessionManager`, owner of the few-shot history and the chat session
//! - **reply**: structured-or-raw decoding of completion text
//! - **prompt**: the built-in simulator instruction and configuration assembly
//! - **dataset**: training pairs read from JSON files

pub mod dataset;
pub mod manager;
pub mod prompt;
pub mod reply;

pub use dataset::{load_pairs, DatasetError};
pub use manager::{DatasetReport, SessionManager, SessionStats};
pub use prompt::{build_configuration, SYSTEM_INSTRUCTION};
pub use reply::{decode, Decoded, Reply};
