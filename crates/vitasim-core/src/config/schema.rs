//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProviderConfig`, `SimulatorConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};

use crate::types::{default_safety_settings, SafetySetting, JSON_MIME_TYPE};

/// Default Gemini API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used by the simulator.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.vitasim/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub simulator: SimulatorConfig,
}

// ─────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────

/// Credential and endpoint for the generative-language API.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key. Never hard-coded; comes from the config file or the environment.
    pub api_key: String,
    /// Custom API base URL (overrides [`DEFAULT_API_BASE`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Configured base URL, or the public Gemini endpoint.
    pub fn api_base_or_default(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

// ─────────────────────────────────────────────
// Simulator
// ─────────────────────────────────────────────

/// Session settings: model, instruction source, output hint, safety, sampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulatorConfig {
    /// Model identifier, also reported as the configuration id.
    pub model: String,
    /// Optional file replacing the built-in instruction prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction_file: Option<String>,
    /// Output-format hint sent as `responseMimeType`.
    pub response_mime_type: String,
    /// Sampling temperature; the service default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Output token cap; the service default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Deadline applied by the CLI around each message. `0` disables it.
    pub response_timeout_secs: u64,
    /// Category → block threshold pairs.
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            instruction_file: None,
            response_mime_type: JSON_MIME_TYPE.to_string(),
            temperature: None,
            max_output_tokens: None,
            response_timeout_secs: 0,
            safety_settings: default_safety_settings(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
