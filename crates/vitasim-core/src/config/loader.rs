//! Config loader — reads `~/.vitasim/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.vitasim/config.json`
//! 3. Environment variables `VITASIM_<SECTION>__<FIELD>` (override JSON)
//! 4. `GEMINI_API_KEY`, only when no key was configured by the steps above

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from `path` (or the default path) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `VITASIM_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `VITASIM_PROVIDER__API_KEY` → `provider.api_key`
/// - `VITASIM_PROVIDER__API_BASE` → `provider.api_base`
/// - `VITASIM_SIMULATOR__MODEL` → `simulator.model`
/// - `VITASIM_SIMULATOR__INSTRUCTION_FILE` → `simulator.instruction_file`
/// - `VITASIM_SIMULATOR__TEMPERATURE` → `simulator.temperature`
/// - `VITASIM_SIMULATOR__MAX_OUTPUT_TOKENS` → `simulator.max_output_tokens`
/// - `VITASIM_SIMULATOR__RESPONSE_TIMEOUT_SECS` → `simulator.response_timeout_secs`
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(val) = std::env::var("VITASIM_PROVIDER__API_KEY") {
        config.provider.api_key = val;
    }
    if let Ok(val) = std::env::var("VITASIM_PROVIDER__API_BASE") {
        config.provider.api_base = Some(val);
    }
    if !config.provider.is_configured() {
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            config.provider.api_key = val;
        }
    }

    if let Ok(val) = std::env::var("VITASIM_SIMULATOR__MODEL") {
        config.simulator.model = val;
    }
    if let Ok(val) = std::env::var("VITASIM_SIMULATOR__INSTRUCTION_FILE") {
        config.simulator.instruction_file = Some(val);
    }
    if let Ok(val) = std::env::var("VITASIM_SIMULATOR__TEMPERATURE") {
        match val.parse::<f64>() {
            Ok(t) => config.simulator.temperature = Some(t),
            Err(_) => warn!("Ignoring invalid VITASIM_SIMULATOR__TEMPERATURE={}", val),
        }
    }
    if let Ok(val) = std::env::var("VITASIM_SIMULATOR__MAX_OUTPUT_TOKENS") {
        match val.parse::<u32>() {
            Ok(n) => config.simulator.max_output_tokens = Some(n),
            Err(_) => warn!("Ignoring invalid VITASIM_SIMULATOR__MAX_OUTPUT_TOKENS={}", val),
        }
    }
    if let Ok(val) = std::env::var("VITASIM_SIMULATOR__RESPONSE_TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(n) => config.simulator.response_timeout_secs = n,
            Err(_) => warn!(
                "Ignoring invalid VITASIM_SIMULATOR__RESPONSE_TIMEOUT_SECS={}",
                val
            ),
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
