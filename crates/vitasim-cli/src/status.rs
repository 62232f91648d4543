//! `vitasim status` — show configuration and credential status.
//!
//! - Shows config path, model, output hint, deadline
//! - Shows API key status and endpoint
//! - Lists the configured safety settings

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use vitasim_core::config::{get_config_path, load_config};

/// Run the status command.
pub fn run(path: Option<&Path>) -> Result<()> {
    let config = load_config(path);
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    println!();
    println!("{}", "🩺 VitaSim Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    let simulator = &config.simulator;
    println!("  {:<18} {}", "Model:".bold(), simulator.model);

    let instruction = match &simulator.instruction_file {
        Some(file) => {
            let resolved = crate::helpers::expand_tilde(file);
            if resolved.exists() {
                format!("{} {}", resolved.display(), "✓".green())
            } else {
                format!("{} {}", resolved.display(), "(not found)".red())
            }
        }
        None => "built-in".dimmed().to_string(),
    };
    println!("  {:<18} {}", "Instruction:".bold(), instruction);

    println!(
        "  {:<18} {} | temp: {} | max_tokens: {}",
        "Output:".bold(),
        simulator.response_mime_type,
        optional(simulator.temperature).dimmed(),
        optional(simulator.max_output_tokens).dimmed(),
    );

    let deadline = match simulator.response_timeout_secs {
        0 => "none".dimmed().to_string(),
        secs => format!("{secs}s"),
    };
    println!("  {:<18} {}", "Deadline:".bold(), deadline);

    // Provider
    println!();
    let key_status = if config.provider.is_configured() {
        format!("{} (key set)", "✓".green())
    } else {
        format!(
            "{} (set provider.apiKey or GEMINI_API_KEY)",
            "· not configured".dimmed()
        )
    };
    println!("  {:<18} {}", "Gemini:".bold(), key_status);
    println!(
        "  {:<18} {}",
        "Endpoint:".bold(),
        config.provider.api_base_or_default()
    );

    // Safety
    println!();
    println!("  {}", "Safety settings:".bold());
    if simulator.safety_settings.is_empty() {
        println!("    {}", "(none)".dimmed());
    }
    for setting in &simulator.safety_settings {
        println!(
            "    {:<34} {}",
            wire_name(&setting.category),
            wire_name(&setting.threshold).dimmed()
        );
    }

    println!();

    Ok(())
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "default".to_string(), |v| v.to_string())
}

/// Name of a unit enum variant as it appears in the config file.
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => "?".to_string(),
    }
}
