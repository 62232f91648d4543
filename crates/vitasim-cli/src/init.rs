//! `vitasim init` — write a default config and an example dataset.
//!
//! - Creates `~/.vitasim/config.json` with defaults (no credential)
//! - Creates `datasets/example.json` next to it

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use vitasim_core::config::{get_config_path, save_config, Config};

/// Run the init command.
pub fn run(path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🩺 VitaSim — Setup".cyan().bold());
    println!();

    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    // 1. Config. Defaults only: the API key stays in the environment.
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        save_config(&Config::default(), Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // 2. Example dataset
    let data_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let datasets_dir = data_dir.join("datasets");
    std::fs::create_dir_all(&datasets_dir)?;
    let dataset_path = datasets_dir.join("example.json");
    create_template(&dataset_path, &example_dataset()?)?;

    println!();
    println!(
        "{}",
        "  Setup complete! Export GEMINI_API_KEY, then run `vitasim chat`.".green()
    );
    println!(
        "  {}",
        format!("Try: vitasim chat --dataset {}", dataset_path.display()).dimmed()
    );
    println!();

    Ok(())
}

/// Create a file if it doesn't exist.
fn create_template(path: &Path, content: &str) -> Result<()> {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    if path.exists() {
        println!("  {} {} already exists", "✓".green(), name);
    } else {
        std::fs::write(path, content)?;
        println!("  {} created {}", "✓".green(), name);
    }
    Ok(())
}

/// Disclaimer the built-in instruction requires on every patient turn.
const DISCLAIMER: &str = "Educational simulation only, not a substitute for clinical judgment.";

/// One training pair in the shape the built-in instruction asks for.
fn example_dataset() -> Result<String> {
    let case = json!({
        "patient_id": "CARD-001",
        "age": 58,
        "sex": "M",
        "presenting_complaint": "Crushing retrosternal chest pain for 40 minutes",
        "history": {
            "onset": "Sudden, at rest, 40 minutes before arrival",
            "progression": "Constant, radiating to the left arm and jaw",
            "associated_symptoms": ["diaphoresis", "nausea", "dyspnea"],
            "past_medical_history": ["hypertension", "type 2 diabetes"],
            "medications": ["lisinopril 10 mg daily", "metformin 1 g twice daily"],
            "allergies": "none",
            "social_history": "Smoker, 30 pack-years"
        },
        "vitals": {
            "temperature_C": 36.8,
            "heart_rate_bpm": 108,
            "blood_pressure_mmHg": "150/95",
            "respiratory_rate_bpm": 22,
            "oxygen_sat_percent": 95
        },
        "physical_exam": {
            "general": "Pale, diaphoretic, anxious",
            "system_findings": ["No murmurs", "Lungs clear", "No peripheral edema"]
        },
        "ancillary_tests": [
            {
                "type": "ecg",
                "summary": "ST elevation in V1-V4",
                "key_values": { "ST elevation": "3 mm in V2-V3" }
            },
            {
                "type": "lab",
                "summary": "High-sensitivity troponin elevated",
                "key_values": { "hs-cTnT": "85 ng/L" }
            }
        ],
        "diagnostic_mcq": {
            "question_text": "What is the most likely diagnosis?",
            "options": [
                "A. Acute pericarditis",
                "B. Anterior ST-elevation myocardial infarction",
                "C. Aortic dissection",
                "D. Pulmonary embolism"
            ],
            "correct_option": "B"
        },
        "after_choice_response": null,
        "disclaimer": DISCLAIMER
    });

    let dataset = json!([
        {
            "question": "Specialty: Cardiology, Level: basic, Patient_Count: 1. Action: Generate case 1.",
            "answer": serde_json::to_string(&case)?
        }
    ]);

    Ok(serde_json::to_string_pretty(&dataset)?)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
