//! Shared CLI helpers — path expansion, reply printing, banner.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;

use vitasim_engine::prompt::START_HINT;
use vitasim_engine::{DatasetReport, Reply, SessionStats};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print the result of one exchange. `None` means the deadline expired.
pub fn print_outcome(outcome: &Option<Reply>, deadline: Option<Duration>) {
    println!();
    match outcome {
        Some(reply) if reply.is_failure() => {
            eprintln!("{}", format!("❌ {reply}").red());
        }
        Some(reply) => {
            println!("{}", "🤖 AI:".cyan().bold());
            println!("{reply}");
        }
        None => {
            let secs = deadline.map_or(0, |d| d.as_secs());
            eprintln!(
                "{}",
                format!("❌ Error: no response within {secs}s; the reply was discarded.").red()
            );
        }
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    let rule = "=".repeat(50);
    println!();
    println!("{rule}");
    println!(
        "{}  v{}",
        "🩺 VitaSim Clinical Reasoning Engine".cyan().bold(),
        version.dimmed()
    );
    println!("{rule}");
    println!("Commands: {}", "train, clear, stats, quit".bold());
    println!("To start the simulation, send a structured command such as:");
    println!("   {}", START_HINT.dimmed());
    println!("{}", "-".repeat(50));
}

/// Print a `stats` snapshot.
pub fn print_stats(stats: &SessionStats) {
    println!();
    println!("{}", "📊 Training Statistics".cyan().bold());
    println!("  {:<22} {}", "Model:".bold(), stats.configuration_id);
    println!("  {:<22} {}", "Training exchanges:".bold(), stats.exchanges);
    println!(
        "  {:<22} {}",
        "System instruction:".bold(),
        stats.instruction_preview.dimmed()
    );
    match (stats.session_generation, stats.session_created_at) {
        (Some(generation), Some(created_at)) => println!(
            "  {:<22} #{} since {}",
            "Chat session:".bold(),
            generation,
            created_at.format("%H:%M:%S UTC")
        ),
        _ => println!(
            "  {:<22} {}",
            "Chat session:".bold(),
            "(rebuilt on next message)".dimmed()
        ),
    }
    println!();
}

/// Print the outcome of loading training pairs.
pub fn print_dataset_report(report: &DatasetReport) {
    println!(
        "{} {} example(s) loaded",
        "🎯".green(),
        report.loaded.to_string().green().bold()
    );
    if report.skipped > 0 {
        println!(
            "{} {} example(s) skipped (empty question or answer)",
            "⚠".yellow(),
            report.skipped.to_string().yellow().bold()
        );
    }
}

/// Print a short status line.
pub fn print_notice(message: &str) {
    println!("{}", message.dimmed());
}

/// Print a "thinking" placeholder while waiting on the remote.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_home() {
        let result = expand_tilde("~/datasets/cardio.json");
        assert!(result.ends_with("datasets/cardio.json"));
        assert!(!result.starts_with("~"));
    }

    #[test]
    fn expand_tilde_no_tilde() {
        let result = expand_tilde("/absolute/path.json");
        assert_eq!(result, PathBuf::from("/absolute/path.json"));
    }

    #[test]
    fn expand_tilde_relative() {
        let result = expand_tilde("relative/path.json");
        assert_eq!(result, PathBuf::from("relative/path.json"));
    }
}
