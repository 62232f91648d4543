//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing. Line history is kept in
//! memory only; nothing from a session is written to disk.

use std::time::Duration;

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::{debug, warn};

use vitasim_engine::{Reply, SessionManager};

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["quit", "exit", "/quit", "/exit", ":q"];

/// Ends training-pair entry (case-insensitive).
const TRAIN_SENTINEL: &str = "done";

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Empty,
    Quit,
    Train,
    Clear,
    Stats,
    Message(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let lower = trimmed.to_lowercase();
    if EXIT_COMMANDS.contains(&lower.as_str()) {
        return Command::Quit;
    }
    match lower.as_str() {
        "train" => Command::Train,
        "clear" => Command::Clear,
        "stats" => Command::Stats,
        _ => Command::Message(trimmed),
    }
}

/// Run the interactive REPL loop until `quit`, Ctrl-C or Ctrl-D.
pub async fn run(mut manager: SessionManager, deadline: Option<Duration>) -> Result<()> {
    helpers::print_banner();

    let mut editor = create_editor()?;

    loop {
        let input = match editor.readline("💬 You: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let command = parse_command(&input);
        if command != Command::Empty {
            let _ = editor.add_history_entry(input.trim());
        }

        match command {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Clear => {
                manager.clear_history();
                helpers::print_notice("🗑️  Conversation history and chat session cleared.");
            }
            Command::Stats => helpers::print_stats(&manager.stats()),
            Command::Train => match read_training_pairs(&mut editor)? {
                Some(pairs) if !pairs.is_empty() => {
                    let report = manager.load_dataset(pairs);
                    helpers::print_dataset_report(&report);
                }
                Some(_) => helpers::print_notice("No training examples entered."),
                None => helpers::print_notice("Training cancelled."),
            },
            Command::Message(text) => {
                debug!(input = text, "processing input");
                helpers::print_thinking();
                let outcome = exchange(&mut manager, text, deadline).await;
                helpers::clear_thinking();
                helpers::print_outcome(&outcome, deadline);
            }
        }
    }

    println!("\nGoodbye! 👋");
    Ok(())
}

/// Send one message, racing it against `deadline` when set.
///
/// `None` means the deadline expired; the pending call is dropped and its
/// result discarded, leaving the manager's history as it was.
pub async fn exchange(
    manager: &mut SessionManager,
    text: &str,
    deadline: Option<Duration>,
) -> Option<Reply> {
    match deadline {
        Some(limit) => match tokio::time::timeout(limit, manager.send_reply(text)).await {
            Ok(reply) => Some(reply),
            Err(_) => {
                warn!(timeout_secs = limit.as_secs(), "No response before deadline");
                None
            }
        },
        None => Some(manager.send_reply(text).await),
    }
}

/// Collect question/answer pairs until the sentinel.
///
/// A sentinel on the answer prompt drops the pending question. Ctrl-C or
/// Ctrl-D cancels the whole entry and returns `None`.
fn read_training_pairs(
    editor: &mut Editor<(), DefaultHistory>,
) -> Result<Option<Vec<(String, String)>>> {
    helpers::print_notice("🎓 Training mode: enter Q&A pairs, type 'done' to finish.");

    let mut pairs = Vec::new();
    loop {
        let Some(question) = read_training_line(editor, "Question: ")? else {
            return Ok(None);
        };
        if is_sentinel(&question) {
            break;
        }

        let Some(answer) = read_training_line(editor, "Answer: ")? else {
            return Ok(None);
        };
        if is_sentinel(&answer) {
            break;
        }

        pairs.push((question, answer));
    }

    Ok(Some(pairs))
}

fn read_training_line(
    editor: &mut Editor<(), DefaultHistory>,
    prompt: &str,
) -> Result<Option<String>> {
    match editor.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn is_sentinel(line: &str) -> bool {
    line.eq_ignore_ascii_case(TRAIN_SENTINEL)
}

/// Create a rustyline editor with in-memory history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;
    editor.set_auto_add_history(false);
    Ok(editor)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
