//! Interactive question loop.

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sales_rag::{ChatSession, RagError, Role, SalesAssistant, Turn};
use tracing::debug;

const PROMPT: &str = "> ";

/// Printed once before the greeting.
pub fn banner() -> String {
    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Walmart Sales Data Assistant".bold()));
    text.push_str("Ask questions about weekly sales for 45 stores, covering:\n");
    for topic in [
        "weekly sales per store and date",
        "holiday weeks versus regular weeks",
        "temperature and fuel price",
        "consumer price index and unemployment rate",
    ] {
        text.push_str(&format!("  - {topic}\n"));
    }
    text.push_str("\nExample questions:\n");
    for example in [
        "What were the weekly sales for store 20 on 2012-02-10?",
        "Which store had the highest weekly sales during a holiday week?",
        "How did the fuel price change for store 20 in 2011?",
    ] {
        text.push_str(&format!("  - {}\n", example.italic()));
    }
    text.push_str(&format!("\nType {} or {} to leave.\n", "exit".bold(), "quit".bold()));
    text
}

/// Render one transcript entry. Turns recording a `failed` answer are shown
/// in red.
pub fn format_turn(turn: &Turn, failed: bool) -> String {
    match turn.role {
        Role::User => format!("{} {}", "You:".green().bold(), turn.text),
        Role::Assistant if failed => {
            format!("{} {}", "Assistant:".cyan().bold(), turn.text.red())
        }
        Role::Assistant => format!("{} {}", "Assistant:".cyan().bold(), turn.text),
    }
}

/// Steady-ticking spinner on stderr.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.set_message(message.into());
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn is_exit(line: &str) -> bool {
    matches!(line.to_ascii_lowercase().as_str(), "exit" | "quit")
}

/// Read questions until the user leaves, answering each against the index.
///
/// Failed answers are recorded in the transcript and the loop continues.
pub async fn run_console(assistant: &SalesAssistant) -> Result<ChatSession> {
    let mut session = ChatSession::new();
    let mut editor = DefaultEditor::new()?;

    println!("{}", banner());
    if let Some(greeting) = session.last() {
        println!("{}\n", format_turn(greeting, false));
    }

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit(question) {
            break;
        }
        let _ = editor.add_history_entry(question);

        let progress = spinner("Thinking...");
        let outcome = assistant.answer(&mut session, question).await;
        progress.finish_and_clear();

        let failed = match outcome {
            Ok(_) => false,
            Err(RagError::EmptyQuestion) => continue,
            Err(e) => {
                debug!(error = %e, "answer failed");
                true
            }
        };
        if let Some(turn) = session.last() {
            println!("{}\n", format_turn(turn, failed));
        }
    }

    println!("Goodbye!");
    Ok(session)
}
