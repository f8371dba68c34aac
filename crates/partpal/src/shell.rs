// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `partpal shell` command implementation.
//!
//! Launches an interactive REPL with colored prompt and readline history.
//! Plain lines are text actions; `/image <path>` uploads a component photo.
//! After every action the whole transcript is redrawn.

use std::path::Path;

use colored::Colorize;
use partpal_config::model::PartpalConfig;
use partpal_core::PartpalError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::app::{audio_store, build_session, print_transcript, read_image, use_color};

/// A parsed line of shell input.
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand<'a> {
    Text(&'a str),
    Image(&'a Path),
    Reset,
    Help,
    Quit,
    /// A slash command that is not recognized, or `/image` without a path.
    Invalid(&'a str),
    Empty,
}

/// Parses one line of input.
pub fn parse_line(line: &str) -> ShellCommand<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }
    if !trimmed.starts_with('/') {
        return ShellCommand::Text(trimmed);
    }

    let (command, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (trimmed, ""),
    };
    match command {
        "/quit" | "/exit" => ShellCommand::Quit,
        "/reset" => ShellCommand::Reset,
        "/help" => ShellCommand::Help,
        "/image" if !argument.is_empty() => ShellCommand::Image(Path::new(argument)),
        _ => ShellCommand::Invalid(trimmed),
    }
}

/// Runs the `partpal shell` interactive REPL.
pub async fn run_shell(config: PartpalConfig) -> Result<(), PartpalError> {
    let mut session = build_session(&config).await?;
    let audio = audio_store(&config);
    let name = config.session.name.as_str();
    let use_color = use_color();

    let mut rl = DefaultEditor::new()
        .map_err(|e| PartpalError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{name} shell").bold().green());
    print_help();

    let prompt = format!("{}> ", "you".cyan());
    let mut clips = Vec::new();
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        let command = parse_line(&line);
        if command != ShellCommand::Empty {
            let _ = rl.add_history_entry(line.as_str());
        }

        let result = match command {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                print_help();
                continue;
            }
            ShellCommand::Reset => {
                session.reset();
                clips.clear();
                println!("{}", "transcript cleared".dimmed());
                continue;
            }
            ShellCommand::Invalid(input) => {
                eprintln!("{}: unrecognized command {input}", "error".red());
                continue;
            }
            ShellCommand::Text(text) => session.submit_text(text).await,
            ShellCommand::Image(path) => match read_image(path).await {
                Ok(bytes) => session.submit_image(bytes).await,
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(appended) => {
                debug!(appended, state = %session.state(), "action complete");
                if use_color {
                    // Clear the screen and home the cursor before redrawing.
                    print!("\x1B[2J\x1B[H");
                }
                print_transcript(&session, &mut clips, name, &audio, use_color).await;
            }
            Err(e) => eprintln!("{}: {e}", "error".red()),
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn print_help() {
    println!(
        "Type a project idea or question. {} uploads a photo, {} clears the transcript, {} exits.\n",
        "/image <path>".yellow(),
        "/reset".yellow(),
        "/quit".yellow()
    );
}
