use anyhow::{Result, anyhow};
use rustyline::error::ReadlineError;
use std::io::{self, IsTerminal};

use crate::error::{PipelineError, PipelineResult};

pub const APPLY: &str = "Apply";
pub const DONT_APPLY: &str = "Don't Apply";
pub const CONFIRMATION_LABEL: &str = "Would you like to apply this? [Apply/Don't Apply]";

/// Single-choice selection on some console. Returns the chosen option label.
pub trait ConfirmationPrompter {
    fn select(&mut self, label: &str, options: &[&str]) -> Result<String>;
}

pub fn confirm(
    require_confirmation: bool,
    prompter: &mut dyn ConfirmationPrompter,
) -> PipelineResult<bool> {
    if !require_confirmation {
        return Ok(true);
    }
    let choice = prompter
        .select(CONFIRMATION_LABEL, &[APPLY, DONT_APPLY])
        .map_err(|err| PipelineError::Confirmation(err.to_string()))?;
    tracing::debug!(choice = %choice, "confirmation answered");
    Ok(choice == APPLY)
}

/// Reads the selection from the controlling terminal. The line editor is only
/// opened on first use so runs without confirmation never touch the terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    editor: Option<rustyline::DefaultEditor>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    fn editor(&mut self) -> Result<&mut rustyline::DefaultEditor> {
        if self.editor.is_none() {
            if !io::stdin().is_terminal() {
                return Err(anyhow!("an interactive terminal is required"));
            }
            self.editor = Some(rustyline::DefaultEditor::new()?);
        }
        self.editor
            .as_mut()
            .ok_or_else(|| anyhow!("line editor unavailable"))
    }
}

impl ConfirmationPrompter for TerminalPrompter {
    fn select(&mut self, label: &str, options: &[&str]) -> Result<String> {
        let editor = self.editor()?;
        println!("? {}", label.trim());
        for (idx, option) in options.iter().enumerate() {
            println!("  {}) {}", idx + 1, option);
        }
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if let Some(idx) = parse_selection(&line, options) {
                        return Ok(options[idx].to_string());
                    }
                    eprintln!("please choose 1-{} or type one of the options", options.len());
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    return Err(anyhow!("confirmation aborted"));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn parse_selection(raw: &str, options: &[&str]) -> Option<usize> {
    let answer = normalize_option(raw);
    if answer.is_empty() {
        return None;
    }
    if let Ok(number) = answer.parse::<usize>() {
        return (1..=options.len()).contains(&number).then(|| number - 1);
    }
    options
        .iter()
        .position(|option| normalize_option(option) == answer)
}

fn normalize_option(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|ch| *ch != '\'' && *ch != '\u{2019}')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
