use anyhow::{Context, Result};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

use crate::session::Prompt;

const CITY_PROMPT: &str = "Enter city name (or 'quit' to exit):";
const REPORT_PROMPT: &str = "Generate HTML report?";

/// Terminal prompts backed by `inquire`.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn read_city(&mut self) -> Result<Option<String>> {
        match Text::new(CITY_PROMPT).prompt() {
            Ok(line) => Ok(Some(line)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e).context("Failed to read city name"),
        }
    }

    fn confirm_report(&mut self) -> Result<bool> {
        match Confirm::new(REPORT_PROMPT).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(e).context("Failed to read report confirmation"),
        }
    }
}

/// Plain line-based prompts for piped or redirected input.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Print `prompt` and read one line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt} ")?;
        self.out.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read from stdin")?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn read_city(&mut self) -> Result<Option<String>> {
        self.ask(CITY_PROMPT)
    }

    fn confirm_report(&mut self) -> Result<bool> {
        let answer = self.ask(&format!("\n{REPORT_PROMPT} (y/n):"))?;
        Ok(answer.is_some_and(|a| is_affirmative(&a)))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prompt for the process's stdin: interactive when it is a terminal,
/// line-based otherwise.
#[derive(Debug)]
pub enum StdinPrompt {
    Terminal(TerminalPrompt),
    Lines(LinePrompt<StdinLock<'static>, Stdout>),
}

impl StdinPrompt {
    pub fn detect() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            StdinPrompt::Terminal(TerminalPrompt)
        } else {
            tracing::debug!("stdin is not a terminal, reading plain lines");
            StdinPrompt::Lines(LinePrompt::new(stdin.lock(), io::stdout()))
        }
    }
}

impl Prompt for StdinPrompt {
    fn read_city(&mut self) -> Result<Option<String>> {
        match self {
            StdinPrompt::Terminal(p) => p.read_city(),
            StdinPrompt::Lines(p) => p.read_city(),
        }
    }

    fn confirm_report(&mut self) -> Result<bool> {
        match self {
            StdinPrompt::Terminal(p) => p.confirm_report(),
            StdinPrompt::Lines(p) => p.confirm_report(),
        }
    }
}

/// Ask for an OpenWeatherMap API key without echoing it.
pub fn read_api_key() -> Result<String> {
    let key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get a free key at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    Ok(key.trim().to_string())
}
