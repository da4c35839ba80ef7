//! Interactive read-validate-fetch-render loop.

use anyhow::Result;
use std::io::Write;
use weatherwise_core::{ReportWriter, WeatherProvider, WeatherReport, is_valid_city_name};

use crate::console;

const INVALID_CITY_MESSAGE: &str =
    "❌ Error: Invalid city name. Please use only letters, spaces, hyphens, and apostrophes.";

/// Source of user input for the session.
pub trait Prompt {
    /// Next city name, or `None` when input is exhausted or cancelled.
    fn read_city(&mut self) -> Result<Option<String>>;

    /// Whether the user wants an HTML report for the last lookup.
    fn confirm_report(&mut self) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AwaitingInput,
    Validating(String),
    Fetching(String),
    Rendered(WeatherReport),
    Terminated,
}

pub struct Session<'a, P: ?Sized, I, W> {
    provider: &'a P,
    reports: &'a ReportWriter,
    input: I,
    out: W,
}

impl<'a, P, I, W> Session<'a, P, I, W>
where
    P: WeatherProvider + ?Sized,
    I: Prompt,
    W: Write,
{
    pub fn new(provider: &'a P, reports: &'a ReportWriter, input: I, out: W) -> Self {
        Self { provider, reports, input, out }
    }

    /// Drive the loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{}", console::banner())?;

        let mut state = SessionState::AwaitingInput;
        while state != SessionState::Terminated {
            state = self.step(state).await?;
        }

        writeln!(self.out, "\nThank you for using WeatherWise! Goodbye! 👋")?;
        Ok(())
    }

    /// Perform one transition.
    pub async fn step(&mut self, state: SessionState) -> Result<SessionState> {
        let next = match state {
            SessionState::AwaitingInput => match self.input.read_city() {
                Ok(None) => SessionState::Terminated,
                Err(e) => {
                    tracing::warn!(error = %format!("{e:#}"), "could not read input, ending session");
                    SessionState::Terminated
                }
                Ok(Some(line)) => {
                    let city = line.trim();
                    if city.eq_ignore_ascii_case("quit") {
                        SessionState::Terminated
                    } else {
                        SessionState::Validating(city.to_string())
                    }
                }
            },
            SessionState::Validating(city) => {
                if is_valid_city_name(&city) {
                    SessionState::Fetching(city)
                } else {
                    writeln!(self.out, "{INVALID_CITY_MESSAGE}\n")?;
                    SessionState::AwaitingInput
                }
            }
            SessionState::Fetching(city) => match self.provider.fetch(&city).await {
                Ok(report) => SessionState::Rendered(report),
                Err(e) => {
                    if e.is_transport() {
                        tracing::warn!(city = %city, error = %e, "weather service unreachable");
                    } else {
                        tracing::info!(city = %city, error = %e, "lookup failed");
                    }
                    writeln!(self.out, "❌ {}\n", e.user_message())?;
                    SessionState::AwaitingInput
                }
            },
            SessionState::Rendered(report) => {
                write!(self.out, "{}", console::render_console(&report))?;
                self.out.flush()?;

                let wants_report = self.input.confirm_report().unwrap_or_else(|e| {
                    tracing::warn!(error = %format!("{e:#}"), "could not read report answer");
                    false
                });

                if wants_report {
                    match self.reports.write(&report) {
                        Ok(path) => writeln!(self.out, "✅ Report generated: {}", path.display())?,
                        Err(e) => writeln!(self.out, "❌ Error: could not write report: {e:#}")?,
                    }
                }

                writeln!(self.out)?;
                SessionState::AwaitingInput
            }
            SessionState::Terminated => SessionState::Terminated,
        };

        Ok(next)
    }
}
