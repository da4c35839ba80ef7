use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::io;
use weatherwise_core::{
    Config, OpenWeatherClient, ReportWriter, TemperatureUnit, WeatherProvider, is_valid_city_name,
};

use crate::{console, prompt, session::Session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherwise", version, about = "WeatherWise CLI dashboard")]
pub struct Cli {
    /// Display unit for temperatures: celsius, fahrenheit or kelvin.
    #[arg(long, global = true)]
    pub unit: Option<TemperatureUnit>,

    /// Without a subcommand, start the interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an OpenWeatherMap API key in the config file.
    Configure,

    /// Show current weather for a single city and exit.
    Show {
        /// City name, e.g. "London" or "New York".
        city: String,

        /// Also write an HTML report.
        #[arg(long)]
        report: bool,

        /// Print the normalized report as JSON instead of the console view.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city, report, json }) => {
                let config = load_config(self.unit)?;
                show(&config, &city, report, json).await
            }
            None => {
                let config = load_config(self.unit)?;
                interactive(&config).await
            }
        }
    }
}

fn load_config(unit: Option<TemperatureUnit>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(unit) = unit {
        config.display_unit = unit;
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    // File only: environment overrides must not end up persisted.
    let mut config = Config::load_file()?;

    let key = prompt::read_api_key()?;
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(key);
    let path = config.save()?;
    println!("Saved API key to {}", path.display());

    Ok(())
}

async fn show(config: &Config, city: &str, report: bool, json: bool) -> anyhow::Result<()> {
    let city = city.trim();
    if !is_valid_city_name(city) {
        bail!("Invalid city name '{city}'. Please use only letters, spaces, hyphens, and apostrophes.");
    }

    let client = OpenWeatherClient::from_config(config)?;
    let weather = client.fetch(city).await?;

    if json {
        let out = serde_json::to_string_pretty(&weather).context("Failed to serialize report")?;
        println!("{out}");
    } else {
        print!("{}", console::render_console(&weather));
    }

    if report {
        let path = ReportWriter::from_config(config).write(&weather)?;
        println!("Report generated: {}", path.display());
    }

    Ok(())
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let client = OpenWeatherClient::from_config(config)?;
    let reports = ReportWriter::from_config(config);

    Session::new(&client, &reports, prompt::StdinPrompt::detect(), io::stdout()).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["weatherwise"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.unit.is_none());
    }

    #[test]
    fn show_parses_flags_and_unit() {
        let cli = Cli::try_parse_from([
            "weatherwise",
            "show",
            "New York",
            "--report",
            "--unit",
            "fahrenheit",
        ])
        .unwrap();

        assert_eq!(cli.unit, Some(TemperatureUnit::Fahrenheit));
        match cli.command {
            Some(Command::Show { city, report, json }) => {
                assert_eq!(city, "New York");
                assert!(report);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = Cli::try_parse_from(["weatherwise", "--unit", "rankine"]).unwrap_err();
        assert!(err.to_string().contains("rankine"));
    }

    #[tokio::test]
    async fn show_rejects_invalid_city_before_fetching() {
        let err = show(&Config::default(), "London123", false, false).await.unwrap_err();
        assert!(err.to_string().contains("Invalid city name"));
    }

    #[tokio::test]
    async fn show_without_key_reports_missing_credential() {
        let err = show(&Config::default(), "London", false, false).await.unwrap_err();
        assert!(err.to_string().contains("API key not configured"));
    }
}
