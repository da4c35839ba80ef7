//! Self-contained HTML weather reports.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    model::{WeatherCondition, WeatherReport},
};

const STYLE: &str = include_str!("report/style.css");

const SVG_OPEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="80" height="80" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"#;

const SUN: &str = r#"<circle cx="12" cy="12" r="5"></circle>
<line x1="12" y1="1" x2="12" y2="3"></line>
<line x1="12" y1="21" x2="12" y2="23"></line>
<line x1="4.22" y1="4.22" x2="5.64" y2="5.64"></line>
<line x1="18.36" y1="18.36" x2="19.78" y2="19.78"></line>
<line x1="1" y1="12" x2="3" y2="12"></line>
<line x1="21" y1="12" x2="23" y2="12"></line>
<line x1="4.22" y1="19.78" x2="5.64" y2="18.36"></line>
<line x1="18.36" y1="5.64" x2="19.78" y2="4.22"></line>"#;

const MOON: &str = r#"<path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"></path>"#;

const CLOUD: &str = r#"<path d="M18 10h-1.26A8 8 0 1 0 9 20h9a5 5 0 0 0 0-10z"></path>"#;

const RAIN: &str = r#"<line x1="16" y1="13" x2="16" y2="21"></line>
<line x1="8" y1="13" x2="8" y2="21"></line>
<line x1="12" y1="15" x2="12" y2="23"></line>
<path d="M20 16.58A5 5 0 0 0 18 7h-1.26A8 8 0 1 0 4 15.25"></path>"#;

const SNOW: &str = r#"<path d="M20 17.58A5 5 0 0 0 18 8h-1.26A8 8 0 1 0 4 16.25"></path>
<line x1="8" y1="16" x2="8.01" y2="16"></line>
<line x1="8" y1="20" x2="8.01" y2="20"></line>
<line x1="12" y1="18" x2="12.01" y2="18"></line>
<line x1="12" y1="22" x2="12.01" y2="22"></line>
<line x1="16" y1="16" x2="16.01" y2="16"></line>
<line x1="16" y1="20" x2="16.01" y2="20"></line>"#;

const GENERIC: &str = r#"<path d="M17.5 19H9a7 7 0 1 1 6.71-9h1.79a4.5 4.5 0 1 1 0 9Z"></path>"#;

/// SVG glyph for a condition. Only `Clear` has a night variant.
pub fn weather_icon(condition: WeatherCondition, is_night: bool) -> String {
    let shapes = match (condition, is_night) {
        (WeatherCondition::Clear, true) => MOON,
        (WeatherCondition::Clear, false) => SUN,
        (WeatherCondition::Cloud, _) => CLOUD,
        (WeatherCondition::Rain, _) => RAIN,
        (WeatherCondition::Snow, _) => SNOW,
        (WeatherCondition::Other, _) => GENERIC,
    };

    format!("{SVG_OPEN}\n{shapes}\n</svg>")
}

/// Escape text for use inside HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a report as a standalone HTML document.
pub fn render_html(report: &WeatherReport) -> String {
    let icon = weather_icon(report.condition(), report.is_night());
    let city = escape_html(&report.city);
    let country = escape_html(&report.country);
    let description = escape_html(&report.description);
    let temperature = escape_html(&report.temperature_display);
    let feels_like = escape_html(&report.feels_like_display);
    let observed_at = escape_html(&report.observed_at);
    let humidity = report.humidity_percent;
    let wind = report.wind_speed_mps;
    let pressure = report.pressure_hpa;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Weather Report - {city}</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Weather Report</h1>
            <div class="location">{city}, {country}</div>
        </div>

        <div class="main-weather">
            <div class="weather-icon">
{icon}
            </div>
            <div class="temperature-container">
                <div class="temperature">{temperature}</div>
                <div class="description">{description}</div>
            </div>
        </div>

        <div class="details-grid">
            <div class="detail-card">
                <div class="label">Feels Like</div>
                <div class="value">{feels_like}</div>
            </div>

            <div class="detail-card">
                <div class="label">Humidity</div>
                <div class="value">{humidity}<span class="unit">%</span></div>
            </div>

            <div class="detail-card">
                <div class="label">Wind Speed</div>
                <div class="value">{wind}<span class="unit"> m/s</span></div>
            </div>

            <div class="detail-card">
                <div class="label">Pressure</div>
                <div class="value">{pressure}<span class="unit"> hPa</span></div>
            </div>
        </div>

        <div class="timestamp-card">
            <span class="label">Last Updated: </span>
            <span class="value">{observed_at}</span>
        </div>

        <div class="footer">
            <p>Created with <span class="brand">WeatherWise CLI Dashboard</span></p>
            <p>Data provided by OpenWeatherMap API</p>
        </div>
    </div>
</body>
</html>
"#
    )
}

/// `weather_report_{city}_{YYYYMMDD_HHMMSS}.html`, with path separators and
/// control characters in the city replaced by `_`.
pub fn report_file_name(city: &str, at: DateTime<Local>) -> String {
    let city: String = city
        .chars()
        .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c })
        .collect();

    format!("weather_report_{}_{}.html", city, at.format("%Y%m%d_%H%M%S"))
}

/// Write `document` into `dir` (created if absent) and return the file path.
pub fn save(document: &str, dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create reports directory: {}", dir.display()))?;

    let path = dir.join(file_name);
    fs::write(&path, document)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}

/// Open `path` in the default viewer. Failures are logged and ignored.
pub fn open_in_viewer(path: &Path) {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let url = format!("file://{}", target.display());

    if let Err(e) = webbrowser::open(&url) {
        tracing::warn!(path = %target.display(), error = %e, "could not open report in browser");
    }
}

/// Renders, saves and (optionally) opens HTML reports.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    open_after_write: bool,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, open_after_write: bool) -> Self {
        Self { dir: dir.into(), open_after_write }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.reports_dir.clone(), config.open_reports)
    }

    pub fn write(&self, report: &WeatherReport) -> Result<PathBuf> {
        let document = render_html(report);
        let file_name = report_file_name(&report.city, Local::now());
        let path = save(&document, &self.dir, &file_name)?;

        tracing::info!(path = %path.display(), "report written");

        if self.open_after_write {
            open_in_viewer(&path);
        }

        Ok(path)
    }
}
