//! Shaping of raw OpenWeatherMap "current weather" payloads into
//! [`WeatherReport`]s.
//!
//! The client always requests `units=metric`, so `main.temp` and
//! `main.feels_like` arrive in Celsius and the absolute value is rebuilt
//! from them.

use chrono::{Local, TimeZone};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::WeatherError,
    model::WeatherReport,
    units::{KELVIN_OFFSET, TemperatureUnit},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: i64,
    pressure: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Normalize a metric payload with Celsius display strings.
pub fn normalize(payload: &Value) -> Result<WeatherReport, WeatherError> {
    normalize_with_unit(payload, TemperatureUnit::Celsius)
}

/// Normalize a metric payload, formatting temperatures in `unit`.
///
/// Fails with [`WeatherError::MalformedPayload`] on any missing key or type
/// mismatch; nothing is returned for a partially readable payload.
pub fn normalize_with_unit(
    payload: &Value,
    unit: TemperatureUnit,
) -> Result<WeatherReport, WeatherError> {
    let parsed = OwCurrentResponse::deserialize(payload)
        .map_err(|e| WeatherError::MalformedPayload(e.to_string()))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MalformedPayload("`weather` array is empty".to_string()))?;

    let temperature_kelvin = parsed.main.temp + KELVIN_OFFSET;
    let feels_like_kelvin = parsed.main.feels_like + KELVIN_OFFSET;

    Ok(WeatherReport {
        city: parsed.name,
        country: parsed.sys.country,
        temperature_display: unit.format_celsius(parsed.main.temp),
        feels_like_display: unit.format_celsius(parsed.main.feels_like),
        temperature_kelvin,
        feels_like_kelvin,
        description: weather.description,
        icon_code: weather.icon,
        humidity_percent: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
        wind_speed_mps: parsed.wind.speed,
        observed_at: local_timestamp(parsed.dt)?,
    })
}

/// Parse a response body and normalize it.
pub fn normalize_body(body: &str, unit: TemperatureUnit) -> Result<WeatherReport, WeatherError> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedPayload(format!("invalid JSON: {e}")))?;
    normalize_with_unit(&payload, unit)
}

fn local_timestamp(epoch_secs: i64) -> Result<String, WeatherError> {
    Local
        .timestamp_opt(epoch_secs, 0)
        .single()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .ok_or_else(|| {
            WeatherError::MalformedPayload(format!("`dt` out of range: {epoch_secs}"))
        })
}
