use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::WeatherError;

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Display unit for a temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Kelvin => "kelvin",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    /// Project an absolute temperature onto this unit's scale.
    pub fn from_kelvin(&self, kelvin: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => kelvin - KELVIN_OFFSET,
            TemperatureUnit::Fahrenheit => (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => kelvin,
        }
    }

    /// Project a Celsius reading onto this unit's scale.
    ///
    /// Celsius is returned untouched so metric upstream values keep their
    /// exact rounding.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
        }
    }

    /// Format an absolute temperature with one decimal and the unit suffix.
    ///
    /// `{:.1}` rounds on the exact binary value, so 0 K renders as
    /// `-273.1°C` (273.15 is stored slightly below its decimal form).
    pub fn format(&self, kelvin: f64) -> String {
        self.format_value(self.from_kelvin(kelvin))
    }

    /// Format a Celsius reading, same rounding as [`TemperatureUnit::format`].
    pub fn format_celsius(&self, celsius: f64) -> String {
        self.format_value(self.from_celsius(celsius))
    }

    fn format_value(&self, value: f64) -> String {
        format!("{value:.1}{}", self.suffix())
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = WeatherError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "kelvin" => Ok(TemperatureUnit::Kelvin),
            _ => Err(WeatherError::InvalidUnit(value.to_string())),
        }
    }
}

/// Convert a Kelvin value to the named display unit.
///
/// The unit is resolved before any arithmetic; unknown or empty names fail
/// with [`WeatherError::InvalidUnit`].
pub fn convert_temperature(kelvin: f64, unit: &str) -> Result<String, WeatherError> {
    let unit: TemperatureUnit = unit.parse()?;
    Ok(unit.format(kelvin))
}
