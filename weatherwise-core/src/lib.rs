//! Core library for the `weatherwise` CLI.
//!
//! This crate defines:
//! - Temperature units and conversion
//! - City name validation
//! - Normalization of OpenWeatherMap payloads into [`WeatherReport`]s
//! - The [`WeatherProvider`] abstraction and its OpenWeatherMap client
//! - Configuration & credentials handling
//! - HTML report rendering and persistence
//!
//! It is used by `weatherwise-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod report;
pub mod units;
pub mod validate;

pub use config::Config;
pub use error::WeatherError;
pub use model::{WeatherCondition, WeatherReport};
pub use normalize::{normalize, normalize_with_unit};
pub use provider::{OpenWeatherClient, WeatherProvider};
pub use report::{ReportWriter, render_html};
pub use units::{TemperatureUnit, convert_temperature};
pub use validate::is_valid_city_name;
