use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherError, WeatherReport};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Source of current conditions for a named city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch and normalize the current weather for `city`.
    ///
    /// One attempt per call; callers decide whether to ask again.
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}
