//! Error taxonomy for fetching and shaping weather data.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Invalid unit: '{0}' (expected celsius, fahrenheit or kelvin)")]
    InvalidUnit(String),

    #[error("Malformed weather payload: {0}")]
    MalformedPayload(String),

    #[error("API key not configured")]
    MissingCredential,

    #[error("Invalid API key")]
    InvalidCredential,

    #[error("City '{0}' not found")]
    CityNotFound(String),

    #[error("API error (HTTP {status}): {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Network error: {0}")]
    TransportError(#[from] reqwest::Error),
}

impl WeatherError {
    /// Single-line message shown to the user at the session boundary.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUnit(unit) => format!("Error: Invalid unit '{unit}'"),
            Self::MalformedPayload(_) => {
                "Error: The weather service returned data we could not read".to_string()
            }
            Self::MissingCredential => "Error: API key not configured. \
                 Set OPENWEATHER_API_KEY or run `weatherwise configure`."
                .to_string(),
            Self::InvalidCredential => "Error: Invalid API key".to_string(),
            Self::CityNotFound(city) => format!("Error: City '{city}' not found"),
            Self::UpstreamError { status, message } => {
                format!("Error: API error (HTTP {status}): {message}")
            }
            Self::TransportError(e) => format!("Network error: {e}"),
        }
    }

    /// Whether the failure happened below HTTP (DNS, connect, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}
