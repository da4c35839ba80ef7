use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::Config,
    error::WeatherError,
    model::WeatherReport,
    normalize::normalize_body,
    units::TemperatureUnit,
};

use super::WeatherProvider;

/// OpenWeatherMap "current weather" client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    unit: TemperatureUnit,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            unit: TemperatureUnit::Celsius,
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        Ok(Self::new(config.api_key(), config.base_url.as_str(), config.timeout())?
            .with_unit(config.display_unit))
    }

    /// Display unit used for the report's temperature strings.
    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        if self.api_key.is_empty() {
            return Err(WeatherError::MissingCredential);
        }

        tracing::debug!(city, url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        tracing::debug!(city, status = status.as_u16(), "weather response received");

        match status {
            StatusCode::NOT_FOUND => Err(WeatherError::CityNotFound(city.to_string())),
            StatusCode::UNAUTHORIZED => Err(WeatherError::InvalidCredential),
            s if !s.is_success() => Err(WeatherError::UpstreamError {
                status: s.as_u16(),
                message: upstream_message(&body),
            }),
            _ => normalize_body(&body, self.unit).inspect_err(|e| {
                tracing::warn!(city, error = %e, "could not normalize weather payload");
            }),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.fetch_current(city).await
    }
}

/// Error body shape, e.g. `{"cod": "429", "message": "..."}`.
#[derive(Debug, Deserialize)]
struct OwErrorResponse {
    message: String,
}

fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorResponse>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london_payload() -> serde_json::Value {
        json!({
            "name": "London",
            "sys": {"country": "GB"},
            "main": {"temp": 20.0, "feels_like": 18.5, "humidity": 65, "pressure": 1013},
            "weather": [{"description": "clear sky", "icon": "01d"}],
            "wind": {"speed": 5.5},
            "dt": 1609459200
        })
    }

    fn client_for(server: &MockServer, api_key: &str) -> OpenWeatherClient {
        OpenWeatherClient::new(
            api_key,
            format!("{}/data/2.5/weather", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_sends_metric_query_and_normalizes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test_api_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test_api_key");
        let report = client.fetch("London").await.unwrap();

        assert_eq!(report.city, "London");
        assert_eq!(report.country, "GB");
        assert_eq!(report.humidity_percent, 65);
        assert_eq!(report.description, "clear sky");
        assert_eq!(report.temperature_display, "20.0°C");
    }

    #[tokio::test]
    async fn fetch_uses_configured_unit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "k").with_unit(TemperatureUnit::Kelvin);
        let report = client.fetch("London").await.unwrap();

        assert_eq!(report.temperature_display, "293.1K");
    }

    #[tokio::test]
    async fn not_found_carries_city() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "test_api_key");
        let err = client.fetch("InvalidCityXYZ").await.unwrap_err();

        assert!(matches!(err, WeatherError::CityNotFound(ref c) if c == "InvalidCityXYZ"));
    }

    #[tokio::test]
    async fn unauthorized_is_invalid_credential() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "bad_key");
        for city in ["London", "Paris"] {
            let err = client.fetch(city).await.unwrap_err();
            assert!(matches!(err, WeatherError::InvalidCredential));
        }
    }

    #[tokio::test]
    async fn other_status_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "cod": 429,
                "message": "rate limited"
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "k");
        let err = client.fetch("London").await.unwrap_err();

        match err {
            WeatherError::UpstreamError { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "rate limited");
            }
            other => panic!("expected UpstreamError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upstream_error_without_json_uses_body_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "k");
        let err = client.fetch("London").await.unwrap_err();

        assert!(matches!(
            err,
            WeatherError::UpstreamError { status: 502, ref message } if message == "bad gateway"
        ));
    }

    #[tokio::test]
    async fn malformed_success_body_propagates() {
        let mock_server = MockServer::start().await;

        let mut payload = london_payload();
        payload["weather"][0].as_object_mut().unwrap().remove("description");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "k");
        let err = client.fetch("London").await.unwrap_err();

        assert!(matches!(err, WeatherError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn missing_credential_skips_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, "");
        let err = client.fetch("London").await.unwrap_err();

        assert!(matches!(err, WeatherError::MissingCredential));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Grab a free port and release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}/data/2.5/weather");

        let client = OpenWeatherClient::new("k", url, Duration::from_secs(2)).unwrap();
        let err = client.fetch("London").await.unwrap_err();

        assert!(err.is_transport(), "expected transport error, got {err:?}");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
