//! OpenWeatherMap current-weather client.

use super::{WeatherError, WeatherProvider};
use crate::models::WeatherSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const OPEN_WEATHER_BASE_URL: &str = "http://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

pub struct OpenWeatherClient {
    config: OpenWeatherConfig,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new(config: OpenWeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WeatherError::Network(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/data/2.5/weather",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        tracing::debug!(city = %city, "Querying weather service");

        let response = self
            .client
            .get(self.url())
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);

            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let report: WeatherReport = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.without_url().to_string()))?;

        WeatherSnapshot::try_from(report)
    }
}

// ============================================================================
// OpenWeatherMap Response Types
// ============================================================================

/// Raw `/data/2.5/weather` body. Every field is optional here so that a
/// missing one is reported by name instead of as a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<MainReadings>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl TryFrom<WeatherReport> for WeatherSnapshot {
    type Error = WeatherError;

    fn try_from(report: WeatherReport) -> Result<Self, Self::Error> {
        let city = report.name.ok_or(WeatherError::MissingField("name"))?;
        let main = report.main.ok_or(WeatherError::MissingField("main"))?;
        let temperature_celsius = main.temp.ok_or(WeatherError::MissingField("main.temp"))?;
        let feels_like_celsius = main
            .feels_like
            .ok_or(WeatherError::MissingField("main.feels_like"))?;
        let description = report
            .weather
            .into_iter()
            .next()
            .and_then(|c| c.description)
            .ok_or(WeatherError::MissingField("weather[0].description"))?;

        Ok(WeatherSnapshot {
            city,
            temperature_celsius,
            feels_like_celsius,
            description,
        })
    }
}
