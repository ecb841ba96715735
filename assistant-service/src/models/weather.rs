use serde::{Deserialize, Serialize};

/// Current conditions for one city, in metric units.
///
/// Only built when every field was present upstream; see
/// [`crate::services::weather::openweather`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
    pub description: String,
}
