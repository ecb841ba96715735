//! Weather lookup capability.

pub mod mock;
pub mod openweather;

use crate::models::WeatherSnapshot;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Weather response missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid weather response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Looks up current conditions by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// The city string is used as given; it is not cleaned up first.
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}
