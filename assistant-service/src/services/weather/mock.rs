//! Canned weather provider for tests.

use super::{WeatherError, WeatherProvider};
use crate::models::WeatherSnapshot;
use async_trait::async_trait;
use std::sync::Mutex;

pub struct MockWeatherProvider {
    snapshot: Option<WeatherSnapshot>,
    lookups: Mutex<Vec<String>>,
}

impl MockWeatherProvider {
    /// Every lookup succeeds with `snapshot`.
    pub fn returning(snapshot: WeatherSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Every lookup fails as an unknown city.
    pub fn unknown_city() -> Self {
        Self {
            snapshot: None,
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// City strings received so far.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(city.to_string());
        }

        self.snapshot.clone().ok_or_else(|| WeatherError::Upstream {
            status: 404,
            message: "city not found".to_string(),
        })
    }
}
