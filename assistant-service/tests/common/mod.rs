#![allow(dead_code)]

use assistant_service::config::{
    AssistantConfig, ExtractorConfig, GoogleConfig, ModelConfig, UploadConfig, WeatherConfig,
};
use assistant_service::models::WeatherSnapshot;
use assistant_service::services::{DocumentTextExtractor, TextProvider, UploadStore, WeatherProvider};
use assistant_service::startup::{AppState, Application};
use axum::Router;
use service_core::config::Config as CoreConfig;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const TEST_GOOGLE_KEY: &str = "test-google-key";
pub const TEST_WEATHER_KEY: &str = "test-weather-key";

/// Configuration pointing every upstream at `google_base` / `weather_base`.
pub fn test_config(upload_dir: &Path, google_base: &str, weather_base: &str) -> AssistantConfig {
    AssistantConfig {
        common: CoreConfig { port: 0 },
        google: GoogleConfig {
            api_key: TEST_GOOGLE_KEY.to_string(),
            api_base: google_base.to_string(),
        },
        models: ModelConfig {
            text_model: "gemini-2.5-flash".to_string(),
            temperature: 0.2,
        },
        weather: WeatherConfig {
            api_key: TEST_WEATHER_KEY.to_string(),
            base_url: weather_base.to_string(),
        },
        uploads: UploadConfig {
            dir: upload_dir.display().to_string(),
            max_bytes: 1024 * 1024,
        },
        extractor: ExtractorConfig {
            pdftotext_bin: "pdftotext".to_string(),
            timeout_secs: 5,
        },
        upstream_timeout_secs: 5,
    }
}

pub fn paris() -> WeatherSnapshot {
    WeatherSnapshot {
        city: "Paris".to_string(),
        temperature_celsius: 18.0,
        feels_like_celsius: 17.0,
        description: "clear sky".to_string(),
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// A running application plus the directory its uploads land in.
pub struct TestApp {
    pub address: String,
    pub upload_dir: tempfile::TempDir,
}

impl TestApp {
    /// Serve the real production clients built from `config`.
    pub async fn spawn(config: AssistantConfig, upload_dir: tempfile::TempDir) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        Self::run(app, upload_dir).await
    }

    /// Serve the given capabilities (typically test doubles).
    pub async fn spawn_with(
        model: Arc<dyn TextProvider>,
        weather: Arc<dyn WeatherProvider>,
        extractor: Arc<dyn DocumentTextExtractor>,
    ) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let state = test_state(upload_dir.path(), model, weather, extractor).await;
        let app = Application::build_with_state(state)
            .await
            .expect("Failed to build test application");
        Self::run(app, upload_dir).await
    }

    async fn run(app: Application, upload_dir: tempfile::TempDir) -> Self {
        let address = format!("http://127.0.0.1:{}", app.port());
        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        Self {
            address,
            upload_dir,
        }
    }

    pub fn remaining_uploads(&self) -> usize {
        count_files(self.upload_dir.path())
    }
}

pub async fn test_state(
    upload_dir: &Path,
    model: Arc<dyn TextProvider>,
    weather: Arc<dyn WeatherProvider>,
    extractor: Arc<dyn DocumentTextExtractor>,
) -> AppState {
    let uploads = UploadStore::new(upload_dir)
        .await
        .expect("Failed to create upload store");
    let config = test_config(upload_dir, "http://127.0.0.1:9", "http://127.0.0.1:9");
    AppState::new(config, model, weather, extractor, uploads)
}

/// Serve `router` on a random local port and return its base URL.
pub async fn spawn_fake(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://127.0.0.1:{}", port)
}
