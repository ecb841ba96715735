//! Application startup and lifecycle management.
//!
//! Builds the capability clients once, wires them into the pipelines and
//! serves the HTTP routes until a shutdown signal arrives.

use crate::config::AssistantConfig;
use crate::handlers;
use crate::pipelines::{ChatPipeline, DocumentQueryPipeline};
use crate::services::extractor::{CommandExecutor, PdfTextExtractor, PlainTextExtractor};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::{GenerationParams, TextProvider};
use crate::services::weather::openweather::{OpenWeatherClient, OpenWeatherConfig};
use crate::services::{DocumentTextExtractor, ExtractorRegistry, UploadStore, WeatherProvider};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and the prompt field on top of the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state. Cloned per request; holds no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: AssistantConfig,
    pub model: Arc<dyn TextProvider>,
    pub chat: Arc<ChatPipeline>,
    pub documents: Arc<DocumentQueryPipeline>,
}

impl AppState {
    pub fn new(
        config: AssistantConfig,
        model: Arc<dyn TextProvider>,
        weather: Arc<dyn WeatherProvider>,
        extractor: Arc<dyn DocumentTextExtractor>,
        uploads: UploadStore,
    ) -> Self {
        let chat = Arc::new(ChatPipeline::new(model.clone(), weather));
        let documents = Arc::new(DocumentQueryPipeline::new(model.clone(), extractor, uploads));

        Self {
            config,
            model,
            chat,
            documents,
        }
    }

    /// Construct the production clients described by `config`.
    pub async fn from_config(config: AssistantConfig) -> Result<Self, AppError> {
        let model: Arc<dyn TextProvider> = Arc::new(
            GeminiTextProvider::new(GeminiConfig {
                api_key: config.google.api_key.clone(),
                model: config.models.text_model.clone(),
                api_base: config.google.api_base.clone(),
                params: GenerationParams {
                    temperature: Some(config.models.temperature),
                    max_tokens: None,
                },
                timeout: config.upstream_timeout(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        tracing::info!(model = %config.models.text_model, "Initialized Gemini text provider");

        let weather: Arc<dyn WeatherProvider> = Arc::new(
            OpenWeatherClient::new(OpenWeatherConfig {
                api_key: config.weather.api_key.clone(),
                base_url: config.weather.base_url.clone(),
                timeout: config.upstream_timeout(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        tracing::info!(endpoint = %config.weather.base_url, "Initialized weather client");

        let executor = CommandExecutor::new(config.extractor_timeout());
        let extractor: Arc<dyn DocumentTextExtractor> = Arc::new(
            ExtractorRegistry::new()
                .register(Arc::new(PdfTextExtractor::new(
                    config.extractor.pdftotext_bin.clone(),
                    executor,
                )))
                .register(Arc::new(PlainTextExtractor)),
        );

        let uploads = UploadStore::new(&config.uploads.dir).await.map_err(|e| {
            tracing::error!(
                "Failed to initialize upload directory at {}: {}",
                config.uploads.dir,
                e
            );
            AppError::from(e)
        })?;

        Ok(Self::new(config, model, weather, extractor, uploads))
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.uploads.max_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/chat", post(handlers::chat))
        .route("/extractPolicy", post(handlers::extract_policy))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
}

impl Application {
    pub async fn build(config: AssistantConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config).await?;
        Self::build_with_state(state).await
    }

    /// Serve an already assembled state, e.g. one carrying test doubles.
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let app = build_router(state);
        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::pin(async move { server.await }),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
