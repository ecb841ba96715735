//! Fixed, strictly sequential request pipelines.
//!
//! Each run awaits one stage at a time and short-circuits on the first
//! failure. Failures keep their typed cause until the HTTP boundary.

pub mod chat;
pub mod document_query;

pub use chat::{ChatPipeline, ChatStage};
pub use document_query::{DocumentQueryPipeline, DocumentUpload, PolicyRequest, QueryStage};

use crate::services::extractor::ExtractError;
use crate::services::providers::ProviderError;
use crate::services::weather::WeatherError;
use metrics::{counter, histogram};
use std::future::Future;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Language model request failed: {0}")]
    UpstreamModel(#[from] ProviderError),

    #[error("Weather lookup failed: {0}")]
    WeatherLookup(#[from] WeatherError),

    #[error("Document parsing failed: {0}")]
    DocumentParse(#[from] ExtractError),

    #[error("Upload storage failed: {0}")]
    Storage(#[source] std::io::Error),
}

impl PipelineError {
    /// Stable name of the failure class, for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::UpstreamModel(_) => "upstream_model",
            PipelineError::WeatherLookup(_) => "weather_lookup",
            PipelineError::DocumentParse(_) => "document_parse",
            PipelineError::Storage(_) => "storage",
        }
    }
}

/// Await one stage, recording how long it took.
async fn timed<T, E, F>(pipeline: &'static str, stage: &'static str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    let result = fut.await;
    let elapsed = start.elapsed();

    histogram!(
        "pipeline_stage_duration_seconds",
        "pipeline" => pipeline,
        "stage" => stage
    )
    .record(elapsed.as_secs_f64());

    tracing::debug!(
        pipeline,
        stage,
        elapsed_ms = elapsed.as_millis() as u64,
        ok = result.is_ok(),
        "Stage finished"
    );

    result
}

fn record_outcome<T>(pipeline: &'static str, result: &Result<T, PipelineError>) {
    match result {
        Ok(_) => {
            counter!("pipeline_runs_total", "pipeline" => pipeline, "outcome" => "completed")
                .increment(1);
        }
        Err(e) => {
            counter!("pipeline_runs_total", "pipeline" => pipeline, "outcome" => "failed")
                .increment(1);
            counter!("pipeline_failures_total", "pipeline" => pipeline, "kind" => e.kind())
                .increment(1);
            tracing::warn!(pipeline, kind = e.kind(), error = %e, "Pipeline failed");
        }
    }
}
