//! Uploaded document + question → model answer.

use super::{record_outcome, timed, PipelineError};
use crate::models::{PolicyAnswer, PolicyQuery};
use crate::services::extractor::DocumentTextExtractor;
use crate::services::providers::{ChatMessage, TextProvider};
use crate::services::uploads::{UploadStore, UploadedDocument};
use std::sync::Arc;

const PIPELINE: &str = "document_query";

/// Progress of one document query. Any stage may end in failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStage {
    Received,
    Parsed,
    Answered,
    Completed,
}

impl QueryStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStage::Received => "received",
            QueryStage::Parsed => "parsed",
            QueryStage::Answered => "answered",
            QueryStage::Completed => "completed",
        }
    }
}

/// Raw upload as received from the caller, not yet on disk.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpload {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Both halves are optional here; the pipeline decides what is missing.
#[derive(Debug, Clone, Default)]
pub struct PolicyRequest {
    pub document: Option<DocumentUpload>,
    pub prompt: Option<String>,
}

pub struct DocumentQueryPipeline {
    model: Arc<dyn TextProvider>,
    extractor: Arc<dyn DocumentTextExtractor>,
    uploads: UploadStore,
}

impl DocumentQueryPipeline {
    pub fn new(
        model: Arc<dyn TextProvider>,
        extractor: Arc<dyn DocumentTextExtractor>,
        uploads: UploadStore,
    ) -> Self {
        Self {
            model,
            extractor,
            uploads,
        }
    }

    #[tracing::instrument(name = "document_query_pipeline", skip_all)]
    pub async fn run(&self, request: PolicyRequest) -> Result<PolicyAnswer, PipelineError> {
        let result = self.execute(request).await;
        record_outcome(PIPELINE, &result);
        result
    }

    async fn execute(&self, request: PolicyRequest) -> Result<PolicyAnswer, PipelineError> {
        let upload = request
            .document
            .ok_or_else(|| PipelineError::Validation("No file uploaded".to_string()))?;
        let prompt = request
            .prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| PipelineError::Validation("Prompt is required".to_string()))?;

        tracing::info!(
            file_name = upload.file_name.as_deref().unwrap_or("unnamed"),
            size = upload.bytes.len(),
            prompt_len = prompt.len(),
            "Document query received"
        );

        let document = self
            .uploads
            .persist(upload.bytes, upload.file_name, upload.content_type)
            .await
            .map_err(PipelineError::Storage)?;

        let result = self.answer(&document, prompt).await;

        // Early exits above never reach here; the guard's Drop covers them.
        if let Err(e) = document.release().await {
            tracing::warn!(error = %e, "Failed to release uploaded document");
        }

        result
    }

    async fn answer(
        &self,
        document: &UploadedDocument,
        prompt: String,
    ) -> Result<PolicyAnswer, PipelineError> {
        let text = timed(
            PIPELINE,
            QueryStage::Parsed.as_str(),
            self.extractor.extract_text(document),
        )
        .await?;
        tracing::info!(text_length = text.len(), "Document parsed");

        let query = PolicyQuery::new(prompt, text);
        let messages = [ChatMessage::user(query.to_message())];
        let answer = timed(
            PIPELINE,
            QueryStage::Answered.as_str(),
            self.model.generate(&messages),
        )
        .await?;

        tracing::info!(stage = QueryStage::Completed.as_str(), "Document query completed");
        Ok(PolicyAnswer(answer))
    }
}
