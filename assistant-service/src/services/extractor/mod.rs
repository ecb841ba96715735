//! Document-to-text extraction.
//!
//! Extractors declare the media types and file extensions they handle; the
//! [`ExtractorRegistry`] picks one per upload.

pub mod executor;
pub mod mock;
pub mod pdf;
pub mod plain;

pub use executor::CommandExecutor;
pub use pdf::PdfTextExtractor;
pub use plain::PlainTextExtractor;

use crate::services::uploads::UploadedDocument;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported document type: {0}")]
    Unsupported(String),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Text extraction failed: {0}")]
    ToolFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    fn supported_mime_types(&self) -> &[&'static str] {
        &[]
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &[]
    }

    /// Plain text of `document`. Nothing partial is returned on failure.
    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, ExtractError>;
}

/// Dispatches to the first extractor that claims the upload.
///
/// A specific declared media type wins; generic or missing ones fall back to
/// the file extension.
#[derive(Default, Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn DocumentTextExtractor>>,
}

const GENERIC_MIME_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, extractor: Arc<dyn DocumentTextExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    fn resolve(&self, document: &UploadedDocument) -> Option<&Arc<dyn DocumentTextExtractor>> {
        let mime = document
            .content_type()
            .filter(|ct| !GENERIC_MIME_TYPES.contains(&ct.as_str()));

        if let Some(mime) = mime {
            if let Some(found) = self
                .extractors
                .iter()
                .find(|e| e.supported_mime_types().contains(&mime.as_str()))
            {
                return Some(found);
            }
        }

        let extension = document.extension()?;
        self.extractors
            .iter()
            .find(|e| e.supported_extensions().contains(&extension.as_str()))
    }
}

#[async_trait]
impl DocumentTextExtractor for ExtractorRegistry {
    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, ExtractError> {
        let extractor = self.resolve(document).ok_or_else(|| {
            ExtractError::Unsupported(
                document
                    .content_type()
                    .or_else(|| document.extension())
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        })?;

        extractor.extract_text(document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::uploads::UploadStore;
    use std::time::Duration;

    fn registry() -> ExtractorRegistry {
        ExtractorRegistry::new()
            .register(Arc::new(PdfTextExtractor::new(
                "pdftotext",
                CommandExecutor::new(Duration::from_secs(5)),
            )))
            .register(Arc::new(PlainTextExtractor))
    }

    #[tokio::test]
    async fn plain_text_by_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).await.unwrap();
        let doc = store
            .persist(
                b"Coverage limit: $50,000".to_vec(),
                Some("policy".to_string()),
                Some("text/plain; charset=utf-8".to_string()),
            )
            .await
            .unwrap();

        let text = registry().extract_text(&doc).await.unwrap();
        assert_eq!(text, "Coverage limit: $50,000");
    }

    #[tokio::test]
    async fn octet_stream_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).await.unwrap();
        let doc = store
            .persist(
                b"notes".to_vec(),
                Some("notes.md".to_string()),
                Some("application/octet-stream".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(registry().extract_text(&doc).await.unwrap(), "notes");
    }

    #[tokio::test]
    async fn unknown_type_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).await.unwrap();
        let doc = store
            .persist(
                vec![0xff, 0xd8],
                Some("photo.jpg".to_string()),
                Some("image/jpeg".to_string()),
            )
            .await
            .unwrap();

        assert!(matches!(
            registry().extract_text(&doc).await,
            Err(ExtractError::Unsupported(t)) if t == "image/jpeg"
        ));
    }
}
