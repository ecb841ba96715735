//! Canned extractor for tests.

use super::{DocumentTextExtractor, ExtractError};
use crate::services::uploads::UploadedDocument;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

pub struct MockExtractor {
    text: Option<String>,
    seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl MockExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Path of every document handed in, and whether it existed on disk at
    /// that moment.
    pub fn seen(&self) -> Vec<(PathBuf, bool)> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl DocumentTextExtractor for MockExtractor {
    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, ExtractError> {
        let path = document.path().to_path_buf();
        let exists = path.exists();
        if let Ok(mut seen) = self.seen.lock() {
            seen.push((path, exists));
        }

        self.text
            .clone()
            .ok_or_else(|| ExtractError::Malformed("unreadable document".to_string()))
    }
}
