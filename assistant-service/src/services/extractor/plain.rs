use super::{DocumentTextExtractor, ExtractError};
use crate::services::uploads::UploadedDocument;
use async_trait::async_trait;

/// Text-like uploads: the bytes must already be UTF-8.
#[derive(Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl DocumentTextExtractor for PlainTextExtractor {
    fn supported_mime_types(&self) -> &[&'static str] {
        &["text/plain", "text/markdown", "text/csv"]
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &["txt", "md", "csv"]
    }

    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, ExtractError> {
        let text = std::str::from_utf8(document.bytes())
            .map_err(|e| ExtractError::Malformed(format!("not valid UTF-8: {}", e)))?;

        Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::uploads::UploadStore;

    #[tokio::test]
    async fn invalid_utf8_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).await.unwrap();
        let doc = store.persist(vec![0xc3, 0x28], None, None).await.unwrap();

        assert!(matches!(
            PlainTextExtractor.extract_text(&doc).await,
            Err(ExtractError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn byte_order_mark_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).await.unwrap();
        let doc = store
            .persist("\u{feff}hello".as_bytes().to_vec(), None, None)
            .await
            .unwrap();

        assert_eq!(PlainTextExtractor.extract_text(&doc).await.unwrap(), "hello");
    }
}
