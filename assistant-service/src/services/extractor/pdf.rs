use super::{CommandExecutor, DocumentTextExtractor, ExtractError};
use crate::services::uploads::UploadedDocument;
use async_trait::async_trait;
use std::ffi::OsStr;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// PDF text layer via poppler's `pdftotext`, run against the upload on disk.
pub struct PdfTextExtractor {
    program: String,
    executor: CommandExecutor,
}

impl PdfTextExtractor {
    pub fn new(program: impl Into<String>, executor: CommandExecutor) -> Self {
        Self {
            program: program.into(),
            executor,
        }
    }
}

#[async_trait]
impl DocumentTextExtractor for PdfTextExtractor {
    fn supported_mime_types(&self) -> &[&'static str] {
        &["application/pdf", "application/x-pdf"]
    }

    fn supported_extensions(&self) -> &[&'static str] {
        &["pdf"]
    }

    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, ExtractError> {
        if !document.bytes().starts_with(PDF_MAGIC) {
            return Err(ExtractError::Malformed("not a PDF document".to_string()));
        }

        tracing::info!(file_path = ?document.path(), "Extracting PDF text");

        let args: [&OsStr; 4] = [
            OsStr::new("-enc"),
            OsStr::new("UTF-8"),
            document.path().as_os_str(),
            OsStr::new("-"),
        ];
        let output = self.executor.execute(&self.program, &args).await?;

        // A scanned PDF without a text layer legitimately yields nothing.
        let text = String::from_utf8_lossy(&output.stdout).into_owned();

        tracing::info!(text_length = text.len(), "PDF text extracted");

        Ok(text)
    }
}
