//! Scoped on-disk storage for uploaded documents.
//!
//! An [`UploadedDocument`] owns its file: the file is removed by
//! [`UploadedDocument::release`] or, if the owner never gets that far, when
//! the guard is dropped. Removal happens at most once either way.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Directory that holds uploads for the lifetime of a single request.
#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> io::Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write `bytes` under a fresh unique name and hand back the owning guard.
    pub async fn persist(
        &self,
        bytes: Vec<u8>,
        original_name: Option<String>,
        content_type: Option<String>,
    ) -> io::Result<UploadedDocument> {
        let extension = original_name
            .as_deref()
            .and_then(safe_extension)
            .unwrap_or("bin");
        let path = self
            .base_path
            .join(format!("{}.{}", Uuid::new_v4(), extension));

        // Guard first, so a partially written file is still cleaned up.
        let document = UploadedDocument {
            path,
            original_name,
            content_type,
            bytes,
            released: false,
        };
        fs::write(&document.path, &document.bytes).await?;

        tracing::debug!(
            path = %document.path.display(),
            size = document.bytes.len(),
            "Upload stored"
        );

        Ok(document)
    }
}

fn safe_extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// An uploaded document living in a temporary file owned by one request.
#[derive(Debug)]
pub struct UploadedDocument {
    path: PathBuf,
    original_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
    released: bool,
}

impl UploadedDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    /// Declared media type without parameters, lowercased.
    pub fn content_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
    }

    /// Lowercased extension of the caller's file name.
    pub fn extension(&self) -> Option<String> {
        self.original_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Delete the backing file. A file that is already gone is not an error.
    pub async fn release(mut self) -> io::Result<()> {
        self.released = true;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Upload released");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// Only reached when `release` was skipped (early return, panic, or a
// cancelled request), so the blocking remove stays off the normal path.
impl Drop for UploadedDocument {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Upload removed on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove upload"
            ),
        }
    }
}
