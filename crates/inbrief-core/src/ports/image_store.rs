//! Image hosting port.

use async_trait::async_trait;

use crate::domain::StoredImage;

/// A file received from a client, not yet uploaded.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A file the store refused or could not reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub filename: String,
    pub reason: String,
}

impl FailedUpload {
    /// Message shown to staff next to a successful save.
    pub fn warning(&self) -> String {
        format!("Failed to upload {}: {}", self.filename, self.reason)
    }
}

/// Outcome of uploading several files. `uploaded` keeps submission order.
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    pub uploaded: Vec<StoredImage>,
    pub failed: Vec<FailedUpload>,
}

impl UploadBatch {
    /// Every file failed with the same reason.
    pub fn all_failed(filenames: &[String], reason: &str) -> Self {
        Self {
            uploaded: Vec::new(),
            failed: filenames
                .iter()
                .map(|filename| FailedUpload {
                    filename: filename.clone(),
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }

    pub fn warnings(&self) -> Vec<String> {
        self.failed.iter().map(FailedUpload::warning).collect()
    }
}

/// Remote image store.
///
/// Uploads are isolated per file and never retried: a failing file shows up
/// in [`UploadBatch::failed`] and the rest of the batch still goes through.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload files. `Err` only when the whole batch cannot be attempted.
    async fn upload_many(&self, files: Vec<ImageUpload>) -> Result<UploadBatch, ImageStoreError>;

    /// Delete one image by handle. Returns `false` on any failure.
    async fn delete_one(&self, handle: &str) -> bool;
}

/// Batch-level image store errors.
#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("Image store not configured: {0}")]
    NotConfigured(String),

    #[error("Image store client error: {0}")]
    Client(String),
}
