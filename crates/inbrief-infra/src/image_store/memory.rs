//! In-memory image store for local development and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use inbrief_core::domain::StoredImage;
use inbrief_core::ports::{ImageStore, ImageStoreError, ImageUpload, UploadBatch};

/// Keeps uploaded bytes in a map keyed by handle.
#[derive(Default)]
pub struct InMemoryImageStore {
    images: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.images
            .read()
            .map(|images| images.contains_key(handle))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.images.read().map(|images| images.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload_many(&self, files: Vec<ImageUpload>) -> Result<UploadBatch, ImageStoreError> {
        let mut images = self
            .images
            .write()
            .map_err(|e| ImageStoreError::Client(format!("Lock poisoned: {e}")))?;

        let uploaded = files
            .into_iter()
            .map(|file| {
                let handle = format!("memory/{}_{}", Uuid::new_v4(), file.filename);
                let url = format!("memory://{handle}");
                images.insert(handle.clone(), file.bytes);
                StoredImage { url, handle }
            })
            .collect();

        Ok(UploadBatch {
            uploaded,
            failed: Vec::new(),
        })
    }

    async fn delete_one(&self, handle: &str) -> bool {
        self.images
            .write()
            .map(|mut images| images.remove(handle).is_some())
            .unwrap_or(false)
    }
}
