//! Cloudinary image store using the signed upload API.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use inbrief_core::domain::StoredImage;
use inbrief_core::ports::{FailedUpload, ImageStore, ImageStoreError, ImageUpload, UploadBatch};

/// Cloudinary account and upload settings.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder every post image lands in
    pub folder: String,
    /// Longest edge, in pixels, after the incoming transformation
    pub max_dimension: u32,
    pub timeout: Duration,
    pub api_base: String,
}

impl CloudinaryConfig {
    pub const DEFAULT_FOLDER: &'static str = "inbrief_posts";
    pub const DEFAULT_MAX_DIMENSION: u32 = 1600;

    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: Self::DEFAULT_FOLDER.to_string(),
            max_dimension: Self::DEFAULT_MAX_DIMENSION,
            timeout: Duration::from_secs(30),
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless the cloud name, key and secret are all set.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            var("CLOUDINARY_CLOUD_NAME")?,
            var("CLOUDINARY_API_KEY")?,
            var("CLOUDINARY_API_SECRET")?,
        );
        if let Some(folder) = var("CLOUDINARY_FOLDER") {
            config.folder = folder;
        }
        if let Some(max) = var("CLOUDINARY_MAX_DIMENSION").and_then(|s| s.parse().ok()) {
            config.max_dimension = max;
        }
        Some(config)
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{action}", self.api_base, self.cloud_name)
    }

    fn transformation(&self) -> String {
        format!("c_limit,w_{0},h_{0},q_auto", self.max_dimension)
    }
}

/// Image store backed by Cloudinary.
pub struct CloudinaryImageStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryImageStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, ImageStoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImageStoreError::Client(e.to_string()))?;

        tracing::info!(
            cloud = %config.cloud_name,
            folder = %config.folder,
            "Cloudinary image store configured"
        );

        Ok(Self { client, config })
    }

    async fn upload_one(&self, file: ImageUpload) -> Result<StoredImage, String> {
        let params = vec![
            ("folder", self.config.folder.clone()),
            ("overwrite", "true".to_string()),
            ("public_id", public_id(&file.filename)),
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
            ("transformation", self.config.transformation()),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let mut part = Part::bytes(file.bytes).file_name(file.filename);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type).map_err(|e| e.to_string())?;
        }

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(describe)?;

        let status = response.status();
        let body = response.text().await.map_err(describe)?;
        if !status.is_success() {
            return Err(error_message(status.as_u16(), &body));
        }

        let uploaded: UploadResponse =
            serde_json::from_str(&body).map_err(|e| format!("unexpected response: {e}"))?;

        Ok(StoredImage {
            url: uploaded.secure_url,
            handle: uploaded.public_id,
        })
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload_many(&self, files: Vec<ImageUpload>) -> Result<UploadBatch, ImageStoreError> {
        let filenames: Vec<String> = files.iter().map(|f| f.filename.clone()).collect();
        let results = join_all(files.into_iter().map(|file| self.upload_one(file))).await;

        let mut batch = UploadBatch::default();
        for (filename, result) in filenames.into_iter().zip(results) {
            match result {
                Ok(image) => batch.uploaded.push(image),
                Err(reason) => {
                    tracing::warn!(filename = %filename, reason = %reason, "Image upload failed");
                    batch.failed.push(FailedUpload { filename, reason });
                }
            }
        }

        tracing::debug!(
            uploaded = batch.uploaded.len(),
            failed = batch.failed.len(),
            "Image batch processed"
        );
        Ok(batch)
    }

    async fn delete_one(&self, handle: &str) -> bool {
        let params = vec![
            ("public_id", handle.to_string()),
            ("timestamp", chrono::Utc::now().timestamp().to_string()),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let mut form = params;
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));

        let response = match self
            .client
            .post(self.config.endpoint("destroy"))
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(handle, error = %describe(e), "Image deletion request failed");
                return false;
            }
        };

        match response.json::<DestroyResponse>().await {
            Ok(body) if body.result == "ok" => true,
            Ok(body) => {
                tracing::warn!(handle, result = %body.result, "Image deletion not confirmed");
                false
            }
            Err(e) => {
                tracing::warn!(handle, error = %e, "Unreadable image deletion response");
                false
            }
        }
    }
}

/// Signature over the sorted request parameters followed by the API secret.
fn sign(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let payload = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{payload}{secret}").as_bytes()))
}

/// `{uuid}_{stem}` with characters Cloudinary rejects replaced.
fn public_id(filename: &str) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(filename);

    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{}_{stem}", Uuid::new_v4())
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("image host returned status {status}"))
}

fn describe(e: reqwest::Error) -> String {
    if e.is_timeout() {
        "upload timed out".to_string()
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_ignores_param_order() {
        let a = vec![
            ("timestamp", "1760000000".to_string()),
            ("public_id", "abc".to_string()),
        ];
        let b = vec![
            ("public_id", "abc".to_string()),
            ("timestamp", "1760000000".to_string()),
        ];

        let sig = sign(&a, "secret");
        assert_eq!(sig, sign(&b, "secret"));
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let params = vec![("public_id", "abc".to_string())];
        assert_ne!(sign(&params, "one"), sign(&params, "two"));
    }

    #[test]
    fn test_signature_of_empty_payload_is_hash_of_secret() {
        // sha256("")
        assert_eq!(
            sign(&[], ""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_public_id_keeps_stem() {
        let id = public_id("team photo.final.JPG");
        assert!(id.ends_with("_team_photo_final"), "{id}");
        assert_eq!(id.len(), 36 + 1 + "team_photo_final".len());
    }

    #[test]
    fn test_public_id_without_extension() {
        assert!(public_id("banner").ends_with("_banner"));
        assert!(public_id(".hidden").ends_with("__hidden"));
    }

    #[test]
    fn test_transformation_bounds_dimensions() {
        let config = CloudinaryConfig::new("demo", "key", "secret");
        assert_eq!(config.transformation(), "c_limit,w_1600,h_1600,q_auto");
        assert_eq!(
            config.endpoint("destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
    }

    #[test]
    fn test_error_message_prefers_body() {
        let body = r#"{"error":{"message":"Invalid image file"}}"#;
        assert_eq!(error_message(400, body), "Invalid image file");
        assert_eq!(error_message(502, "<html>"), "image host returned status 502");
    }
}
