//! Reads a post submission from a `multipart/form-data` body.

use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

use inbrief_core::domain::Submission;
use inbrief_core::ports::ImageUpload;

use crate::middleware::error::AppError;

const TEXT_FIELD_LIMIT: usize = 64 * 1024;

/// Collect the text fields and image files of a create or edit form.
///
/// Unknown fields are ignored. File inputs left empty by the browser arrive
/// as zero-byte parts without a filename and are skipped.
pub async fn read_submission(
    mut payload: Multipart,
    max_image_bytes: usize,
) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = payload.try_next().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "headline" => submission.headline = read_text(field, &name).await?,
            "description" => submission.description = read_text(field, &name).await?,
            "category" => submission.category = Some(read_text(field, &name).await?),
            "images" | "images[]" | "image" => {
                if let Some(upload) = read_image(field, max_image_bytes).await? {
                    submission.images.push(upload);
                }
            }
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown form field");
                drain(field).await?;
            }
        }
    }

    Ok(submission)
}

async fn read_text(mut field: Field, name: &str) -> Result<String, AppError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
        if bytes.len() + chunk.len() > TEXT_FIELD_LIMIT {
            return Err(AppError::BadRequest(format!("Field {name} is too long")));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes)
        .map_err(|_| AppError::BadRequest(format!("Field {name} is not valid UTF-8")))
}

async fn read_image(
    mut field: Field,
    max_image_bytes: usize,
) -> Result<Option<ImageUpload>, AppError> {
    let filename = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(str::to_string)
        .unwrap_or_default();
    let content_type = field.content_type().map(|mime| mime.to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
        if bytes.len() + chunk.len() > max_image_bytes {
            return Err(AppError::BadRequest(format!(
                "Image {filename} exceeds the {max_image_bytes} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    if filename.is_empty() || bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(ImageUpload {
        filename,
        content_type,
        bytes,
    }))
}

async fn drain(mut field: Field) -> Result<(), AppError> {
    while field.try_next().await.map_err(bad_multipart)?.is_some() {}
    Ok(())
}

fn bad_multipart(e: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed form data: {e}"))
}
