//! Post lifecycle: create, time-boxed edit, delete.

use std::sync::Arc;

use chrono_tz::Tz;
use uuid::Uuid;

use crate::domain::{EditWindow, Identity, Post, PostChanges, PublicPost, Submission};
use crate::error::DomainError;
use crate::ports::{Clock, ImageStore, PostRepository, UploadBatch};

/// A saved post together with non-fatal upload warnings.
#[derive(Debug, Clone)]
pub struct PostOutcome {
    pub post: Post,
    pub warnings: Vec<String>,
}

impl PostOutcome {
    pub fn public(&self, display_tz: Tz) -> PublicPost {
        PublicPost::project(&self.post, display_tz)
    }
}

/// Owns validation and image cleanup around the post repository.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    images: Arc<dyn ImageStore>,
    clock: Arc<dyn Clock>,
    edit_window: EditWindow,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        images: Arc<dyn ImageStore>,
        clock: Arc<dyn Clock>,
        edit_window: EditWindow,
    ) -> Self {
        Self {
            posts,
            images,
            clock,
            edit_window,
        }
    }

    pub fn edit_window(&self) -> EditWindow {
        self.edit_window
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list().await?)
    }

    pub async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.posts.count().await?)
    }

    /// Validate, upload images, and store a new post.
    pub async fn create(
        &self,
        author: &Identity,
        submission: Submission,
    ) -> Result<PostOutcome, DomainError> {
        let category = submission.validate()?;
        let has_text = submission.has_text();
        let submitted_images = submission.images.len();

        tracing::info!(
            employee_id = %author.employee_id,
            images = submitted_images,
            "Creating post"
        );

        let batch = if submission.images.is_empty() {
            UploadBatch::default()
        } else {
            self.images
                .upload_many(submission.images)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Image upload batch failed");
                    DomainError::UpstreamFailure(e.to_string())
                })?
        };

        if !batch.failed.is_empty() {
            tracing::warn!(
                failed = batch.failed.len(),
                uploaded = batch.uploaded.len(),
                "Some image uploads failed"
            );
        }

        if !has_text && submitted_images > 0 && batch.uploaded.is_empty() {
            return Err(DomainError::UpstreamFailure(
                "No image could be uploaded".to_string(),
            ));
        }

        let warnings = batch.warnings();
        let post = Post::new(
            submission.headline,
            submission.description,
            category,
            batch.uploaded,
            author.display_name.clone(),
            self.clock.now(),
        );

        let post = self.posts.insert(post).await?;
        tracing::info!(post_id = %post.id, "Post created");

        Ok(PostOutcome { post, warnings })
    }

    /// Change a post's content inside its edit window.
    ///
    /// New images replace the old ones: every old image is released before
    /// the upload starts, so old images are gone even when the new upload
    /// partly fails.
    pub async fn edit(
        &self,
        editor: &Identity,
        id: Uuid,
        submission: Submission,
    ) -> Result<PostOutcome, DomainError> {
        let existing = self
            .posts
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        if !self.edit_window.is_open(existing.created_at, self.clock.now()) {
            return Err(DomainError::EditWindowExpired(id));
        }

        let category = submission.validate()?;

        tracing::info!(
            post_id = %id,
            employee_id = %editor.employee_id,
            images = submission.images.len(),
            "Editing post"
        );

        let (images, warnings) = if submission.images.is_empty() {
            (None, Vec::new())
        } else {
            self.release_images(&existing).await;

            let filenames: Vec<String> = submission
                .images
                .iter()
                .map(|f| f.filename.clone())
                .collect();

            let batch = match self.images.upload_many(submission.images).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::error!(post_id = %id, error = %e, "Image upload batch failed");
                    UploadBatch::all_failed(&filenames, &e.to_string())
                }
            };
            let warnings = batch.warnings();
            (Some(batch.uploaded), warnings)
        };

        let changes = PostChanges {
            headline: submission.headline,
            description: submission.description,
            category,
            images,
        };

        let post = self
            .posts
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        tracing::info!(post_id = %id, "Post updated");
        Ok(PostOutcome { post, warnings })
    }

    /// Delete a post and release its images.
    ///
    /// Image release is best-effort; the record is removed regardless.
    pub async fn delete(&self, actor: &Identity, id: Uuid) -> Result<(), DomainError> {
        let existing = self
            .posts
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        tracing::info!(post_id = %id, employee_id = %actor.employee_id, "Deleting post");

        self.release_images(&existing).await;

        if !self.posts.delete(id).await? {
            return Err(DomainError::not_found("Post", id));
        }

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn release_images(&self, post: &Post) {
        for handle in post.image_handles() {
            if !self.images.delete_one(handle).await {
                tracing::warn!(
                    post_id = %post.id,
                    handle = %handle,
                    "Failed to release image; it may be orphaned in the image store"
                );
            }
        }
    }
}
