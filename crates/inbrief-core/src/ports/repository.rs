use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostChanges};
use crate::error::RepoError;

/// Post storage.
///
/// Every method is atomic on its own; callers get no cross-call transactions.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest `created_at` first. Posts with equal timestamps come
    /// back latest-inserted first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post by its id.
    async fn get(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Store a new post.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Apply content changes. Returns `None` if the post does not exist.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError>;

    /// Remove a post. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Number of stored posts.
    async fn count(&self) -> Result<u64, RepoError>;
}
