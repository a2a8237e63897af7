use async_trait::async_trait;

use crate::error::RepoError;

/// Employee ids allowed to sign in and manage posts.
#[async_trait]
pub trait AdminAllowList: Send + Sync {
    async fn contains(&self, employee_id: &str) -> Result<bool, RepoError>;

    /// Add an id. Returns `false` if it was already present.
    async fn add(&self, employee_id: &str) -> Result<bool, RepoError>;
}
