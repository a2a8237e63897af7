use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use inbrief_core::error::RepoError;
use inbrief_core::ports::AdminAllowList;

/// Allow-list held in process memory, seeded from configuration.
///
/// Ids granted at runtime are lost on restart; use the PostgreSQL
/// allow-list to keep them.
#[derive(Default)]
pub struct InMemoryAllowList {
    ids: RwLock<BTreeSet<String>>,
}

impl InMemoryAllowList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: RwLock::new(ids.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl AdminAllowList for InMemoryAllowList {
    async fn contains(&self, employee_id: &str) -> Result<bool, RepoError> {
        Ok(self.ids.read().await.contains(employee_id))
    }

    async fn add(&self, employee_id: &str) -> Result<bool, RepoError> {
        Ok(self.ids.write().await.insert(employee_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_and_add() {
        let list = InMemoryAllowList::new(["9025857", "9025676"]);

        assert!(list.contains("9025857").await.unwrap());
        assert!(!list.contains("1111111").await.unwrap());

        assert!(list.add("1111111").await.unwrap());
        assert!(!list.add("1111111").await.unwrap());
        assert!(list.contains("1111111").await.unwrap());
    }
}
