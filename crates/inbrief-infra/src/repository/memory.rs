//! In-memory post repository - used when no database is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inbrief_core::domain::{Post, PostChanges};
use inbrief_core::error::RepoError;
use inbrief_core::ports::PostRepository;

#[derive(Default)]
struct Store {
    next_seq: u64,
    /// (insertion sequence, post)
    posts: Vec<(u64, Post)>,
}

/// Post repository backed by a `Vec` behind an async RwLock.
///
/// Every call takes the lock once, so readers never see a half-applied write.
/// Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut entries: Vec<&(u64, Post)> = store.posts.iter().collect();
        entries.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });

        Ok(entries.into_iter().map(|(_, post)| post.clone()).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .find(|(_, post)| post.id == id)
            .map(|(_, post)| post.clone()))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.posts.iter().any(|(_, p)| p.id == post.id) {
            return Err(RepoError::Query(format!("duplicate post id {}", post.id)));
        }

        let seq = store.next_seq;
        store.next_seq += 1;
        store.posts.push((seq, post.clone()));

        tracing::debug!(post_id = %post.id, "Inserted post in memory");
        Ok(post)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;
        let Some((_, post)) = store.posts.iter_mut().find(|(_, post)| post.id == id) else {
            return Ok(None);
        };

        post.apply(changes);
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        let before = store.posts.len();
        store.posts.retain(|(_, post)| post.id != id);
        Ok(store.posts.len() != before)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.read().await.posts.len() as u64)
    }
}
