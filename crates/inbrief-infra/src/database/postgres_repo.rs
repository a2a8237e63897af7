//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use uuid::Uuid;

use inbrief_core::domain::{Post, PostChanges};
use inbrief_core::error::RepoError;
use inbrief_core::ports::{AdminAllowList, PostRepository};

use super::entity::admin_id::{self, Entity as AdminIdEntity};
use super::entity::news_post::{self, Entity as NewsPostEntity};

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let rows = NewsPostEntity::find()
            .order_by_desc(news_post::Column::CreatedAt)
            .order_by_desc(news_post::Column::Seq)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        tracing::debug!(count = rows.len(), "Loaded posts from database");
        rows.into_iter().map(Post::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        NewsPostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
            .map(Post::try_from)
            .transpose()
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let model = news_post::active_model(&post)?;
        NewsPostEntity::insert(model)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        tracing::debug!(post_id = %post.id, "Inserted post");
        Ok(post)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        let mut model = news_post::ActiveModel {
            id: Set(id),
            headline: Set(changes.headline),
            description: Set(changes.description),
            ..Default::default()
        };
        if let Some(category) = changes.category {
            model.category = Set(Some(category.as_str().to_string()));
        }
        if let Some(images) = changes.images {
            model.images = Set(news_post::images_json(&images)?);
        }

        // Single UPDATE .. RETURNING, so readers never see a partial row
        match model.update(&self.db).await {
            Ok(updated) => Post::try_from(updated).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(query_err(e)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = NewsPostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        NewsPostEntity::find()
            .count(&self.db)
            .await
            .map_err(query_err)
    }
}

/// PostgreSQL admin allow-list.
pub struct PostgresAllowList {
    db: DbConn,
}

impl PostgresAllowList {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Make sure the configured ids are present. Existing rows are kept.
    pub async fn seed<I, S>(&self, ids: I) -> Result<(), RepoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            self.add(id.as_ref()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AdminAllowList for PostgresAllowList {
    async fn contains(&self, employee_id: &str) -> Result<bool, RepoError> {
        let row = AdminIdEntity::find_by_id(employee_id.to_string())
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(row.is_some())
    }

    async fn add(&self, employee_id: &str) -> Result<bool, RepoError> {
        let model = admin_id::ActiveModel {
            employee_id: Set(employee_id.to_string()),
            granted_at: Set(chrono::Utc::now().into()),
        };

        let result = AdminIdEntity::insert(model)
            .on_conflict(
                OnConflict::column(admin_id::Column::EmployeeId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(query_err(e)),
        }
    }
}
