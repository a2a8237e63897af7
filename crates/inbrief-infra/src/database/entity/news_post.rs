//! News post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

use inbrief_core::domain::{Category, Post, StoredImage};
use inbrief_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "news_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Insertion order, filled by a BIGSERIAL default.
    pub seq: i64,
    #[sea_orm(column_type = "Text")]
    pub headline: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// `[{"url": .., "handle": ..}]`
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,
    pub category: Option<String>,
    pub author: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let images: Vec<StoredImage> = serde_json::from_value(model.images)
            .map_err(|e| RepoError::Corrupt(format!("post {} images: {e}", model.id)))?;

        let category = model
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| RepoError::Corrupt(format!("post {} category: {e}", model.id)))?;

        Ok(Self {
            id: model.id,
            headline: model.headline,
            description: model.description,
            images,
            category,
            author: model.author,
            created_at: model.created_at.into(),
        })
    }
}

/// Conversion from Domain Post to a SeaORM ActiveModel ready for insert.
pub fn active_model(post: &Post) -> Result<ActiveModel, RepoError> {
    Ok(ActiveModel {
        id: Set(post.id),
        seq: NotSet,
        headline: Set(post.headline.clone()),
        description: Set(post.description.clone()),
        images: Set(images_json(&post.images)?),
        category: Set(post.category.map(|c| c.as_str().to_string())),
        author: Set(post.author.clone()),
        created_at: Set(post.created_at.into()),
    })
}

pub fn images_json(images: &[StoredImage]) -> Result<Json, RepoError> {
    serde_json::to_value(images).map_err(|e| RepoError::Query(e.to_string()))
}
