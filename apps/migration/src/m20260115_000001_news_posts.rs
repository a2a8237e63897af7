//! News posts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(NEWS_POSTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS news_posts CASCADE;")
            .await?;
        Ok(())
    }
}

const NEWS_POSTS_SQL: &str = r"
CREATE TABLE news_posts (
    id UUID PRIMARY KEY,
    -- insertion order, breaks created_at ties in the feed
    seq BIGSERIAL NOT NULL UNIQUE,
    headline TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    -- [{url, handle}] in display order
    images JSONB NOT NULL DEFAULT '[]'::jsonb,
    category VARCHAR(32),
    author VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_category CHECK (
        category IS NULL
        OR category IN ('Finance', 'Healthcare', 'Achievement', 'Notice', 'Urgent')
    ),
    CONSTRAINT chk_images_array CHECK (jsonb_typeof(images) = 'array')
);

-- Feed order
CREATE INDEX idx_news_posts_feed ON news_posts(created_at DESC, seq DESC);
";
