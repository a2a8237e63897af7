//! Database migrations for the InBrief schema.

pub use sea_orm_migration::prelude::*;

mod m20260115_000001_news_posts;
mod m20260115_000002_admin_ids;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_news_posts::Migration),
            Box::new(m20260115_000002_admin_ids::Migration),
        ]
    }
}
