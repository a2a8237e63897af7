//! Admin allow-list table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ADMIN_IDS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS admin_ids CASCADE;")
            .await?;
        Ok(())
    }
}

const ADMIN_IDS_SQL: &str = r"
CREATE TABLE admin_ids (
    employee_id VARCHAR(64) PRIMARY KEY,
    granted_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";
