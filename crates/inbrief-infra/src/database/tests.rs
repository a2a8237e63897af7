use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;
use uuid::Uuid;

use inbrief_core::domain::{Category, PostChanges, StoredImage};
use inbrief_core::error::RepoError;
use inbrief_core::ports::PostRepository;

use crate::database::entity::news_post;
use crate::database::postgres_repo::PostgresPostRepository;

fn row(id: Uuid, seq: i64, headline: &str, category: Option<&str>) -> news_post::Model {
    news_post::Model {
        id,
        seq,
        headline: headline.to_owned(),
        description: "Body".to_owned(),
        images: json!([{ "url": "https://img/a.jpg", "handle": "inbrief_posts/a" }]),
        category: category.map(str::to_owned),
        author: "E100".to_owned(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 18, 45, 0).unwrap().into(),
    }
}

#[tokio::test]
async fn get_maps_row_to_post() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(id, 1, "Quarterly results", Some("Finance"))]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.get(id).await.unwrap().expect("post exists");

    assert_eq!(post.id, id);
    assert_eq!(post.headline, "Quarterly results");
    assert_eq!(post.category, Some(Category::Finance));
    assert_eq!(
        post.images,
        vec![StoredImage {
            url: "https://img/a.jpg".into(),
            handle: "inbrief_posts/a".into(),
        }]
    );
}

#[tokio::test]
async fn get_missing_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<news_post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_rejects_unknown_category() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(Uuid::new_v4(), 1, "Odd", Some("Gossip"))]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let err = repo.list().await.unwrap_err();
    assert!(matches!(err, RepoError::Corrupt(_)));
}

#[tokio::test]
async fn update_returns_changed_row() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row(id, 4, "Corrected", None)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let changes = PostChanges {
        headline: "Corrected".into(),
        description: "Body".into(),
        category: None,
        images: None,
    };
    let post = repo.update(id, changes).await.unwrap().expect("updated");

    assert_eq!(post.headline, "Corrected");
    assert_eq!(post.author, "E100");
}

#[tokio::test]
async fn update_missing_returns_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<news_post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let changes = PostChanges {
        headline: "Gone".into(),
        description: "Body".into(),
        category: Some(Category::Urgent),
        images: Some(Vec::new()),
    };
    assert!(repo.update(Uuid::new_v4(), changes).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let id = Uuid::new_v4();
    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
}
