//! News post handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inbrief_core::domain::{Category, PublicPost};
use inbrief_shared::ApiResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::multipart::read_submission;
use crate::state::AppState;

/// GET /api/news/all - public feed, newest first
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;

    let feed: Vec<PublicPost> = posts
        .iter()
        .map(|post| PublicPost::project(post, state.display_tz))
        .collect();

    Ok(HttpResponse::Ok().json(feed))
}

/// GET /api/news/categories
pub async fn list_categories() -> HttpResponse {
    let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    HttpResponse::Ok().json(names)
}

/// POST /api/news
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let submission = read_submission(payload, state.max_image_bytes).await?;
    let outcome = state.posts.create(&identity.staff, submission).await?;

    let body = ApiResponse::ok(outcome.public(state.display_tz)).with_warnings(outcome.warnings);
    Ok(HttpResponse::Created().json(body))
}

/// POST /api/news/edit/{id}
pub async fn edit_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    let submission = read_submission(payload, state.max_image_bytes).await?;
    let outcome = state.posts.edit(&identity.staff, id, submission).await?;

    let body = ApiResponse::ok(outcome.public(state.display_tz)).with_warnings(outcome.warnings);
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/news/delete/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    state.posts.delete(&identity.staff, id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged("Post deleted")))
}

/// Ids that are not UUIDs cannot name a post.
fn post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Post not found".to_string()))
}
