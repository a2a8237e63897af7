//! Admin handlers.

use actix_web::{HttpResponse, web};

use inbrief_shared::ApiResponse;
use inbrief_shared::dto::{AssignAdminRequest, DbInfoResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/assign_admin
pub async fn assign_admin(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AssignAdminRequest>,
) -> AppResult<HttpResponse> {
    let target = body.into_inner().emp_id;
    state.access.assign_admin(&identity.staff, &target).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::acknowledged(format!(
        "Admin access granted to {}",
        target.trim()
    ))))
}

/// GET /api/admin/db-info
pub async fn db_info(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let (backend, database_connected) = state.database_status().await;
    let total_posts = state.posts.count().await?;

    Ok(HttpResponse::Ok().json(DbInfoResponse {
        database_connected,
        backend: backend.to_string(),
        total_posts,
    }))
}
