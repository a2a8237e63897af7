//! Login, logout and session handlers.

use actix_web::{HttpResponse, web};

use inbrief_shared::dto::{LoginRequest, SessionResponse};

use crate::middleware::auth::{Identity, removal_cookie, session_cookie};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .access
        .login(&req.employee_id, &req.phone_last_four)
        .await?;

    let cookie = session_cookie(
        &session,
        state.access.session_ttl().as_secs(),
        state.secure_cookies,
    );

    Ok(HttpResponse::Ok().cookie(cookie).json(SessionResponse {
        employee_id: session.identity.employee_id,
        display_name: session.identity.display_name,
        expires_at: Some(session.expires_at),
    }))
}

/// POST /api/auth/logout
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.access.logout(identity.session_id).await?;
    tracing::info!(employee_id = %identity.staff.employee_id, "Logged out");

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(inbrief_shared::ApiResponse::acknowledged("Logged out")))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SessionResponse {
        employee_id: identity.staff.employee_id,
        display_name: identity.staff.display_name,
        expires_at: None,
    }))
}
