//! Session extractor.

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use inbrief_core::DomainError;
use inbrief_core::domain::Session;
use inbrief_core::ports::AuthError;

use crate::middleware::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "inbrief_session";

/// Authenticated staff member extractor.
///
/// Use this in handlers to require a session:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.staff.display_name)
/// }
/// ```
///
/// The session id is read from the `inbrief_session` cookie, or from an
/// `Authorization: Bearer <session id>` header for non-browser clients.
#[derive(Debug, Clone)]
pub struct Identity {
    pub session_id: Uuid,
    pub staff: inbrief_core::domain::Identity,
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let session_id = session_id(req);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("Server configuration error".to_string()));
            };

            let session_id = session_id.ok_or(DomainError::Auth(AuthError::NotAuthenticated))?;
            let staff = state.access.authenticate(session_id).await?;

            Ok(Identity { session_id, staff })
        })
    }
}

fn session_id(req: &HttpRequest) -> Option<Uuid> {
    let from_cookie = req
        .cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string());

    let from_header = || {
        req.headers()
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
    };

    from_cookie
        .or_else(from_header)
        .and_then(|raw| Uuid::parse_str(&raw).ok())
}

/// Cookie carrying a freshly opened session.
pub fn session_cookie(session: &Session, max_age_secs: u64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session.id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_secs as i64))
        .finish()
}

/// Cookie that tells the browser to drop the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_session_id_from_cookie() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, id.to_string()))
            .to_http_request();
        assert_eq!(session_id(&req), Some(id));
    }

    #[test]
    fn test_session_id_from_bearer_header() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {id}")))
            .to_http_request();
        assert_eq!(session_id(&req), Some(id));
    }

    #[test]
    fn test_garbage_session_id_is_ignored() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "not-a-uuid"))
            .to_http_request();
        assert_eq!(session_id(&req), None);
    }
}
