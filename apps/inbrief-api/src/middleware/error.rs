//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use inbrief_core::DomainError;
use inbrief_core::error::RepoError;
use inbrief_core::ports::AuthError;
use inbrief_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    Timeout,
    TooManyRequests(u64),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::Timeout => write!(f, "Upstream request timed out"),
            AppError::TooManyRequests(secs) => write!(f, "Rate limited for {secs}s"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Timeout => ErrorResponse::request_timeout("Request timed out"),
            AppError::TooManyRequests(secs) => ErrorResponse::too_many_requests(format!(
                "Too many login attempts. Try again in {secs} seconds."
            )),
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                ErrorResponse::internal_error()
            }
        };

        let mut response = HttpResponse::build(self.status_code());
        if let AppError::TooManyRequests(secs) = self {
            response.insert_header(("Retry-After", secs.to_string()));
        }
        response.json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Auth(AuthError::InvalidCredentials) => {
                AppError::Forbidden("Invalid employee ID or password".to_string())
            }
            DomainError::Auth(AuthError::NotAuthenticated) => {
                AppError::Forbidden("Please login to continue".to_string())
            }
            DomainError::Auth(AuthError::NotAllowed) => {
                AppError::Forbidden("Unauthorized to assign admin access".to_string())
            }
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{entity_type} not found"))
            }
            DomainError::EditWindowExpired(_) => {
                AppError::Forbidden("The edit window for this post has closed".to_string())
            }
            DomainError::UpstreamTimeout(msg) => {
                tracing::error!(detail = %msg, "Upstream timeout");
                AppError::Timeout
            }
            DomainError::UpstreamFailure(msg) => AppError::Internal(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        DomainError::from(err).into()
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DomainError::validation("empty"), 400)]
    #[case(AuthError::InvalidCredentials.into(), 403)]
    #[case(AuthError::NotAllowed.into(), 403)]
    #[case(DomainError::not_found("Post", "x"), 404)]
    #[case(DomainError::EditWindowExpired(uuid::Uuid::nil()), 403)]
    #[case(DomainError::UpstreamTimeout("sap".into()), 408)]
    #[case(DomainError::UpstreamFailure("cdn".into()), 500)]
    #[case(DomainError::Internal("db".into()), 500)]
    fn test_domain_error_status(#[case] err: DomainError, #[case] status: u16) {
        assert_eq!(AppError::from(err).status_code().as_u16(), status);
    }

    #[actix_web::test]
    async fn test_internal_detail_not_leaked() {
        let response = AppError::Internal("password=hunter2".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("hunter2"));
        assert!(body.contains("Internal Server Error"));
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = AppError::TooManyRequests(30).error_response();
        assert_eq!(response.headers().get("Retry-After").unwrap(), "30");
    }
}
