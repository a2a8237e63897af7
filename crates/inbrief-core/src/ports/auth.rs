//! Authentication and authorization errors.

/// Authentication errors.
///
/// `InvalidCredentials` deliberately covers every login failure; the precise
/// reason is only logged.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Insufficient permissions")]
    NotAllowed,
}
