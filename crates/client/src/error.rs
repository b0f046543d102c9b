use thiserror::Error;

use crate::auth::AuthError;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by [`ApiClient`] operations.
///
/// The client does not retry and does not distinguish failure kinds beyond
/// what the status code says; callers typically log the error and show one
/// generic message per failed operation.
///
/// [`ApiClient`]: crate::ApiClient
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("validation error: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}
