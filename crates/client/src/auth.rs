//! Credential attachment boundary.
//!
//! The identity provider is an external service with its own protocol; the
//! client needs exactly one capability from it: produce the current
//! session's bearer token.

use std::{future::Future, sync::Arc};

use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from the identity-provider boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider failed to produce a token for the current session.
    #[error("token retrieval failed: {0}")]
    Provider(String),
}

/// Narrow capability over the identity provider.
///
/// `Ok(None)` means no session exists: the request goes out without an
/// `Authorization` header and the backend is responsible for rejecting it.
/// `Err` means token retrieval itself failed: the request is never
/// dispatched and the failure surfaces to the caller.
pub trait TokenProvider: Send + Sync {
    fn id_token(&self) -> impl Future<Output = Result<Option<String>, AuthError>> + Send;
}

/// Provider backed by a credential issued out-of-band (config file or
/// environment). `None` models a signed-out session.
#[derive(Clone, Debug, Default)]
pub struct FixedTokens {
    token: Option<String>,
}

impl FixedTokens {
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl TokenProvider for FixedTokens {
    async fn id_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.token.clone())
    }
}

/// Shared cell tracking the provider session at runtime: `set` when a
/// session is established, `clear` on logout. Whatever drives the provider's
/// own register/login/logout flow lives outside the client and feeds this
/// cell.
#[derive(Clone, Debug, Default)]
pub struct SessionTokens {
    inner: Arc<RwLock<Option<String>>>,
}

impl SessionTokens {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: impl Into<String>) {
        *self.inner.write().await = Some(token.into());
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn current(&self) -> Option<String> {
        self.inner.read().await.clone()
    }
}

impl TokenProvider for SessionTokens {
    async fn id_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.current().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_tokens_report_their_credential() {
        let signed_in = FixedTokens::bearer("tok");
        assert_eq!(signed_in.id_token().await.unwrap(), Some("tok".to_string()));

        let signed_out = FixedTokens::anonymous();
        assert_eq!(signed_out.id_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn session_tokens_follow_login_lifecycle() {
        let tokens = SessionTokens::new();
        assert_eq!(tokens.id_token().await.unwrap(), None);

        tokens.set("tok").await;
        assert_eq!(tokens.id_token().await.unwrap(), Some("tok".to_string()));

        tokens.clear().await;
        assert_eq!(tokens.id_token().await.unwrap(), None);
    }
}
