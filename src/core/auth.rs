//! Credential sign-in
//!
//! The sign-in action does not look at the submitted credentials itself: it
//! forwards the raw form to a [`CredentialsProvider`] and translates the
//! provider's failure, if any, into a short message for the login form.

use crate::core::form::FormData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const GENERIC_AUTH_MESSAGE: &str = "Something went wrong.";

/// Failure reported by a credentials provider
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credentials were rejected (malformed, unknown user or wrong password)
    #[error("CredentialsSignin")]
    CredentialsSignin,

    /// The provider could not reach a decision
    #[error("Provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Provider-level error type name
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::CredentialsSignin => "CredentialsSignin",
            AuthError::Provider(_) => "ProviderError",
        }
    }
}

/// Identity established by a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Trait for identity providers that accept submitted credentials
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Strategy name of the provider
    fn id(&self) -> &str {
        "credentials"
    }

    /// Check the submitted credentials
    async fn sign_in(&self, credentials: &FormData) -> Result<AuthenticatedUser, AuthError>;
}

#[async_trait]
impl<T: CredentialsProvider + ?Sized> CredentialsProvider for std::sync::Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    async fn sign_in(&self, credentials: &FormData) -> Result<AuthenticatedUser, AuthError> {
        (**self).sign_in(credentials).await
    }
}

/// Provider that rejects every sign-in (for development without users)
pub struct DenyAllProvider;

#[async_trait]
impl CredentialsProvider for DenyAllProvider {
    async fn sign_in(&self, _: &FormData) -> Result<AuthenticatedUser, AuthError> {
        Err(AuthError::CredentialsSignin)
    }
}

/// Map a provider failure to the message shown on the login form
pub fn auth_error_message(error: &AuthError) -> &'static str {
    match error {
        AuthError::CredentialsSignin => INVALID_CREDENTIALS_MESSAGE,
        _ => GENERIC_AUTH_MESSAGE,
    }
}

/// The sign-in action over an injected provider
#[derive(Clone)]
pub struct AuthActions<P> {
    provider: P,
}

impl<P: CredentialsProvider> AuthActions<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Forward the submitted credentials to the provider
    ///
    /// Returns `None` when the provider accepts them, otherwise the message to
    /// display. `_prev` is the previously displayed error and is ignored.
    pub async fn authenticate(&self, _prev: Option<&str>, form: &FormData) -> Option<String> {
        self.sign_in(form).await.err()
    }

    /// Like [`authenticate`](Self::authenticate) but also yields the user on success
    pub async fn sign_in(&self, form: &FormData) -> Result<AuthenticatedUser, String> {
        match self.provider.sign_in(form).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, provider = self.provider.id(), "Signed in");
                Ok(user)
            }
            Err(e) => {
                if let AuthError::Provider(reason) = &e {
                    tracing::error!(provider = self.provider.id(), %reason, "Sign-in failed");
                }
                Err(auth_error_message(&e).to_string())
            }
        }
    }
}
