//! Email/password credentials provider backed by a user store

use crate::core::auth::{AuthError, AuthenticatedUser, CredentialsProvider};
use crate::core::form::FormData;
use anyhow::{Result, anyhow};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A stored user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// PHC-formatted Argon2 hash
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Create a user, hashing `password`
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: &str) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: hash_password(password)?,
        })
    }
}

/// Lookup of user accounts by email
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Shape of the credentials the provider accepts
#[derive(Debug, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

impl Credentials {
    /// Read and shape-check credentials from a submitted form
    pub fn from_form(form: &FormData) -> Option<Self> {
        let credentials = Self {
            email: form.get("email")?.trim().to_string(),
            password: form.get("password")?.to_string(),
        };
        credentials.validate().ok()?;
        Some(credentials)
    }
}

/// Hash a password with Argon2 (default parameters, random salt)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand_core::OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Password hashing error: {}", e))
}

/// Check `password` against a stored PHC hash; malformed hashes never match
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Credentials provider checking email/password against a [`UserStore`]
#[derive(Clone)]
pub struct UserStoreCredentialsProvider<S> {
    store: S,
}

impl<S: UserStore> UserStoreCredentialsProvider<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: UserStore> CredentialsProvider for UserStoreCredentialsProvider<S> {
    async fn sign_in(&self, form: &FormData) -> Result<AuthenticatedUser, AuthError> {
        let Some(credentials) = Credentials::from_form(form) else {
            return Err(AuthError::CredentialsSignin);
        };

        let user = self
            .store
            .find_by_email(&credentials.email)
            .await
            .map_err(|e| AuthError::Provider(format!("Failed to fetch user: {}", e)))?
            .ok_or(AuthError::CredentialsSignin)?;

        if !verify_password(&credentials.password, &user.password_hash) {
            return Err(AuthError::CredentialsSignin);
        }

        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
            email: user.email,
        })
    }
}
