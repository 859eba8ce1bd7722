//! Session state for the authenticated user.
//!
//! Holds the bearer token attached to every outgoing request and, once
//! fetched, the user profile used for capability checks.

use reqwest::header::HeaderValue;
use tokio::sync::RwLock;

use crate::errors::ClientError;
use crate::models::User;

/// Build the `Authorization` header value for a token.
pub fn bearer_header(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ClientError::Config("Token contains invalid header characters".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[derive(Debug, Default)]
struct SessionInner {
    token: Option<String>,
    user: Option<User>,
}

/// In-memory session. Nothing is persisted.
#[derive(Debug, Default)]
pub struct Session {
    inner: RwLock<SessionInner>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            inner: RwLock::new(SessionInner { token, user: None }),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.token.is_some()
    }

    /// `Some(true)` for a known admin, `Some(false)` for a known non-admin,
    /// `None` while the profile has not been fetched.
    pub async fn is_admin(&self) -> Option<bool> {
        self.inner.read().await.user.as_ref().map(User::is_admin)
    }

    /// Store a new token. Any cached profile belonged to the old token and is dropped.
    pub async fn set_token(&self, token: String) {
        let mut inner = self.inner.write().await;
        inner.token = Some(token);
        inner.user = None;
    }

    pub async fn set_user(&self, user: User) {
        self.inner.write().await.user = Some(user);
    }

    pub async fn logout(&self) {
        let mut inner = self.inner.write().await;
        inner.token = None;
        inner.user = None;
    }
}
