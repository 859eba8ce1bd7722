//! Authentication and user endpoints.

use reqwest::Method;

use super::ApiClient;
use crate::errors::{ClientError, ClientResult};
use crate::models::{Credentials, LoginResponse, RegisterRequest, User};

impl ApiClient {
    /// POST /api/auth/login, then GET /api/auth/me.
    ///
    /// The token is stored in the session before the profile fetch. If the
    /// profile cannot be fetched the session is cleared again.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<User> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ClientError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let response: LoginResponse = self
            .send_json(Method::POST, "/auth/login", credentials)
            .await?;
        self.session().set_token(response.token).await;

        match self.current_user().await {
            Ok(user) => {
                if let Some(role) = response.role {
                    if role != user.role {
                        tracing::warn!(
                            "Login reported role {} but profile says {}",
                            role,
                            user.role
                        );
                    }
                }
                tracing::info!("Logged in as {} ({})", user.email, user.role);
                Ok(user)
            }
            Err(e) => {
                tracing::error!("Error fetching user profile: {}", e);
                self.session().logout().await;
                Err(e)
            }
        }
    }

    /// POST /api/auth/register - Create an account. Does not log in.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        request.validate()?;
        self.send_body(Method::POST, "/auth/register", request).await
    }

    /// GET /api/auth/me - Fetch the profile and cache it in the session.
    pub async fn current_user(&self) -> ClientResult<User> {
        let user: User = self.get_json("/auth/me").await?;
        self.session().set_user(user.clone()).await;
        Ok(user)
    }

    /// GET /api/users - All registered users (admin only).
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get_json("/users").await
    }
}
