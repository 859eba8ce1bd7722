//! HTTP client for the notice board REST API.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{bearer_header, Session};
use crate::config::Config;
use crate::errors::{ClientError, ClientResult, ErrorBody};

/// Client for the `/api` endpoints. Attaches the session token to every request.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: &Config, session: Arc<Session>) -> ClientResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: format!("{}/api", config.api_url.trim_end_matches('/')),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn any non-2xx status into `ClientError::Remote`.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<Response> {
        let mut request = self.http.request(method.clone(), self.url(path));

        // No token means no header; the server decides what that is worth.
        if let Some(token) = self.session.token().await {
            request = request.header(AUTHORIZATION, bearer_header(&token)?);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        tracing::debug!("{} {}", method, path);

        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", method, path, e);
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = status.canonical_reason().unwrap_or("Request failed");
        let text = response.text().await.unwrap_or_default();
        let message = ErrorBody::message_or(&text, fallback);

        tracing::warn!(
            "{} {} rejected with {}: {}",
            method,
            path,
            status.as_u16(),
            message
        );

        Err(ClientError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(Method::GET, path, None).await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        let response = self.execute(method, path, Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request whose response body is not needed.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> ClientResult<()> {
        self.execute(method, path, None).await?;
        Ok(())
    }

    /// Like `send_empty`, with a JSON body.
    pub(crate) async fn send_body<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        let body = serde_json::to_value(body)?;
        self.execute(method, path, Some(body)).await?;
        Ok(())
    }
}

/// Check that an opaque id can be used as one path segment.
pub(crate) fn path_id(id: &str) -> ClientResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ClientError::Validation("Id is required".to_string()));
    }
    if id.contains(['/', '?', '#', '%']) || id.chars().any(char::is_whitespace) {
        return Err(ClientError::Validation(format!("Invalid id: {}", id)));
    }
    Ok(id)
}
