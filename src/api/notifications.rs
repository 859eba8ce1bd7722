//! Notification endpoints.

use async_trait::async_trait;
use reqwest::Method;

use super::{path_id, ApiClient, NotificationStore};
use crate::errors::ClientResult;
use crate::models::Notification;

#[async_trait]
impl NotificationStore for ApiClient {
    async fn fetch_notifications(&self) -> ClientResult<Vec<Notification>> {
        self.get_json("/notifications").await
    }

    async fn mark_notification_read(&self, id: &str) -> ClientResult<()> {
        let id = path_id(id)?;
        self.send_empty(Method::PATCH, &format!("/notifications/{}/read", id))
            .await
    }

    async fn delete_notification(&self, id: &str) -> ClientResult<()> {
        let id = path_id(id)?;
        self.send_empty(Method::DELETE, &format!("/notifications/{}", id))
            .await
    }
}
