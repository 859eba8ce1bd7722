//! REST API module.
//!
//! `ApiClient` talks to the notice board server. The two store traits are the
//! seams the notification and moderation workflows depend on, so those
//! workflows can run against any backend.

mod auth;
mod client;
mod notices;
mod notifications;

pub use client::ApiClient;
pub(crate) use client::path_id;

use async_trait::async_trait;

use crate::errors::ClientResult;
use crate::models::{Decision, Notice, Notification};

/// Remote store of notification records for the current user.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// GET /api/notifications
    async fn fetch_notifications(&self) -> ClientResult<Vec<Notification>>;

    /// PATCH /api/notifications/{id}/read
    ///
    /// The server also accepts a notice id here and marks the notifications
    /// about that notice.
    async fn mark_notification_read(&self, id: &str) -> ClientResult<()>;

    /// DELETE /api/notifications/{id}
    async fn delete_notification(&self, id: &str) -> ClientResult<()>;
}

/// Remote store of notices, restricted to what moderation needs.
#[async_trait]
pub trait NoticeStore: Send + Sync {
    /// GET /api/notices/admin/unapproved
    async fn fetch_unapproved(&self) -> ClientResult<Vec<Notice>>;

    /// PATCH /api/notices/approve/{id} or /api/notices/reject/{id}
    async fn decide_notice(&self, id: &str, decision: Decision) -> ClientResult<()>;
}
