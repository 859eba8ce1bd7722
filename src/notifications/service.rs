//! Notification operations: one store call, then one cache mutation.

use std::sync::Arc;

use super::NotificationState;
use crate::api::NotificationStore;
use crate::errors::ClientResult;

/// Loads and mutates the current user's notifications.
///
/// A failed request never touches the cache. Nothing is applied
/// optimistically, so there is nothing to roll back.
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    state: Arc<NotificationState>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, state: Arc<NotificationState>) -> Self {
        Self { store, state }
    }

    pub fn state(&self) -> &Arc<NotificationState> {
        &self.state
    }

    /// Fetch the full list and replace the cache. Returns the unread count.
    pub async fn load(&self) -> ClientResult<usize> {
        let notifications = self.store.fetch_notifications().await.map_err(|e| {
            tracing::error!("Error fetching notifications: {}", e);
            e
        })?;

        let total = notifications.len();
        let unread = self.state.replace(notifications).await;
        tracing::debug!("Loaded {} notifications, {} unread", total, unread);
        Ok(unread)
    }

    /// Mark one notification read. Returns the new unread count.
    pub async fn mark_read(&self, id: &str) -> ClientResult<usize> {
        self.store.mark_notification_read(id).await.map_err(|e| {
            tracing::error!("Failed to mark notification {} as read: {}", id, e);
            e
        })?;

        if !self.state.apply_read(id).await {
            tracing::debug!("Notification {} was not cached as unread", id);
        }
        Ok(self.state.unread_count().await)
    }

    /// Delete one notification. Returns the new unread count.
    pub async fn remove(&self, id: &str) -> ClientResult<usize> {
        self.store.delete_notification(id).await.map_err(|e| {
            tracing::error!("Failed to delete notification {}: {}", id, e);
            e
        })?;

        if self.state.apply_removed(id).await.is_none() {
            tracing::debug!("Deleted notification {} was not cached", id);
        }
        Ok(self.state.unread_count().await)
    }

    /// Badge refresh.
    ///
    /// There is no count endpoint, so this fetches the whole list like `load`.
    /// The list repopulates the cache rather than being thrown away, which
    /// keeps the counter and the cached set in agreement.
    pub async fn refresh_unread_only(&self) -> ClientResult<usize> {
        let notifications = self.store.fetch_notifications().await.map_err(|e| {
            tracing::error!("Error fetching notifications for badge: {}", e);
            e
        })?;

        Ok(self.state.replace(notifications).await)
    }
}
