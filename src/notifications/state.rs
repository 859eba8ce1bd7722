//! Client-side notification cache.
//!
//! A best-effort mirror of the user's notifications plus the unread counter
//! shown on the badge. It is never authoritative: the server is. Every
//! mutation goes through one method here, under one write lock, and keeps
//! `unread_count == notifications.iter().filter(|n| !n.read).count()`.

use tokio::sync::RwLock;

use crate::errors::ClientError;
use crate::models::Notification;

#[derive(Debug, Default)]
struct Cache {
    notifications: Vec<Notification>,
    unread_count: usize,
}

impl Cache {
    fn counted_unread(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_unread()).count()
    }

    fn decrement(&mut self, by: usize) {
        self.unread_count = self.unread_count.saturating_sub(by);
    }
}

/// Shared notification cache. Hand it around as `Arc<NotificationState>`.
#[derive(Debug, Default)]
pub struct NotificationState {
    cache: RwLock<Cache>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn unread_count(&self) -> usize {
        self.cache.read().await.unread_count
    }

    /// Cached notifications in the order the server returned them.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.cache.read().await.notifications.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Notification> {
        self.cache
            .read()
            .await
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.notifications.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.notifications.is_empty()
    }

    /// Report drift between the counter and the cached set.
    pub async fn verify(&self) -> Result<(), ClientError> {
        let cache = self.cache.read().await;
        let counted = cache.counted_unread();
        if cache.unread_count != counted {
            return Err(ClientError::Inconsistency(format!(
                "unread count is {} but {} cached notifications are unread",
                cache.unread_count, counted
            )));
        }
        Ok(())
    }

    /// Replace the cache with a freshly fetched list. Returns the unread count.
    pub(crate) async fn replace(&self, notifications: Vec<Notification>) -> usize {
        let mut cache = self.cache.write().await;
        cache.notifications = notifications;
        cache.unread_count = cache.counted_unread();
        cache.unread_count
    }

    /// The server marked notification `id` read. Returns whether a cached
    /// unread entry flipped. Entries already read are left alone so the
    /// counter is never decremented twice for one notification.
    pub(crate) async fn apply_read(&self, id: &str) -> bool {
        let mut cache = self.cache.write().await;
        let flipped = match cache.notifications.iter_mut().find(|n| n.id == id) {
            Some(entry) if entry.is_unread() => {
                entry.read = true;
                true
            }
            _ => false,
        };
        if flipped {
            cache.decrement(1);
        }
        flipped
    }

    /// A notice was moderated and the server marked its notifications read.
    /// Flips every cached entry about `notice_id`, by bare or embedded id.
    /// Returns how many entries flipped.
    pub(crate) async fn apply_notice_resolved(&self, notice_id: &str) -> usize {
        let mut cache = self.cache.write().await;
        let mut flipped = 0;
        for entry in cache
            .notifications
            .iter_mut()
            .filter(|n| n.concerns(notice_id) && n.is_unread())
        {
            entry.read = true;
            flipped += 1;
        }
        cache.decrement(flipped);
        flipped
    }

    /// The server deleted notification `id`. Returns the removed entry.
    pub(crate) async fn apply_removed(&self, id: &str) -> Option<Notification> {
        let mut cache = self.cache.write().await;
        let index = cache.notifications.iter().position(|n| n.id == id)?;
        let removed = cache.notifications.remove(index);
        if removed.is_unread() {
            cache.decrement(1);
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::notification;
    use serde_json::json;

    #[tokio::test]
    async fn test_replace_counts_unread() {
        let state = NotificationState::new();
        let unread = state
            .replace(vec![
                notification("n1", json!("notice1"), false),
                notification("n2", json!("notice2"), true),
            ])
            .await;

        assert_eq!(unread, 1);
        assert_eq!(state.unread_count().await, 1);
        assert_eq!(state.len().await, 2);
        assert!(state.verify().await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_keeps_server_order() {
        let state = NotificationState::new();
        state
            .replace(vec![
                notification("n3", json!("a"), false),
                notification("n1", json!("b"), false),
                notification("n2", json!("c"), false),
            ])
            .await;

        let ids: Vec<_> = state.notifications().await.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["n3", "n1", "n2"]);
    }

    #[tokio::test]
    async fn test_apply_read_never_double_decrements() {
        let state = NotificationState::new();
        state
            .replace(vec![
                notification("n1", json!("notice1"), false),
                notification("n2", json!("notice2"), true),
            ])
            .await;

        assert!(state.apply_read("n1").await);
        assert_eq!(state.unread_count().await, 0);

        // Second call on the same id and a call on an already-read entry.
        assert!(!state.apply_read("n1").await);
        assert!(!state.apply_read("n2").await);
        assert!(!state.apply_read("missing").await);
        assert_eq!(state.unread_count().await, 0);
        assert!(state.verify().await.is_ok());
    }

    #[tokio::test]
    async fn test_apply_notice_resolved_matches_both_shapes() {
        let state = NotificationState::new();
        state
            .replace(vec![
                notification("n1", json!("notice42"), false),
                notification("n2", json!({ "_id": "notice42", "title": "Water" }), false),
                notification("n3", json!({ "_id": "notice42" }), true),
                notification("n4", json!("notice7"), false),
                notification("n5", serde_json::Value::Null, false),
            ])
            .await;
        assert_eq!(state.unread_count().await, 4);

        assert_eq!(state.apply_notice_resolved("notice42").await, 2);
        assert_eq!(state.unread_count().await, 2);
        assert!(state.get("n1").await.unwrap().read);
        assert!(state.get("n2").await.unwrap().read);
        assert!(!state.get("n4").await.unwrap().read);

        // Already resolved: nothing left to flip.
        assert_eq!(state.apply_notice_resolved("notice42").await, 0);
        assert_eq!(state.unread_count().await, 2);
        assert!(state.verify().await.is_ok());
    }

    #[tokio::test]
    async fn test_apply_removed() {
        let state = NotificationState::new();
        state
            .replace(vec![
                notification("n1", json!("notice1"), false),
                notification("n2", json!("notice2"), true),
            ])
            .await;

        let removed = state.apply_removed("n2").await.unwrap();
        assert_eq!(removed.id, "n2");
        assert_eq!(state.unread_count().await, 1);

        state.apply_removed("n1").await.unwrap();
        assert_eq!(state.unread_count().await, 0);
        assert!(state.is_empty().await);

        assert!(state.apply_removed("n1").await.is_none());
        assert_eq!(state.unread_count().await, 0);
    }

    #[tokio::test]
    async fn test_counter_floors_at_zero() {
        let state = NotificationState::new();
        assert_eq!(state.apply_notice_resolved("notice1").await, 0);
        assert!(!state.apply_read("n1").await);
        assert_eq!(state.unread_count().await, 0);
    }

    #[tokio::test]
    async fn test_verify_reports_drift() {
        let state = NotificationState::new();
        state
            .replace(vec![notification("n1", json!("notice1"), false)])
            .await;
        state.cache.write().await.unread_count = 3;

        assert!(matches!(
            state.verify().await,
            Err(ClientError::Inconsistency(_))
        ));
    }
}
