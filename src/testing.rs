//! In-memory stores and builders shared by unit tests.

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{Mutex, MutexGuard};

use crate::api::{NoticeStore, NotificationStore};
use crate::errors::{ClientError, ClientResult};
use crate::models::{Decision, Notice, Notification};

pub fn notification(id: &str, notice: serde_json::Value, read: bool) -> Notification {
    serde_json::from_value(json!({
        "_id": id,
        "notice": notice,
        "message": format!("about {}", id),
        "read": read,
        "createdAt": "2025-03-01T10:00:00.000Z"
    }))
    .unwrap()
}

pub fn notice(id: &str, status: &str) -> Notice {
    serde_json::from_value(json!({
        "_id": id,
        "title": format!("Notice {}", id),
        "message": "Details inside",
        "category": "general",
        "status": status,
        "pinned": false,
        "createdAt": "2025-03-01T09:00:00.000Z",
        "user": "u1"
    }))
    .unwrap()
}

fn offline() -> ClientError {
    ClientError::Network("connection refused".to_string())
}

fn not_found(what: &str, id: &str) -> ClientError {
    ClientError::Remote {
        status: 404,
        message: format!("{} {} not found", what, id),
    }
}

#[derive(Debug, Default)]
pub struct MemoryInner {
    pub notices: Vec<Notice>,
    pub notifications: Vec<Notification>,
    pub fail_fetch: bool,
    pub fail_mark_read: bool,
    pub fail_delete: bool,
    pub fail_decide: bool,
    pub fail_unapproved: bool,
    pub calls: Vec<String>,
}

/// Both stores backed by vectors, with switches to make each call fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new(notices: Vec<Notice>, notifications: Vec<Notification>) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                notices,
                notifications,
                ..Default::default()
            }),
        }
    }

    pub async fn inner(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().await
    }

    pub async fn calls(&self) -> Vec<String> {
        self.inner.lock().await.calls.clone()
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn fetch_notifications(&self) -> ClientResult<Vec<Notification>> {
        let mut inner = self.inner.lock().await;
        inner.calls.push("fetch_notifications".to_string());
        if inner.fail_fetch {
            return Err(offline());
        }
        Ok(inner.notifications.clone())
    }

    async fn mark_notification_read(&self, id: &str) -> ClientResult<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(format!("mark_notification_read {}", id));
        if inner.fail_mark_read {
            return Err(ClientError::Remote {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        let mut matched = false;
        for n in inner
            .notifications
            .iter_mut()
            .filter(|n| n.id == id || n.concerns(id))
        {
            n.read = true;
            matched = true;
        }
        if matched {
            Ok(())
        } else {
            Err(not_found("Notification", id))
        }
    }

    async fn delete_notification(&self, id: &str) -> ClientResult<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(format!("delete_notification {}", id));
        if inner.fail_delete {
            return Err(offline());
        }
        let before = inner.notifications.len();
        inner.notifications.retain(|n| n.id != id);
        if inner.notifications.len() == before {
            return Err(not_found("Notification", id));
        }
        Ok(())
    }
}

#[async_trait]
impl NoticeStore for MemoryStore {
    async fn fetch_unapproved(&self) -> ClientResult<Vec<Notice>> {
        let mut inner = self.inner.lock().await;
        inner.calls.push("fetch_unapproved".to_string());
        if inner.fail_unapproved {
            return Err(offline());
        }
        Ok(inner
            .notices
            .iter()
            .filter(|n| n.is_pending())
            .cloned()
            .collect())
    }

    async fn decide_notice(&self, id: &str, decision: Decision) -> ClientResult<()> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(format!("decide_notice {} {}", id, decision));
        if inner.fail_decide {
            return Err(offline());
        }
        let notice = inner
            .notices
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| not_found("Notice", id))?;
        notice.status = notice
            .status
            .transition(decision)
            .map_err(|_| ClientError::Remote {
                status: 400,
                message: "Notice is not pending".to_string(),
            })?;
        Ok(())
    }
}
