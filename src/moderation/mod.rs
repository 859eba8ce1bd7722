//! Admin moderation of pending notices.
//!
//! A decision is two remote calls with no transaction between them: the
//! notice status change, then marking the notice's notifications read. When
//! the second call fails after the first succeeded, the workflow re-fetches
//! both lists so the cache reflects what the server actually holds.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{path_id, NoticeStore, NotificationStore};
use crate::auth::Session;
use crate::errors::{ClientError, ClientResult};
use crate::models::{Decision, Notice, NoticeStatus};
use crate::notifications::NotificationState;

/// What a successful approve/reject did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationOutcome {
    pub notice_id: String,
    pub status: NoticeStatus,
    /// Cached notifications flipped to read by this decision
    pub notifications_marked: usize,
    /// The notification update failed and both lists were re-fetched instead
    pub reconciled: bool,
    /// The unapproved list was re-fetched after the decision
    pub pending_refreshed: bool,
}

#[derive(Debug, Default)]
struct Moderation {
    pending: Vec<Notice>,
    /// Status of every notice decided in this session
    decided: HashMap<String, NoticeStatus>,
}

/// Approve/reject workflow for admins.
pub struct ModerationWorkflow {
    notices: Arc<dyn NoticeStore>,
    notifications: Arc<dyn NotificationStore>,
    state: Arc<NotificationState>,
    session: Arc<Session>,
    inner: RwLock<Moderation>,
}

impl ModerationWorkflow {
    pub fn new(
        notices: Arc<dyn NoticeStore>,
        notifications: Arc<dyn NotificationStore>,
        state: Arc<NotificationState>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            notices,
            notifications,
            state,
            session,
            inner: RwLock::new(Moderation::default()),
        }
    }

    /// Cached unapproved notices, as of the last refresh.
    pub async fn pending(&self) -> Vec<Notice> {
        self.inner.read().await.pending.clone()
    }

    /// GET the unapproved list and replace the cached copy.
    pub async fn refresh_pending(&self) -> ClientResult<Vec<Notice>> {
        let pending = self.notices.fetch_unapproved().await.map_err(|e| {
            tracing::error!("Could not fetch unapproved notices: {}", e);
            e
        })?;

        self.inner.write().await.pending = pending.clone();
        Ok(pending)
    }

    pub async fn approve(&self, notice_id: &str) -> ClientResult<ModerationOutcome> {
        self.moderate(notice_id, Decision::Approve).await
    }

    pub async fn reject(&self, notice_id: &str) -> ClientResult<ModerationOutcome> {
        self.moderate(notice_id, Decision::Reject).await
    }

    async fn moderate(&self, notice_id: &str, decision: Decision) -> ClientResult<ModerationOutcome> {
        let notice_id = path_id(notice_id)?;

        if self.session.is_admin().await == Some(false) {
            return Err(ClientError::Forbidden(
                "Only admins can approve or reject notices".to_string(),
            ));
        }

        if let Some(known) = self.inner.read().await.decided.get(notice_id).copied() {
            known.transition(decision)?;
        }

        // Step 1: the notice itself. Failure here leaves everything untouched.
        if let Err(e) = self.notices.decide_notice(notice_id, decision).await {
            tracing::error!("Failed to {} notice {}: {}", decision, notice_id, e);
            return Err(e);
        }
        let status = decision.target();
        self.inner
            .write()
            .await
            .decided
            .insert(notice_id.to_string(), status);
        tracing::info!("Notice {} is now {}", notice_id, status);

        let mut outcome = ModerationOutcome {
            notice_id: notice_id.to_string(),
            status,
            notifications_marked: 0,
            reconciled: false,
            pending_refreshed: false,
        };

        // Step 2: the notifications about it.
        match self.notifications.mark_notification_read(notice_id).await {
            Ok(()) => {
                outcome.notifications_marked = self.state.apply_notice_resolved(notice_id).await;
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("No notifications about notice {} to mark read", notice_id);
            }
            Err(e) => {
                tracing::warn!(
                    "Notice {} is {} but marking its notifications read failed: {}",
                    notice_id,
                    status,
                    e
                );
                self.reconcile(notice_id, status).await?;
                outcome.reconciled = true;
                outcome.pending_refreshed = true;
                return Ok(outcome);
            }
        }

        // Step 3: the unapproved list.
        match self.notices.fetch_unapproved().await {
            Ok(pending) => {
                self.inner.write().await.pending = pending;
                outcome.pending_refreshed = true;
            }
            Err(e) => {
                // The store confirmed the decision, so the notice is no longer pending either way.
                tracing::warn!("Could not refresh unapproved notices: {}", e);
                self.inner
                    .write()
                    .await
                    .pending
                    .retain(|n| n.id != notice_id);
            }
        }

        Ok(outcome)
    }

    /// Re-fetch notifications and unapproved notices after a partial failure.
    async fn reconcile(&self, notice_id: &str, status: NoticeStatus) -> ClientResult<()> {
        let notifications = self.notifications.fetch_notifications().await;
        let pending = self.notices.fetch_unapproved().await;

        let mut failures = Vec::new();

        match notifications {
            Ok(list) => {
                let unread = self.state.replace(list).await;
                tracing::info!("Reconciled notifications after moderation, {} unread", unread);
            }
            Err(e) => failures.push(format!("notifications: {}", e)),
        }

        match pending {
            Ok(pending) => self.inner.write().await.pending = pending,
            Err(e) => {
                self.inner
                    .write()
                    .await
                    .pending
                    .retain(|n| n.id != notice_id);
                failures.push(format!("unapproved notices: {}", e));
            }
        }

        if failures.is_empty() {
            return Ok(());
        }

        let reason = format!(
            "notice {} is {} but local state could not be reconciled ({})",
            notice_id,
            status,
            failures.join("; ")
        );
        tracing::error!("{}", reason);
        Err(ClientError::Inconsistency(reason))
    }
}
