//! Notice board client
//!
//! Typed REST client for the community notice board, with the notification
//! cache and the admin moderation workflow built on top of it.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod models;
pub mod moderation;
pub mod notifications;

use std::sync::Arc;

use api::ApiClient;
use auth::Session;
use config::Config;
use errors::ClientResult;
use moderation::ModerationWorkflow;
use notifications::{NotificationService, NotificationState};

/// Everything one signed-in session needs, wired to a single shared cache.
pub struct NoticeBoard {
    pub client: Arc<ApiClient>,
    pub session: Arc<Session>,
    pub notifications: NotificationService,
    pub moderation: ModerationWorkflow,
}

impl NoticeBoard {
    pub fn new(config: &Config) -> ClientResult<Self> {
        let session = Arc::new(Session::new(config.token.clone()));
        let client = Arc::new(ApiClient::new(config, session.clone())?);
        let state = Arc::new(NotificationState::new());

        let notifications = NotificationService::new(client.clone(), state.clone());
        let moderation =
            ModerationWorkflow::new(client.clone(), client.clone(), state, session.clone());

        Ok(Self {
            client,
            session,
            notifications,
            moderation,
        })
    }

    /// The cache shared by the notification service and the moderation workflow.
    pub fn state(&self) -> &Arc<NotificationState> {
        self.notifications.state()
    }
}

#[cfg(test)]
mod testing;
