//! Notice endpoints.

use async_trait::async_trait;
use reqwest::Method;

use super::{path_id, ApiClient, NoticeStore};
use crate::errors::ClientResult;
use crate::models::{CreateNoticeRequest, Decision, Notice, UpdateNoticeRequest};

#[async_trait]
impl NoticeStore for ApiClient {
    async fn fetch_unapproved(&self) -> ClientResult<Vec<Notice>> {
        self.get_json("/notices/admin/unapproved").await
    }

    async fn decide_notice(&self, id: &str, decision: Decision) -> ClientResult<()> {
        let id = path_id(id)?;
        let path = match decision {
            Decision::Approve => format!("/notices/approve/{}", id),
            Decision::Reject => format!("/notices/reject/{}", id),
        };
        self.send_empty(Method::PATCH, &path).await
    }
}

impl ApiClient {
    /// GET /api/notices - List notices, optionally only the newest `limit`.
    pub async fn list_notices(&self, limit: Option<usize>) -> ClientResult<Vec<Notice>> {
        match limit {
            Some(limit) => self.get_json(&format!("/notices?limit={}", limit)).await,
            None => self.get_json("/notices").await,
        }
    }

    /// GET /api/notices/{id} - Get a single notice.
    pub async fn get_notice(&self, id: &str) -> ClientResult<Notice> {
        let id = path_id(id)?;
        self.get_json(&format!("/notices/{}", id)).await
    }

    /// POST /api/notices - Submit a notice for moderation.
    pub async fn create_notice(&self, request: &CreateNoticeRequest) -> ClientResult<Notice> {
        request.validate()?;
        let notice: Notice = self.send_json(Method::POST, "/notices", request).await?;
        if !notice.is_pending() {
            tracing::warn!(
                "Server stored new notice {} as {} instead of pending",
                notice.id,
                notice.status
            );
        }
        Ok(notice)
    }

    /// PATCH /api/notices/{id} - Edit title, message or category.
    pub async fn update_notice(
        &self,
        id: &str,
        request: &UpdateNoticeRequest,
    ) -> ClientResult<()> {
        request.validate()?;
        let id = path_id(id)?;
        self.send_body(Method::PATCH, &format!("/notices/{}", id), request)
            .await
    }

    /// DELETE /api/notices/delete/{id} - Delete a notice.
    pub async fn delete_notice(&self, id: &str) -> ClientResult<()> {
        let id = path_id(id)?;
        self.send_empty(Method::DELETE, &format!("/notices/delete/{}", id))
            .await
    }

    /// GET /api/user/me/notices - Notices owned by the current user.
    pub async fn my_notices(&self) -> ClientResult<Vec<Notice>> {
        self.get_json("/user/me/notices").await
    }
}
