//! Notice model and its moderation state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRef;
use crate::errors::ClientError;

/// Notice category. Unknown strings from the server decode as `Other`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NoticeCategory {
    #[default]
    General,
    Event,
    Urgent,
    #[serde(other)]
    Other,
}

impl NoticeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeCategory::General => "general",
            NoticeCategory::Event => "event",
            NoticeCategory::Urgent => "urgent",
            NoticeCategory::Other => "other",
        }
    }
}

impl FromStr for NoticeCategory {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(NoticeCategory::General),
            "event" => Ok(NoticeCategory::Event),
            "urgent" => Ok(NoticeCategory::Urgent),
            "other" => Ok(NoticeCategory::Other),
            other => Err(ClientError::Validation(format!(
                "Unknown category {}, expected general, event, urgent or other",
                other
            ))),
        }
    }
}

impl fmt::Display for NoticeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moderation status of a notice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NoticeStatus {
    Pending,
    Approved,
    Rejected,
}

/// An admin decision on a pending notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status a pending notice ends up in after this decision.
    pub fn target(self) -> NoticeStatus {
        match self {
            Decision::Approve => NoticeStatus::Approved,
            Decision::Reject => NoticeStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NoticeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeStatus::Pending => "pending",
            NoticeStatus::Approved => "approved",
            NoticeStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected notices never move again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NoticeStatus::Pending)
    }

    /// Apply a moderation decision. Only pending notices can be decided.
    pub fn transition(self, decision: Decision) -> Result<NoticeStatus, ClientError> {
        match self {
            NoticeStatus::Pending => Ok(decision.target()),
            decided => Err(ClientError::Validation(format!(
                "Cannot {} a notice that is already {}",
                decision, decided
            ))),
        }
    }
}

impl FromStr for NoticeStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(NoticeStatus::Pending),
            "approved" => Ok(NoticeStatus::Approved),
            "rejected" => Ok(NoticeStatus::Rejected),
            other => Err(ClientError::Validation(format!(
                "Unknown status {}, expected pending, approved or rejected",
                other
            ))),
        }
    }
}

impl fmt::Display for NoticeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posted announcement with a moderation status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub category: NoticeCategory,
    pub status: NoticeStatus,
    #[serde(default)]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    /// Owner, as a bare id or an embedded user object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRef>,
}

impl Notice {
    pub fn is_pending(&self) -> bool {
        self.status == NoticeStatus::Pending
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.id == user_id)
    }
}

/// Request body for submitting a new notice. The server always stores it as pending.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoticeRequest {
    pub title: String,
    pub message: String,
    pub category: NoticeCategory,
}

impl CreateNoticeRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            category: NoticeCategory::default(),
        }
    }

    pub fn with_category(mut self, category: NoticeCategory) -> Self {
        self.category = category;
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::Validation("Title is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(ClientError::Validation("Message is required".to_string()));
        }
        Ok(())
    }
}

/// Request body for editing a notice. Status is deliberately absent: edits never moderate.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoticeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<NoticeCategory>,
}

impl UpdateNoticeRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.message.is_none() && self.category.is_none()
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.is_empty() {
            return Err(ClientError::Validation("No changes provided".to_string()));
        }
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ClientError::Validation("Title cannot be blank".to_string()));
        }
        if self.message.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ClientError::Validation("Message cannot be blank".to_string()));
        }
        Ok(())
    }
}

/// Local filter over a notice list.
#[derive(Debug, Clone, Default)]
pub struct NoticeFilter {
    /// Case-insensitive substring of title or message
    pub search: Option<String>,
    pub category: Option<NoticeCategory>,
    pub status: Option<NoticeStatus>,
}

impl NoticeFilter {
    pub fn matches(&self, notice: &Notice) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                notice.title.to_lowercase().contains(&term)
                    || notice.message.to_lowercase().contains(&term)
            }
        };
        let matches_category = self.category.map_or(true, |c| notice.category == c);
        let matches_status = self.status.map_or(true, |s| notice.status == s);

        matches_search && matches_category && matches_status
    }

    pub fn apply<'a>(&self, notices: &'a [Notice]) -> Vec<&'a Notice> {
        notices.iter().filter(|n| self.matches(n)).collect()
    }
}
