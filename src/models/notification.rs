//! Notification model with a normalized notice reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{NoticeCategory, NoticeStatus, UserRef};

/// Fields of the notice that the server may embed in a notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeSummary {
    pub title: Option<String>,
    pub status: Option<NoticeStatus>,
    pub category: Option<NoticeCategory>,
}

/// Reference from a notification to its notice.
///
/// The API sends `notice` either as a bare id or as the populated notice
/// document. Both decode into this one type so matching never has to care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireNoticeRef", into = "WireNoticeRef")]
pub struct NoticeRef {
    pub id: String,
    pub summary: Option<NoticeSummary>,
}

impl NoticeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            summary: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireNoticeRef {
    Id(String),
    Embedded(EmbeddedNotice),
}

#[derive(Serialize, Deserialize)]
struct EmbeddedNotice {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_status",
        skip_serializing_if = "Option::is_none"
    )]
    status: Option<NoticeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<NoticeCategory>,
}

/// Only `_id` of an embedded notice is required; an unknown status is dropped.
fn lenient_status<'de, D>(deserializer: D) -> Result<Option<NoticeStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

impl From<WireNoticeRef> for NoticeRef {
    fn from(wire: WireNoticeRef) -> Self {
        match wire {
            WireNoticeRef::Id(id) => NoticeRef::new(id),
            WireNoticeRef::Embedded(embedded) => NoticeRef {
                id: embedded.id,
                summary: Some(NoticeSummary {
                    title: embedded.title,
                    status: embedded.status,
                    category: embedded.category,
                }),
            },
        }
    }
}

impl From<NoticeRef> for WireNoticeRef {
    fn from(notice: NoticeRef) -> Self {
        match notice.summary {
            None => WireNoticeRef::Id(notice.id),
            Some(summary) => WireNoticeRef::Embedded(EmbeddedNotice {
                id: notice.id,
                title: summary.title,
                status: summary.status,
                category: summary.category,
            }),
        }
    }
}

/// A per-user record about a notice-related event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub recipient: Option<UserRef>,
    /// `None` once the notice itself has been deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeRef>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Whether this notification is about the given notice.
    pub fn concerns(&self, notice_id: &str) -> bool {
        self.notice.as_ref().is_some_and(|n| n.id == notice_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_notice_reference() {
        let n: Notification = serde_json::from_value(json!({
            "_id": "n1",
            "notice": "notice42",
            "message": "Your notice is pending review",
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert!(n.is_unread());
        assert!(n.concerns("notice42"));
        assert!(!n.concerns("notice43"));
        assert_eq!(n.notice.as_ref().unwrap().summary, None);
    }

    #[test]
    fn test_embedded_notice_reference() {
        let n: Notification = serde_json::from_value(json!({
            "_id": "n2",
            "user": "u1",
            "notice": { "_id": "notice42", "title": "Water outage", "status": "approved" },
            "message": "Your notice was approved",
            "read": true,
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert!(!n.is_unread());
        assert!(n.concerns("notice42"));
        assert_eq!(n.recipient.as_ref().unwrap().id, "u1");
        let summary = n.notice.as_ref().unwrap().summary.clone().unwrap();
        assert_eq!(summary.title.as_deref(), Some("Water outage"));
        assert_eq!(summary.status, Some(NoticeStatus::Approved));
    }

    #[test]
    fn test_embedded_notice_with_unknown_status() {
        let n: Notification = serde_json::from_value(json!({
            "_id": "n9",
            "notice": { "_id": "x", "status": "archived", "category": "lost-and-found" },
            "message": "Notice archived",
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert!(n.concerns("x"));
        let summary = n.notice.as_ref().unwrap().summary.clone().unwrap();
        assert_eq!(summary.status, None);
        assert_eq!(summary.category, Some(NoticeCategory::Other));
    }

    #[test]
    fn test_deleted_notice_reference() {
        let n: Notification = serde_json::from_value(json!({
            "_id": "n3",
            "notice": null,
            "message": "A notice you followed was removed",
            "read": false,
            "createdAt": "2025-03-01T10:00:00.000Z"
        }))
        .unwrap();

        assert!(n.notice.is_none());
        assert!(!n.concerns("notice42"));
    }

    #[test]
    fn test_reference_keeps_wire_shape() {
        let bare = NoticeRef::new("notice42");
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!("notice42"));

        let embedded: NoticeRef =
            serde_json::from_value(json!({ "_id": "notice42", "title": "Water outage" })).unwrap();
        assert_eq!(
            serde_json::to_value(&embedded).unwrap(),
            json!({ "_id": "notice42", "title": "Water outage" })
        );
    }
}
