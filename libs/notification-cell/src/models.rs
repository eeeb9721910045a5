use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub client_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
}

/// Point-in-time view of a client's notification list, with the unread
/// count the dashboard badge renders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationsSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

impl NotificationsSnapshot {
    pub fn from_list(notifications: Vec<Notification>) -> Self {
        let unread_count = notifications.iter().filter(|n| !n.read).count();
        Self {
            notifications,
            unread_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationsEnvelope {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationEnvelope {
    pub notification: Notification,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error("Notifications API error: {0}")]
    ApiError(String),
}
