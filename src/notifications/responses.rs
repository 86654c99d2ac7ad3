use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::notifications::Notification;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            appointment_id: n.appointment_id,
            title: n.title,
            message: n.message,
            kind: n.kind,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}
