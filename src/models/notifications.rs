use crate::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub kind: String,
}

pub const KIND_APPOINTMENT_REQUEST: &str = "appointment_request";
pub const KIND_APPOINTMENT_APPROVED: &str = "appointment_approved";
pub const KIND_APPOINTMENT_REJECTED: &str = "appointment_rejected";
