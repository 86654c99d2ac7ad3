use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{feedback::Feedback, users::UserData};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id,
            appointment_id: f.appointment_id,
            student_id: f.student_id,
            advisor_id: f.advisor_id,
            rating: f.rating,
            comment: f.comment,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentName {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorFeedbackItem {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub student: Option<StudentName>,
    pub created_at: DateTime<Utc>,
}

impl AdvisorFeedbackItem {
    pub fn new(feedback: Feedback, student: Option<UserData>) -> Self {
        Self {
            id: feedback.id,
            appointment_id: feedback.appointment_id,
            rating: feedback.rating,
            comment: feedback.comment,
            student: student.map(|s| StudentName {
                name: s.full_name(),
            }),
            created_at: feedback.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorFeedbackResponse {
    pub feedback: Vec<AdvisorFeedbackItem>,
    pub average_rating: f64,
    pub total_ratings: usize,
}
