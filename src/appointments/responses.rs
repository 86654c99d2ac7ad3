use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::appointments::Appointment,
    utils::{format_date_str, format_time_str},
};

use super::db::AppointmentDetails;

#[derive(Debug, Serialize)]
pub struct AdvisorSummary {
    pub name: String,
    pub department: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub appointment_date: String,
    pub appointment_time: String,
    pub issue_category: String,
    pub issue_description: String,
    pub status: String,
    pub advisor: Option<AdvisorSummary>,
    pub student: Option<StudentSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AppointmentDetails> for AppointmentResponse {
    fn from(details: AppointmentDetails) -> Self {
        let AppointmentDetails {
            appointment,
            advisor,
            student,
        } = details;

        Self {
            id: appointment.id,
            student_id: appointment.student_id,
            advisor_id: appointment.advisor_id,
            appointment_date: format_date_str(&appointment.appointment_date),
            appointment_time: format_time_str(&appointment.appointment_time),
            issue_category: appointment.issue_category,
            issue_description: appointment.issue_description,
            status: appointment.status,
            advisor: advisor.map(|(advisor, user)| AdvisorSummary {
                name: user.full_name(),
                department: advisor.department,
                email: user.email,
            }),
            student: student.map(|user| StudentSummary {
                name: user.full_name(),
                email: user.email,
            }),
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for StatusResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            status: appointment.status,
            updated_at: appointment.updated_at,
        }
    }
}
