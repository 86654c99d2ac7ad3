use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{advisors::AdvisorData, users::UserData},
    utils::{format_date_str, format_time_str, split_days},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department: String,
    pub designation: String,
    pub consultation_hours_start: Option<String>,
    pub consultation_hours_end: Option<String>,
    pub available_days: Vec<String>,
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AdvisorUser>,
}

impl AdvisorResponse {
    pub fn new(advisor: AdvisorData, user: Option<UserData>) -> Self {
        Self {
            id: advisor.id,
            user_id: advisor.user_id,
            department: advisor.department,
            designation: advisor.designation,
            consultation_hours_start: advisor.consultation_hours_start.as_ref().map(format_time_str),
            consultation_hours_end: advisor.consultation_hours_end.as_ref().map(format_time_str),
            available_days: split_days(&advisor.available_days),
            bio: advisor.bio,
            user: user.map(|u| AdvisorUser {
                first_name: u.first_name,
                last_name: u.last_name,
                email: u.email,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConsultationHours {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookedSlot {
    pub date: String,
    pub time: String,
}

impl BookedSlot {
    pub fn new(date: &NaiveDate, time: &NaiveTime) -> Self {
        Self {
            date: format_date_str(date),
            time: format_time_str(time),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub advisor_id: Uuid,
    pub available_days: Vec<String>,
    pub consultation_hours: ConsultationHours,
    pub booked_slots: Vec<BookedSlot>,
}
