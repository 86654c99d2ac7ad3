use crate::schema::advisors;
use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = advisors)]
pub struct AdvisorData {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department: String,
    pub designation: String,
    pub consultation_hours_start: Option<NaiveTime>,
    pub consultation_hours_end: Option<NaiveTime>,
    pub available_days: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Default)]
#[diesel(table_name = advisors)]
pub struct NewAdvisor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub department: String,
    pub designation: String,
    pub available_days: String,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = advisors)]
pub struct UpdateAdvisor {
    pub department: Option<String>,
    pub designation: Option<String>,
    pub consultation_hours_start: Option<NaiveTime>,
    pub consultation_hours_end: Option<NaiveTime>,
    pub available_days: Option<String>,
    pub bio: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
