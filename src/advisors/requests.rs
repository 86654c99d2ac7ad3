use serde::Deserialize;

use crate::{
    models::advisors::UpdateAdvisor,
    validation::{self, ValidationError},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Days may arrive as `"Monday,Friday"` or `["Monday", "Friday"]`.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum DaysInput {
    List(Vec<String>),
    Text(String),
}

impl DaysInput {
    fn joined(&self) -> String {
        match self {
            DaysInput::List(days) => days.join(","),
            DaysInput::Text(days) => days.clone(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdvisorRequest {
    pub department: Option<String>,
    pub designation: Option<String>,
    pub consultation_hours_start: Option<String>,
    pub consultation_hours_end: Option<String>,
    pub available_days: Option<DaysInput>,
    pub bio: Option<String>,
}

impl UpdateAdvisorRequest {
    pub fn validate(self) -> Result<UpdateAdvisor, ValidationError> {
        let start = self
            .consultation_hours_start
            .as_deref()
            .map(|t| validation::time("consultationHoursStart", t))
            .transpose()?;
        let end = self
            .consultation_hours_end
            .as_deref()
            .map(|t| validation::time("consultationHoursEnd", t))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(ValidationError::Rule(
                    "Consultation hours must start before they end",
                ));
            }
        }

        let available_days = self
            .available_days
            .map(|days| validation::weekdays(&days.joined()))
            .transpose()?;

        Ok(UpdateAdvisor {
            department: self.department.map(|d| d.trim().to_string()),
            designation: self.designation.map(|d| d.trim().to_string()),
            consultation_hours_start: start,
            consultation_hours_end: end,
            available_days,
            bio: self.bio.map(|b| b.trim().to_string()),
            updated_at: None,
        })
    }
}
