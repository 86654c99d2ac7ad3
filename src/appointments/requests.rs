use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    models::appointments::AppointmentStatus,
    validation::{self, ValidationError},
};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub advisor_id: Option<Uuid>,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub appointment_time: String,
    #[serde(default)]
    pub issue_category: String,
    #[serde(default)]
    pub issue_description: String,
}

/// A booking request that passed the shape checks.
#[derive(Debug, Clone)]
pub struct Booking {
    pub advisor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub issue_category: String,
    pub issue_description: String,
}

impl CreateAppointmentRequest {
    pub fn validate(self) -> Result<Booking, ValidationError> {
        let advisor_id = self
            .advisor_id
            .ok_or(ValidationError::Empty { field: "Advisor" })?;

        Ok(Booking {
            advisor_id,
            date: validation::date("appointmentDate", &self.appointment_date)?,
            time: validation::time("appointmentTime", &self.appointment_time)?,
            issue_category: validation::required("Issue category", &self.issue_category)?,
            issue_description: validation::required(
                "Issue description",
                &self.issue_description,
            )?,
        })
    }
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub status: Option<String>,
}

impl ListQuery {
    pub fn status(&self) -> Result<Option<AppointmentStatus>, ValidationError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => AppointmentStatus::parse(s)
                .map(Some)
                .ok_or_else(|| ValidationError::InvalidVariant {
                    field: "status",
                    value: s.to_string(),
                }),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            advisor_id: Some(Uuid::new_v4()),
            appointment_date: "2030-04-02".into(),
            appointment_time: "10:30".into(),
            issue_category: "Academic".into(),
            issue_description: "  Course planning ".into(),
        }
    }

    #[test]
    fn valid_booking() {
        let booking = request().validate().unwrap();
        assert_eq!(booking.time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert_eq!(booking.issue_description, "Course planning");
    }

    #[test]
    fn booking_rules() {
        let mut req = request();
        req.advisor_id = None;
        assert_eq!(req.validate().unwrap_err().to_string(), "Advisor is required");

        let mut req = request();
        req.appointment_date = "2030/04/02".into();
        assert!(req.validate().is_err());

        let mut req = request();
        req.appointment_time = "25:00".into();
        assert!(req.validate().is_err());

        let mut req = request();
        req.issue_description = "   ".into();
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "Issue description is required"
        );
    }

    #[test]
    fn status_filter() {
        assert_eq!(ListQuery::default().status().unwrap(), None);
        let query = ListQuery {
            status: Some("Cancelled".into()),
        };
        assert_eq!(query.status().unwrap(), Some(AppointmentStatus::Cancelled));
        let query = ListQuery {
            status: Some("Done".into()),
        };
        assert!(query.status().is_err());
    }
}
