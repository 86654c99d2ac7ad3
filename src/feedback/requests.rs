use serde::Deserialize;
use uuid::Uuid;

use crate::validation::{self, ValidationError};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub appointment_id: Option<Uuid>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub appointment_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

impl SubmitFeedbackRequest {
    pub fn validate(self) -> Result<Submission, ValidationError> {
        let appointment_id = self
            .appointment_id
            .ok_or(ValidationError::Empty { field: "Appointment" })?;
        let rating = self.rating.ok_or(ValidationError::Empty { field: "Rating" })?;

        Ok(Submission {
            appointment_id,
            rating: validation::rating(rating)?,
            comment: validation::optional_text(self.comment),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_and_comment() {
        let req: SubmitFeedbackRequest = serde_json::from_str(&format!(
            r#"{{"appointmentId":"{}","rating":4,"comment":"   "}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        let submission = req.validate().unwrap();
        assert_eq!(submission.rating, 4);
        assert_eq!(submission.comment, None);
    }

    #[test]
    fn rating_bounds_and_presence() {
        let req = SubmitFeedbackRequest {
            appointment_id: Some(Uuid::new_v4()),
            rating: Some(6),
            comment: None,
        };
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "Rating must be between 1 and 5"
        );

        let req = SubmitFeedbackRequest {
            appointment_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
