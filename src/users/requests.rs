use serde::Deserialize;

use crate::{
    models::users::UpdateUser,
    validation::{self, ValidationError},
};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<UpdateUser, ValidationError> {
        let first_name = self
            .first_name
            .map(|n| validation::required("First name", &n))
            .transpose()?;
        let last_name = self
            .last_name
            .map(|n| validation::required("Last name", &n))
            .transpose()?;

        Ok(UpdateUser {
            first_name,
            last_name,
            phone_number: self.phone_number.map(|p| p.trim().to_string()),
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        let req = UpdateProfileRequest {
            first_name: Some("  ".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn names_are_trimmed() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"lastName":" Hopper ","phoneNumber":"555"}"#).unwrap();
        let update = req.validate().unwrap();
        assert_eq!(update.first_name, None);
        assert_eq!(update.last_name.as_deref(), Some("Hopper"));
        assert_eq!(update.phone_number.as_deref(), Some("555"));
    }
}
