use serde::Deserialize;

use crate::{
    auth::requests::Registration,
    models::users::Role,
    validation::{self, ValidationError},
};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AddAdvisorRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
}

/// Advisor account to provision, plus the profile fields to seed.
pub struct Provision {
    pub registration: Registration,
    pub department: String,
    pub designation: String,
}

impl AddAdvisorRequest {
    pub fn validate(self) -> Result<Provision, ValidationError> {
        let email = validation::email(&self.email)?;
        validation::password(&self.password)?;

        Ok(Provision {
            registration: Registration {
                email,
                password: self.password,
                first_name: validation::required("First name", &self.first_name)?,
                last_name: validation::required("Last name", &self.last_name)?,
                role: Role::Advisor,
                phone_number: validation::optional_text(self.phone_number),
            },
            department: validation::optional_text(self.department).unwrap_or_default(),
            designation: validation::optional_text(self.designation).unwrap_or_default(),
        })
    }
}
