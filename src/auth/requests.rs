use serde::Deserialize;

use crate::{
    models::users::Role,
    validation::{self, ValidationError},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    pub phone_number: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A registration that passed the request checks.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let email = validation::email(&self.email)?;
        validation::password(&self.password)?;
        let first_name = validation::required("First name", &self.first_name)?;
        let last_name = validation::required("Last name", &self.last_name)?;
        let role = Role::parse(self.role.trim())
            .ok_or(ValidationError::Rule("Role must be student or advisor"))?;

        Ok(Registration {
            email,
            password: self.password,
            first_name,
            last_name,
            role,
            phone_number: validation::optional_text(self.phone_number),
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), ValidationError> {
        let email = validation::email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Empty { field: "Password" });
        }
        Ok((email, self.password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "Student@Uni.edu".into(),
            password: "secret1".into(),
            first_name: " Sam ".into(),
            last_name: "Lee".into(),
            role: "student".into(),
            phone_number: Some("  ".into()),
        }
    }

    #[test]
    fn valid_registration_is_normalized() {
        let reg = request().validate().unwrap();
        assert_eq!(reg.email, "student@uni.edu");
        assert_eq!(reg.first_name, "Sam");
        assert_eq!(reg.role, Role::Student);
        assert_eq!(reg.phone_number, None);
    }

    #[test]
    fn registration_rules() {
        let mut req = request();
        req.role = "admin".into();
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "Role must be student or advisor"
        );

        let mut req = request();
        req.password = "123".into();
        assert!(req.validate().is_err());

        let mut req = request();
        req.last_name = "".into();
        assert_eq!(req.validate().unwrap_err().to_string(), "Last name is required");
    }

    #[test]
    fn registration_body_uses_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.co","password":"secret1","firstName":"A","lastName":"B","role":"advisor","phoneNumber":"0123"}"#,
        )
        .unwrap();
        let reg = req.validate().unwrap();
        assert_eq!(reg.role, Role::Advisor);
        assert_eq!(reg.phone_number.as_deref(), Some("0123"));
    }

    #[test]
    fn login_requires_password() {
        let req = LoginRequest {
            email: "a@b.co".into(),
            password: "".into(),
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "Password is required");
    }
}
