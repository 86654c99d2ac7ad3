use serde::Deserialize;

use crate::{push::is_valid_push_token, validation::ValidationError};

use super::db::DEFAULT_PAGE_SIZE;

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub is_read: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> Result<(i64, i64), ValidationError> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ValidationError::OutOfRange {
                field: "limit",
                min: 1,
                max: MAX_PAGE_SIZE,
            });
        }
        if offset < 0 {
            return Err(ValidationError::Rule("offset must not be negative"));
        }
        Ok((limit, offset))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    #[serde(default)]
    pub push_token: String,
}

impl RegisterTokenRequest {
    pub fn validate(self) -> Result<String, ValidationError> {
        let token = self.push_token.trim();
        if token.is_empty() {
            return Err(ValidationError::Empty { field: "Push token" });
        }
        if !is_valid_push_token(token) {
            return Err(ValidationError::InvalidFormat {
                field: "push token",
                expected: "ExponentPushToken[...]",
            });
        }
        Ok(token.to_string())
    }
}
