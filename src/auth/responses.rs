use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::users::UserData;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserData> for UserResponse {
    fn from(data: UserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            role: data.role,
            first_name: data.first_name,
            last_name: data.last_name,
            phone_number: data.phone_number,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
