use serde::Serialize;

use crate::{advisors::responses::AdvisorResponse, auth::responses::UserResponse};

#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub user: UserResponse,
    pub advisor: AdvisorResponse,
}
