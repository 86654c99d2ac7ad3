use crate::schema::user_logins;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Insertable)]
#[diesel(table_name = user_logins)]
pub struct UserLoginData {
    pub token: String,
    pub user_id: Uuid,
    pub login_time: DateTime<Utc>,
}
