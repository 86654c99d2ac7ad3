use std::time::Duration;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    database::assert,
    error::{ApiError, ApiResult},
    models::{user_logins::UserLoginData, users::UserData},
};

pub fn create_session(conn: &mut PgConnection, user_id: Uuid) -> ApiResult<String> {
    use crate::schema::user_logins;

    let login_token = crate::utils::generate_login_token(&user_id);
    let token_data = UserLoginData {
        token: login_token.clone(),
        user_id,
        login_time: Utc::now(),
    };
    diesel::insert_into(user_logins::table)
        .values(token_data)
        .execute(conn)?;

    Ok(login_token)
}

/// Resolves a bearer token to its user, rejecting unknown and expired tokens.
pub fn get_user_from_token(
    conn: &mut PgConnection,
    token: &str,
    ttl: Duration,
) -> ApiResult<UserData> {
    use crate::schema::user_logins;

    let data = user_logins::table
        .filter(user_logins::token.eq(token))
        .get_result::<UserLoginData>(conn)
        .optional()?;

    let data = match data {
        Some(data) => data,
        None => return Err(ApiError::Unauthenticated("Invalid or expired token")),
    };

    let age = Utc::now().signed_duration_since(data.login_time);
    if session_expired(age, ttl) {
        delete_session(conn, token)?;
        return Err(ApiError::Unauthenticated("Login has expired"));
    }

    match assert::find_user(conn, data.user_id) {
        Ok(user) => Ok(user),
        Err(ApiError::NotFound(_)) => Err(ApiError::Unauthenticated("Invalid or expired token")),
        Err(err) => Err(err),
    }
}

/// A ttl too large for chrono never expires.
fn session_expired(age: chrono::Duration, ttl: Duration) -> bool {
    chrono::Duration::from_std(ttl).map_or(false, |max_age| age > max_age)
}

pub fn delete_session(conn: &mut PgConnection, token: &str) -> ApiResult<usize> {
    use crate::schema::user_logins;

    Ok(diesel::delete(user_logins::table.filter(user_logins::token.eq(token))).execute(conn)?)
}

/// Swaps `token` for a fresh one belonging to the same user.
pub fn rotate_session(conn: &mut PgConnection, token: &str, user_id: Uuid) -> ApiResult<String> {
    conn.transaction(|conn| {
        delete_session(conn, token)?;
        create_session(conn, user_id)
    })
}
