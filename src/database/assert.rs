use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{advisors::AdvisorData, appointments::Appointment, users::UserData},
};

pub fn assert_email_free(conn: &mut PgConnection, email: &str) -> ApiResult<()> {
    use crate::schema::users;

    let res = users::table
        .filter(users::email.eq(email))
        .count()
        .get_result::<i64>(conn)?;
    if res > 0 {
        return Err(ApiError::conflict("Email is already registered"));
    }

    Ok(())
}

pub fn find_user(conn: &mut PgConnection, user_id: Uuid) -> ApiResult<UserData> {
    use crate::schema::users;

    users::table
        .find(user_id)
        .get_result::<UserData>(conn)
        .optional()?
        .ok_or(ApiError::NotFound("User"))
}

pub fn find_user_by_email(conn: &mut PgConnection, email: &str) -> ApiResult<Option<UserData>> {
    use crate::schema::users;

    Ok(users::table
        .filter(users::email.eq(email))
        .get_result::<UserData>(conn)
        .optional()?)
}

pub fn find_advisor(conn: &mut PgConnection, advisor_id: Uuid) -> ApiResult<AdvisorData> {
    use crate::schema::advisors;

    advisors::table
        .find(advisor_id)
        .get_result::<AdvisorData>(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Advisor"))
}

pub fn find_advisor_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> ApiResult<Option<AdvisorData>> {
    use crate::schema::advisors;

    Ok(advisors::table
        .filter(advisors::user_id.eq(user_id))
        .get_result::<AdvisorData>(conn)
        .optional()?)
}

pub fn find_appointment(conn: &mut PgConnection, appointment_id: Uuid) -> ApiResult<Appointment> {
    use crate::schema::appointments;

    appointments::table
        .find(appointment_id)
        .get_result::<Appointment>(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Appointment"))
}
