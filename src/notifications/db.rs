use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::notifications::{NewNotification, Notification},
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Newest first, optionally only read or unread ones.
pub fn list(
    conn: &mut PgConnection,
    user_id: Uuid,
    is_read: Option<bool>,
    limit: i64,
    offset: i64,
) -> ApiResult<Vec<Notification>> {
    use crate::schema::notifications;

    let mut query = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .into_boxed();
    if let Some(is_read) = is_read {
        query = query.filter(notifications::is_read.eq(is_read));
    }

    Ok(query
        .order(notifications::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<Notification>(conn)?)
}

pub fn create(conn: &mut PgConnection, notification: &NewNotification) -> ApiResult<Notification> {
    use crate::schema::notifications;

    Ok(diesel::insert_into(notifications::table)
        .values(notification)
        .get_result::<Notification>(conn)?)
}

pub fn mark_read(
    conn: &mut PgConnection,
    user_id: Uuid,
    notification_id: Uuid,
) -> ApiResult<Notification> {
    use crate::schema::notifications;

    diesel::update(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id)),
    )
    .set(notifications::is_read.eq(true))
    .get_result::<Notification>(conn)
    .optional()?
    .ok_or(ApiError::NotFound("Notification"))
}

pub fn mark_all_read(conn: &mut PgConnection, user_id: Uuid) -> ApiResult<usize> {
    use crate::schema::notifications;

    Ok(diesel::update(
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::is_read.eq(false)),
    )
    .set(notifications::is_read.eq(true))
    .execute(conn)?)
}

pub fn delete(conn: &mut PgConnection, user_id: Uuid, notification_id: Uuid) -> ApiResult<()> {
    use crate::schema::notifications;

    let deleted = diesel::delete(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Notification"));
    }
    Ok(())
}

pub fn set_push_token(conn: &mut PgConnection, user_id: Uuid, token: &str) -> ApiResult<()> {
    use crate::schema::users;

    diesel::update(users::table.find(user_id))
        .set((
            users::push_token.eq(token),
            users::updated_at.eq(chrono::Utc::now()),
        ))
        .execute(conn)?;
    Ok(())
}

pub fn push_token_of(conn: &mut PgConnection, user_id: Uuid) -> ApiResult<Option<String>> {
    use crate::schema::users;

    Ok(users::table
        .find(user_id)
        .select(users::push_token)
        .get_result::<Option<String>>(conn)
        .optional()?
        .flatten())
}
