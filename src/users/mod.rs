mod requests;

use actix_web::{get, put, web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    advisors::{db::list_advisors, responses::AdvisorResponse},
    auth::{extractors::AuthUser, responses::UserResponse},
    database,
    error::ApiResult,
    models::users::{UpdateUser, UserData},
    protocol::Envelope,
    DbPool,
};

use self::requests::*;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(get_profile)
        .service(update_profile)
        .service(get_advisors);
}

#[get("/profile")]
async fn get_profile(auth: AuthUser) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(Envelope::data(UserResponse::from(auth.user))))
}

#[put("/profile")]
async fn update_profile(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    info: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let changes = info.into_inner().validate()?;
    let user_id = auth.user.id;

    let user =
        database::with_conn(&pool, move |conn| update_user(conn, user_id, changes)).await?;

    Ok(HttpResponse::Ok().json(
        Envelope::data(UserResponse::from(user)).message("Profile updated successfully"),
    ))
}

#[get("/advisors")]
async fn get_advisors(pool: web::Data<DbPool>, _auth: AuthUser) -> ApiResult<HttpResponse> {
    let advisors = database::with_conn(&pool, list_advisors).await?;

    let data: Vec<AdvisorResponse> = advisors
        .into_iter()
        .map(|(advisor, user)| AdvisorResponse::new(advisor, Some(user)))
        .collect();
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

fn update_user(
    conn: &mut PgConnection,
    user_id: Uuid,
    mut changes: UpdateUser,
) -> ApiResult<UserData> {
    use crate::schema::users;

    changes.updated_at = Some(Utc::now());
    Ok(diesel::update(users::table.find(user_id))
        .set(&changes)
        .get_result::<UserData>(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn update_changes_only_given_fields() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let user = testing::create_student(&mut conn);

        let updated = update_user(
            &mut conn,
            user.id,
            UpdateUser {
                phone_number: Some("0400 000 000".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.phone_number.as_deref(), Some("0400 000 000"));
        assert_eq!(updated.first_name, user.first_name);
        assert!(updated.updated_at >= user.updated_at);
    }
}
