//! Operator endpoints for managing advisor accounts, guarded by `ADMIN_API_KEY`.

mod requests;
mod responses;

use actix_web::{delete, post, web, HttpResponse};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    advisors::responses::AdvisorResponse,
    auth::{extractors::AdminKey, register_user},
    database::{self, assert},
    error::{ApiError, ApiResult},
    models::{
        advisors::{AdvisorData, NewAdvisor, UpdateAdvisor},
        users::{Role, UserData},
    },
    protocol::{Envelope, SimpleResponse},
    validation, DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(add_advisor).service(remove_advisor);
}

#[post("/advisors")]
async fn add_advisor(
    pool: web::Data<DbPool>,
    _admin: AdminKey,
    info: web::Json<AddAdvisorRequest>,
) -> ApiResult<HttpResponse> {
    let provision = info.into_inner().validate()?;

    let (user, advisor) = database::with_conn(&pool, move |conn| {
        conn.transaction(|conn| provision_advisor(conn, provision))
    })
    .await?;

    tracing::info!(user_id = %user.id, advisor_id = %advisor.id, "advisor provisioned");
    Ok(HttpResponse::Created().json(
        Envelope::data(ProvisionResponse {
            advisor: AdvisorResponse::new(advisor, None),
            user: user.into(),
        })
        .message("Advisor created successfully"),
    ))
}

#[delete("/advisors/{email}")]
async fn remove_advisor(
    pool: web::Data<DbPool>,
    _admin: AdminKey,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let email = validation::email(&path.into_inner())?;

    let user_id = database::with_conn(&pool, move |conn| {
        conn.transaction(|conn| delete_advisor_account(conn, &email))
    })
    .await?;

    tracing::info!(%user_id, "advisor removed");
    Ok(HttpResponse::Ok().json(SimpleResponse::ok("Advisor deleted successfully")))
}

/// Creates the advisor account, or attaches a profile to an existing
/// advisor account that lacks one.
fn provision_advisor(
    conn: &mut PgConnection,
    provision: Provision,
) -> ApiResult<(UserData, AdvisorData)> {
    use crate::schema::advisors;

    let Provision {
        registration,
        department,
        designation,
    } = provision;

    let user = match assert::find_user_by_email(conn, &registration.email)? {
        None => register_user(conn, registration)?,
        Some(user) if user.role() != Some(Role::Advisor) => {
            return Err(ApiError::conflict(
                "Email is already registered to a non-advisor account",
            ));
        }
        Some(user) => {
            if assert::find_advisor_by_user(conn, user.id)?.is_some() {
                return Err(ApiError::conflict("Advisor already exists"));
            }
            diesel::insert_into(advisors::table)
                .values(NewAdvisor {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    ..Default::default()
                })
                .execute(conn)?;
            user
        }
    };

    let advisor = diesel::update(advisors::table.filter(advisors::user_id.eq(user.id)))
        .set(&UpdateAdvisor {
            department: Some(department),
            designation: Some(designation),
            updated_at: Some(chrono::Utc::now()),
            ..Default::default()
        })
        .get_result::<AdvisorData>(conn)?;

    Ok((user, advisor))
}

/// Removes an advisor account; its profile, appointments and sessions go with it.
fn delete_advisor_account(conn: &mut PgConnection, email: &str) -> ApiResult<Uuid> {
    use crate::schema::users;

    let user = assert::find_user_by_email(conn, email)?
        .filter(|user| user.role() == Some(Role::Advisor))
        .ok_or(ApiError::NotFound("Advisor"))?;

    diesel::delete(users::table.find(user.id)).execute(conn)?;
    Ok(user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::requests::Registration, testing};

    fn provision(email: &str) -> Provision {
        Provision {
            registration: Registration {
                email: email.to_string(),
                password: "secret1".to_string(),
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                role: Role::Advisor,
                phone_number: None,
            },
            department: "Computer Science".to_string(),
            designation: "Professor".to_string(),
        }
    }

    #[test]
    fn provisioning_creates_then_conflicts() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };

        let (user, advisor) = provision_advisor(&mut conn, provision("grace@uni.edu")).unwrap();
        assert_eq!(advisor.user_id, user.id);
        assert_eq!(advisor.department, "Computer Science");
        assert_eq!(advisor.designation, "Professor");

        let err = provision_advisor(&mut conn, provision("grace@uni.edu")).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn students_are_not_converted() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = testing::create_student(&mut conn);

        let err = provision_advisor(&mut conn, provision(&student.email)).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert!(matches!(
            delete_advisor_account(&mut conn, &student.email),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn removal_cascades() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let (user, advisor) = testing::create_advisor(&mut conn);

        assert_eq!(delete_advisor_account(&mut conn, &user.email).unwrap(), user.id);
        assert!(assert::find_advisor(&mut conn, advisor.id).is_err());
        assert!(assert::find_user_by_email(&mut conn, &user.email).unwrap().is_none());
    }
}
