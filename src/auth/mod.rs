pub mod extractors;
pub(crate) mod requests;
pub mod responses;
pub mod utils;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    database::{self, assert},
    error::{ApiError, ApiResult},
    models::{
        advisors::NewAdvisor,
        users::{NewUser, Role, UserData},
    },
    protocol::{Envelope, SimpleResponse},
    DbPool,
};

use self::{
    extractors::{bearer_token, AuthUser},
    requests::*,
    responses::*,
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(me)
        .service(refresh_token)
        .service(logout);
}

#[post("/register")]
async fn register(
    pool: web::Data<DbPool>,
    info: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = info.into_inner().validate()?;

    let (user, token) = database::with_conn(&pool, move |conn| {
        conn.transaction(|conn| {
            let user = register_user(conn, registration)?;
            let token = utils::create_session(conn, user.id)?;
            Ok::<_, ApiError>((user, token))
        })
    })
    .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "registered user");
    Ok(HttpResponse::Created().json(
        Envelope::data(AuthResponse {
            user: user.into(),
            token,
        })
        .message("User registered successfully"),
    ))
}

#[post("/login")]
async fn login(
    pool: web::Data<DbPool>,
    info: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let (email, password) = info.into_inner().validate()?;

    let (user, token) = database::with_conn(&pool, move |conn| {
        let user = assert::find_user_by_email(conn, &email)?
            .filter(|user| crate::utils::verify_password(&password, &user.password))
            .ok_or(ApiError::Unauthenticated("Invalid email or password"))?;
        let token = utils::create_session(conn, user.id)?;
        Ok((user, token))
    })
    .await?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(HttpResponse::Ok().json(
        Envelope::data(AuthResponse {
            user: user.into(),
            token,
        })
        .message("Login successful"),
    ))
}

#[get("/me")]
async fn me(auth: AuthUser) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(Envelope::data(UserResponse::from(auth.user))))
}

#[post("/refresh-token")]
async fn refresh_token(pool: web::Data<DbPool>, auth: AuthUser) -> ApiResult<HttpResponse> {
    let AuthUser { user, token } = auth;

    let token =
        database::with_conn(&pool, move |conn| utils::rotate_session(conn, &token, user.id))
            .await?;

    Ok(HttpResponse::Ok().json(Envelope::data(TokenResponse { token })))
}

/// Drops the presented session. Logging out without a token still succeeds.
#[post("/logout")]
async fn logout(pool: web::Data<DbPool>, req: HttpRequest) -> ApiResult<HttpResponse> {
    if let Some(token) = bearer_token(&req) {
        let removed =
            database::with_conn(&pool, move |conn| utils::delete_session(conn, &token)).await?;
        tracing::debug!(removed, "logout");
    }

    Ok(HttpResponse::Ok().json(SimpleResponse::ok("Logout successful")))
}

/// Inserts the user row, plus an empty advisor profile for advisors.
/// Callers run this inside a transaction.
pub(crate) fn register_user(
    conn: &mut PgConnection,
    registration: Registration,
) -> ApiResult<UserData> {
    use crate::schema::{advisors, users};

    assert::assert_email_free(conn, &registration.email)?;

    let new_user = NewUser {
        id: Uuid::new_v4(),
        email: registration.email,
        password: crate::utils::hash_password(&registration.password),
        role: registration.role.as_str().to_string(),
        first_name: registration.first_name,
        last_name: registration.last_name,
        phone_number: registration.phone_number,
    };
    let user = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result::<UserData>(conn)
        .map_err(|err| {
            if crate::error::is_unique_violation(&err, None) {
                ApiError::conflict("Email is already registered")
            } else {
                err.into()
            }
        })?;

    if registration.role == Role::Advisor {
        diesel::insert_into(advisors::table)
            .values(NewAdvisor {
                id: Uuid::new_v4(),
                user_id: user.id,
                ..Default::default()
            })
            .execute(conn)?;
    }

    Ok(user)
}
