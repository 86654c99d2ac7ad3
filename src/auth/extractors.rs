//! Request extractors that resolve the caller and gate routes by role.
//!
//! Add one of these as a handler argument to require authentication:
//! `AuthUser` for any signed-in user, `StudentUser` / `AdvisorUser` for a
//! specific role, `AdminKey` for the admin scope.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::{
    config::Config,
    database::{self, assert},
    error::ApiError,
    models::{
        advisors::AdvisorData,
        users::{Role, UserData},
    },
    DbPool,
};

use super::utils::get_user_from_token;

pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// The authenticated caller and the token they presented.
pub struct AuthUser {
    pub user: UserData,
    pub token: String,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let config = req.app_data::<web::Data<Config>>().cloned();

        Box::pin(resolve_user(token, pool, config))
    }
}

async fn resolve_user(
    token: Option<String>,
    pool: Option<web::Data<DbPool>>,
    config: Option<web::Data<Config>>,
) -> Result<AuthUser, ApiError> {
    let token = token.ok_or(ApiError::Unauthenticated("No token provided"))?;
    let pool = pool.ok_or_else(|| anyhow::anyhow!("database pool is not configured"))?;
    let ttl = config
        .ok_or_else(|| anyhow::anyhow!("config is not registered"))?
        .session_ttl;

    let lookup = token.clone();
    let user =
        database::with_conn(&pool, move |conn| get_user_from_token(conn, &lookup, ttl)).await?;

    Ok(AuthUser { user, token })
}

pub struct StudentUser(pub UserData);

impl FromRequest for StudentUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth = AuthUser::from_request(req, payload);
        Box::pin(require_student(auth))
    }
}

async fn require_student(
    auth: LocalBoxFuture<'static, Result<AuthUser, ApiError>>,
) -> Result<StudentUser, ApiError> {
    let AuthUser { user, .. } = auth.await?;
    match user.role() {
        Some(Role::Student) => Ok(StudentUser(user)),
        _ => Err(ApiError::forbidden("Access denied: student role required")),
    }
}

/// An advisor together with their advisor profile row.
pub struct AdvisorUser {
    pub user: UserData,
    pub advisor: AdvisorData,
}

impl FromRequest for AdvisorUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth = AuthUser::from_request(req, payload);
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        Box::pin(require_advisor(auth, pool))
    }
}

async fn require_advisor(
    auth: LocalBoxFuture<'static, Result<AuthUser, ApiError>>,
    pool: Option<web::Data<DbPool>>,
) -> Result<AdvisorUser, ApiError> {
    let AuthUser { user, .. } = auth.await?;
    if user.role() != Some(Role::Advisor) {
        return Err(ApiError::forbidden("Access denied: advisor role required"));
    }

    let pool = pool.ok_or_else(|| anyhow::anyhow!("database pool is not configured"))?;
    let user_id = user.id;
    let advisor =
        database::with_conn(&pool, move |conn| assert::find_advisor_by_user(conn, user_id))
            .await?
            .ok_or(ApiError::NotFound("Advisor profile"))?;

    Ok(AdvisorUser { user, advisor })
}

/// Caller presenting the configured admin key.
pub struct AdminKey;

impl FromRequest for AdminKey {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let expected = req
            .app_data::<web::Data<Config>>()
            .and_then(|c| c.admin_api_key.clone());

        ready(check_admin_key(token, expected))
    }
}

fn check_admin_key(token: Option<String>, expected: Option<String>) -> Result<AdminKey, ApiError> {
    let expected = expected.ok_or_else(|| ApiError::forbidden("Admin API is disabled"))?;
    match token {
        Some(token) if token == expected => Ok(AdminKey),
        Some(_) => Err(ApiError::forbidden("Invalid admin key")),
        None => Err(ApiError::Unauthenticated("No token provided")),
    }
}
