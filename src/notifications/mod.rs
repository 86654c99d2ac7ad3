pub mod db;
pub mod dispatch;
mod requests;
mod responses;

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    database,
    error::ApiResult,
    protocol::{Envelope, SimpleResponse},
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_notifications)
        .service(mark_all_read)
        .service(register_token)
        .service(mark_read)
        .service(delete_notification);
}

#[get("")]
async fn list_notifications(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let (limit, offset) = query.page()?;
    let is_read = query.is_read;
    let user_id = auth.user.id;

    let notifications =
        database::with_conn(&pool, move |conn| db::list(conn, user_id, is_read, limit, offset))
            .await?;

    let data: Vec<NotificationResponse> = notifications.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[put("/{id}/read")]
async fn mark_read(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let notification_id = path.into_inner();
    let user_id = auth.user.id;

    let notification =
        database::with_conn(&pool, move |conn| db::mark_read(conn, user_id, notification_id))
            .await?;

    Ok(HttpResponse::Ok().json(
        Envelope::data(NotificationResponse::from(notification))
            .message("Notification marked as read"),
    ))
}

#[put("/{action:read-all|mark-all-read}")]
async fn mark_all_read(pool: web::Data<DbPool>, auth: AuthUser) -> ApiResult<HttpResponse> {
    let user_id = auth.user.id;
    let updated = database::with_conn(&pool, move |conn| db::mark_all_read(conn, user_id)).await?;

    tracing::debug!(%user_id, updated, "notifications marked read");
    Ok(HttpResponse::Ok().json(SimpleResponse::ok("All notifications marked as read")))
}

#[post("/register-token")]
async fn register_token(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    info: web::Json<RegisterTokenRequest>,
) -> ApiResult<HttpResponse> {
    let token = info.into_inner().validate()?;
    let user_id = auth.user.id;

    database::with_conn(&pool, move |conn| db::set_push_token(conn, user_id, &token)).await?;

    tracing::info!(%user_id, "push token registered");
    Ok(HttpResponse::Ok().json(SimpleResponse::ok("Push token registered successfully")))
}

#[delete("/{id}")]
async fn delete_notification(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let notification_id = path.into_inner();
    let user_id = auth.user.id;

    database::with_conn(&pool, move |conn| db::delete(conn, user_id, notification_id)).await?;

    Ok(HttpResponse::Ok().json(SimpleResponse::ok("Notification deleted successfully")))
}
