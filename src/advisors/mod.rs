pub mod db;
mod requests;
pub mod responses;

use actix_web::{get, put, web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    auth::extractors::{AdvisorUser, AuthUser},
    database,
    error::ApiResult,
    protocol::Envelope,
    utils::{format_time_str, get_date_range_opt, split_days},
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    // `/profile` must be registered before `/{id}`
    cfg.service(update_profile)
        .service(list_advisors)
        .service(availability)
        .service(get_advisor);
}

#[get("")]
async fn list_advisors(pool: web::Data<DbPool>, _auth: AuthUser) -> ApiResult<HttpResponse> {
    let advisors = database::with_conn(&pool, db::list_advisors).await?;

    let data: Vec<AdvisorResponse> = advisors
        .into_iter()
        .map(|(advisor, user)| AdvisorResponse::new(advisor, Some(user)))
        .collect();
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/{id}")]
async fn get_advisor(
    pool: web::Data<DbPool>,
    _auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let advisor_id = path.into_inner();
    let (advisor, user) =
        database::with_conn(&pool, move |conn| db::get_advisor(conn, advisor_id)).await?;

    Ok(HttpResponse::Ok().json(Envelope::data(AdvisorResponse::new(advisor, user))))
}

#[get("/{id}/availability")]
async fn availability(
    pool: web::Data<DbPool>,
    _auth: AuthUser,
    path: web::Path<Uuid>,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<HttpResponse> {
    let advisor_id = path.into_inner();
    let query = query.into_inner();
    let (start, end) = get_date_range_opt(
        query.start_date,
        query.end_date,
        Utc::now().date_naive(),
    )?;

    let (advisor, slots) = database::with_conn(&pool, move |conn| {
        let advisor = database::assert::find_advisor(conn, advisor_id)?;
        let slots = db::booked_slots(conn, advisor_id, start, end)?;
        Ok((advisor, slots))
    })
    .await?;

    Ok(HttpResponse::Ok().json(Envelope::data(AvailabilityResponse {
        advisor_id: advisor.id,
        available_days: split_days(&advisor.available_days),
        consultation_hours: ConsultationHours {
            start: advisor.consultation_hours_start.as_ref().map(format_time_str),
            end: advisor.consultation_hours_end.as_ref().map(format_time_str),
        },
        booked_slots: slots
            .iter()
            .map(|(date, time)| BookedSlot::new(date, time))
            .collect(),
    })))
}

#[put("/profile")]
async fn update_profile(
    pool: web::Data<DbPool>,
    caller: AdvisorUser,
    info: web::Json<UpdateAdvisorRequest>,
) -> ApiResult<HttpResponse> {
    let changes = info.into_inner().validate()?;
    let advisor_id = caller.advisor.id;

    let advisor =
        database::with_conn(&pool, move |conn| db::update_profile(conn, advisor_id, changes))
            .await?;

    tracing::info!(advisor_id = %advisor.id, "advisor profile updated");
    Ok(HttpResponse::Ok().json(
        Envelope::data(AdvisorResponse::new(advisor, Some(caller.user)))
            .message("Advisor profile updated successfully"),
    ))
}
