pub mod db;
mod requests;
mod responses;

use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    auth::extractors::{AuthUser, StudentUser},
    database,
    error::ApiResult,
    models::feedback::average_rating,
    protocol::Envelope,
    DbPool,
};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_feedback)
        .service(advisor_feedback)
        .service(appointment_feedback);
}

#[post("")]
async fn submit_feedback(
    pool: web::Data<DbPool>,
    StudentUser(student): StudentUser,
    info: web::Json<SubmitFeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let submission = info.into_inner().validate()?;
    let student_id = student.id;

    let feedback =
        database::with_conn(&pool, move |conn| db::submit(conn, student_id, submission)).await?;

    tracing::info!(
        appointment_id = %feedback.appointment_id,
        rating = feedback.rating,
        "feedback submitted"
    );
    Ok(HttpResponse::Created().json(
        Envelope::data(FeedbackResponse::from(feedback))
            .message("Feedback submitted successfully"),
    ))
}

#[get("/advisor/{advisor_id}")]
async fn advisor_feedback(
    pool: web::Data<DbPool>,
    _auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let advisor_id = path.into_inner();
    let rows = database::with_conn(&pool, move |conn| db::by_advisor(conn, advisor_id)).await?;

    let ratings: Vec<i16> = rows.iter().map(|(f, _)| f.rating).collect();
    let feedback: Vec<AdvisorFeedbackItem> = rows
        .into_iter()
        .map(|(f, student)| AdvisorFeedbackItem::new(f, student))
        .collect();

    Ok(HttpResponse::Ok().json(Envelope::data(AdvisorFeedbackResponse {
        average_rating: average_rating(&ratings),
        total_ratings: feedback.len(),
        feedback,
    })))
}

#[get("/{appointment_id}")]
async fn appointment_feedback(
    pool: web::Data<DbPool>,
    _auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let appointment_id = path.into_inner();
    let feedback =
        database::with_conn(&pool, move |conn| db::by_appointment(conn, appointment_id)).await?;

    Ok(HttpResponse::Ok().json(Envelope::data(FeedbackResponse::from(feedback))))
}
