pub mod db;
pub(crate) mod requests;
mod responses;

use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    auth::extractors::{AdvisorUser, AuthUser, StudentUser},
    database,
    error::ApiResult,
    models::{
        appointments::{Appointment, StatusAction},
        notifications::{
            KIND_APPOINTMENT_APPROVED, KIND_APPOINTMENT_REJECTED, KIND_APPOINTMENT_REQUEST,
        },
    },
    notifications::dispatch::{self, Dispatch},
    protocol::Envelope,
    push::PushClient,
    DbPool,
};

use self::{
    db::{AppointmentDetails, Party},
    requests::*,
    responses::*,
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(create_appointment)
        .service(list_appointments)
        .service(get_appointment)
        .service(approve_appointment)
        .service(reject_appointment)
        .service(complete_appointment)
        .service(cancel_appointment);
}

#[post("")]
async fn create_appointment(
    pool: web::Data<DbPool>,
    push: web::Data<PushClient>,
    StudentUser(student): StudentUser,
    info: web::Json<CreateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    let booking = info.into_inner().validate()?;
    let student_id = student.id;

    let details = database::with_conn(&pool, move |conn| {
        let appointment = db::book(conn, student_id, booking)?;
        single_with_details(conn, appointment)
    })
    .await?;

    tracing::info!(
        appointment_id = %details.appointment.id,
        advisor_id = %details.appointment.advisor_id,
        %student_id,
        "appointment booked"
    );

    if let Some((_, advisor_user)) = &details.advisor {
        let name = student.full_name();
        dispatch::spawn(
            pool.clone(),
            push.clone(),
            Dispatch {
                user_id: advisor_user.id,
                appointment_id: Some(details.appointment.id),
                kind: KIND_APPOINTMENT_REQUEST,
                title: "New Appointment Request".to_string(),
                message: format!("You have a new appointment request from {}", name),
                push_title: "New Appointment Request".to_string(),
                push_body: format!("{} requested an appointment", name),
            },
        );
    }

    Ok(HttpResponse::Created().json(
        Envelope::data(AppointmentResponse::from(details))
            .message("Appointment created successfully"),
    ))
}

#[get("")]
async fn list_appointments(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let status = query.status()?;

    let appointments = database::with_conn(&pool, move |conn| {
        let party = Party::resolve(conn, &auth.user)?;
        let appointments = db::list(conn, party, status)?;
        db::with_details(conn, appointments)
    })
    .await?;

    let data: Vec<AppointmentResponse> = appointments.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(Envelope::data(data)))
}

#[get("/{id}")]
async fn get_appointment(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let appointment_id = path.into_inner();

    let details = database::with_conn(&pool, move |conn| {
        let party = Party::resolve(conn, &auth.user)?;
        let appointment = db::get(conn, party, appointment_id)?;
        single_with_details(conn, appointment)
    })
    .await?;

    Ok(HttpResponse::Ok().json(Envelope::data(AppointmentResponse::from(details))))
}

#[put("/{id}/approve")]
async fn approve_appointment(
    pool: web::Data<DbPool>,
    push: web::Data<PushClient>,
    caller: AdvisorUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let appointment =
        decide(&pool, Party::Advisor(caller.advisor.id), path.into_inner(), StatusAction::Approve)
            .await?;

    dispatch::spawn(
        pool.clone(),
        push.clone(),
        Dispatch {
            user_id: appointment.student_id,
            appointment_id: Some(appointment.id),
            kind: KIND_APPOINTMENT_APPROVED,
            title: "Appointment Approved".to_string(),
            message: "Your appointment has been approved".to_string(),
            push_title: "Appointment Approved".to_string(),
            push_body: "Your appointment request has been approved".to_string(),
        },
    );

    Ok(HttpResponse::Ok().json(
        Envelope::data(StatusResponse::from(appointment))
            .message("Appointment approved successfully"),
    ))
}

#[put("/{id}/reject")]
async fn reject_appointment(
    pool: web::Data<DbPool>,
    push: web::Data<PushClient>,
    caller: AdvisorUser,
    path: web::Path<Uuid>,
    info: Option<web::Json<RejectRequest>>,
) -> ApiResult<HttpResponse> {
    let reason = info
        .and_then(|info| info.into_inner().reason)
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let appointment =
        decide(&pool, Party::Advisor(caller.advisor.id), path.into_inner(), StatusAction::Reject)
            .await?;

    dispatch::spawn(
        pool.clone(),
        push.clone(),
        Dispatch {
            user_id: appointment.student_id,
            appointment_id: Some(appointment.id),
            kind: KIND_APPOINTMENT_REJECTED,
            title: "Appointment Rejected".to_string(),
            message: reason
                .clone()
                .unwrap_or_else(|| "Your appointment has been rejected".to_string()),
            push_title: "Appointment Rejected".to_string(),
            push_body: reason
                .unwrap_or_else(|| "Your appointment request was not approved".to_string()),
        },
    );

    Ok(HttpResponse::Ok().json(
        Envelope::data(StatusResponse::from(appointment))
            .message("Appointment rejected successfully"),
    ))
}

#[put("/{id}/complete")]
async fn complete_appointment(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let appointment_id = path.into_inner();

    let appointment = database::with_conn(&pool, move |conn| {
        let party = Party::resolve(conn, &auth.user)?;
        db::transition(conn, party, appointment_id, StatusAction::Complete)
    })
    .await?;

    tracing::info!(%appointment_id, "appointment completed");
    Ok(HttpResponse::Ok().json(
        Envelope::data(StatusResponse::from(appointment))
            .message("Appointment marked as completed"),
    ))
}

#[delete("/{id}")]
async fn cancel_appointment(
    pool: web::Data<DbPool>,
    auth: AuthUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let appointment_id = path.into_inner();

    let appointment = database::with_conn(&pool, move |conn| {
        let party = Party::resolve(conn, &auth.user)?;
        db::transition(conn, party, appointment_id, StatusAction::Cancel)
    })
    .await?;

    tracing::info!(%appointment_id, "appointment cancelled");
    Ok(HttpResponse::Ok().json(
        Envelope::data(StatusResponse::from(appointment))
            .message("Appointment cancelled successfully"),
    ))
}

async fn decide(
    pool: &web::Data<DbPool>,
    party: Party,
    appointment_id: Uuid,
    action: StatusAction,
) -> ApiResult<Appointment> {
    let appointment = database::with_conn(pool, move |conn| {
        db::transition(conn, party, appointment_id, action)
    })
    .await?;

    tracing::info!(
        %appointment_id,
        action = action.verb(),
        status = %appointment.status,
        "appointment status changed"
    );
    Ok(appointment)
}

fn single_with_details(
    conn: &mut diesel::PgConnection,
    appointment: Appointment,
) -> ApiResult<AppointmentDetails> {
    db::with_details(conn, vec![appointment])?
        .pop()
        .ok_or_else(|| anyhow::anyhow!("appointment details went missing").into())
}
