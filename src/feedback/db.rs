use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    database::assert,
    error::{is_unique_violation, ApiError, ApiResult},
    models::{
        appointments::AppointmentStatus,
        feedback::{Feedback, NewFeedback, ONE_PER_APPOINTMENT},
        users::UserData,
    },
};

use super::requests::Submission;

const ALREADY_SUBMITTED: &str = "Feedback already submitted for this appointment";

/// Records feedback for one of the student's completed appointments.
pub fn submit(
    conn: &mut PgConnection,
    student_id: Uuid,
    submission: Submission,
) -> ApiResult<Feedback> {
    use crate::schema::feedback;

    conn.transaction(|conn| {
        let appointment = assert::find_appointment(conn, submission.appointment_id)?;
        if appointment.student_id != student_id {
            return Err(ApiError::NotFound("Appointment"));
        }
        if appointment.status != AppointmentStatus::Completed.as_str() {
            return Err(ApiError::conflict(
                "Feedback can only be given for completed appointments",
            ));
        }

        let existing = feedback::table
            .filter(feedback::appointment_id.eq(appointment.id))
            .count()
            .get_result::<i64>(conn)?;
        if existing > 0 {
            return Err(ApiError::conflict(ALREADY_SUBMITTED));
        }

        diesel::insert_into(feedback::table)
            .values(NewFeedback {
                id: Uuid::new_v4(),
                appointment_id: appointment.id,
                student_id,
                advisor_id: appointment.advisor_id,
                rating: submission.rating,
                comment: submission.comment,
            })
            .get_result::<Feedback>(conn)
            .map_err(|err| {
                if is_unique_violation(&err, Some(ONE_PER_APPOINTMENT)) {
                    ApiError::conflict(ALREADY_SUBMITTED)
                } else {
                    err.into()
                }
            })
    })
}

pub fn by_appointment(conn: &mut PgConnection, appointment_id: Uuid) -> ApiResult<Feedback> {
    use crate::schema::feedback;

    feedback::table
        .filter(feedback::appointment_id.eq(appointment_id))
        .get_result::<Feedback>(conn)
        .optional()?
        .ok_or(ApiError::NotFound("Feedback"))
}

/// Newest first, each with the student who left it.
pub fn by_advisor(
    conn: &mut PgConnection,
    advisor_id: Uuid,
) -> ApiResult<Vec<(Feedback, Option<UserData>)>> {
    use crate::schema::{feedback, users};

    assert::find_advisor(conn, advisor_id)?;

    Ok(feedback::table
        .left_join(users::table.on(users::id.eq(feedback::student_id)))
        .filter(feedback::advisor_id.eq(advisor_id))
        .order(feedback::created_at.desc())
        .select((feedback::all_columns, users::all_columns.nullable()))
        .load::<(Feedback, Option<UserData>)>(conn)?)
}
