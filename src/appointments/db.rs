use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    database::assert,
    error::{is_unique_violation, ApiError, ApiResult},
    models::{
        advisors::AdvisorData,
        appointments::{
            Appointment, AppointmentStatus, NewAppointment, StatusAction, LIVE_SLOT_INDEX,
        },
        users::{Role, UserData},
    },
};

use super::requests::Booking;

const SLOT_TAKEN: &str = "Time slot is already booked";

/// The side of an appointment the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Student(Uuid),
    /// Holds the advisor id, not the user id.
    Advisor(Uuid),
}

impl Party {
    pub fn resolve(conn: &mut PgConnection, user: &UserData) -> ApiResult<Self> {
        match user.role() {
            Some(Role::Student) => Ok(Party::Student(user.id)),
            Some(Role::Advisor) => assert::find_advisor_by_user(conn, user.id)?
                .map(|advisor| Party::Advisor(advisor.id))
                .ok_or(ApiError::NotFound("Advisor profile")),
            None => Err(ApiError::forbidden("Access denied")),
        }
    }

    pub fn owns(&self, appointment: &Appointment) -> bool {
        match *self {
            Party::Student(id) => appointment.student_id == id,
            Party::Advisor(id) => appointment.advisor_id == id,
        }
    }
}

/// An appointment with the accounts needed to render it.
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub advisor: Option<(AdvisorData, UserData)>,
    pub student: Option<UserData>,
}

pub fn book(conn: &mut PgConnection, student_id: Uuid, booking: Booking) -> ApiResult<Appointment> {
    use crate::schema::appointments;

    conn.transaction(|conn| {
        assert::find_advisor(conn, booking.advisor_id)?;

        let taken = appointments::table
            .filter(appointments::advisor_id.eq(booking.advisor_id))
            .filter(appointments::appointment_date.eq(booking.date))
            .filter(appointments::appointment_time.eq(booking.time))
            .filter(appointments::status.eq_any(AppointmentStatus::live_strs()))
            .count()
            .get_result::<i64>(conn)?;
        if taken > 0 {
            return Err(ApiError::conflict(SLOT_TAKEN));
        }

        let new_appointment = NewAppointment {
            id: Uuid::new_v4(),
            student_id,
            advisor_id: booking.advisor_id,
            appointment_date: booking.date,
            appointment_time: booking.time,
            issue_category: booking.issue_category,
            issue_description: booking.issue_description,
            status: AppointmentStatus::Pending.as_str().to_string(),
        };

        diesel::insert_into(appointments::table)
            .values(&new_appointment)
            .get_result::<Appointment>(conn)
            .map_err(|err| {
                if is_unique_violation(&err, Some(LIVE_SLOT_INDEX)) {
                    ApiError::conflict(SLOT_TAKEN)
                } else {
                    err.into()
                }
            })
    })
}

/// The caller's appointments, newest first. Cancelled ones only show up
/// when asked for explicitly.
pub fn list(
    conn: &mut PgConnection,
    party: Party,
    status: Option<AppointmentStatus>,
) -> ApiResult<Vec<Appointment>> {
    use crate::schema::appointments;

    let mut query = appointments::table.into_boxed();
    query = match party {
        Party::Student(id) => query.filter(appointments::student_id.eq(id)),
        Party::Advisor(id) => query.filter(appointments::advisor_id.eq(id)),
    };
    query = match status {
        Some(status) => query.filter(appointments::status.eq(status.as_str())),
        None => query.filter(appointments::status.ne(AppointmentStatus::Cancelled.as_str())),
    };

    Ok(query
        .order(appointments::created_at.desc())
        .then_order_by(appointments::id.asc())
        .load::<Appointment>(conn)?)
}

pub fn get(conn: &mut PgConnection, party: Party, appointment_id: Uuid) -> ApiResult<Appointment> {
    let appointment = assert::find_appointment(conn, appointment_id)?;
    if !party.owns(&appointment) {
        return Err(ApiError::forbidden("Access denied"));
    }
    Ok(appointment)
}

/// Applies `action` if the caller may and the current status allows it.
///
/// The update is conditional on the source status, so of two racing
/// transitions only one succeeds and the other sees a conflict.
pub fn transition(
    conn: &mut PgConnection,
    party: Party,
    appointment_id: Uuid,
    action: StatusAction,
) -> ApiResult<Appointment> {
    use crate::schema::appointments;

    conn.transaction(|conn| {
        let appointment = assert::find_appointment(conn, appointment_id)?;

        let permitted = match action {
            StatusAction::Approve | StatusAction::Reject => {
                matches!(party, Party::Advisor(_)) && party.owns(&appointment)
            }
            StatusAction::Complete | StatusAction::Cancel => party.owns(&appointment),
        };
        if !permitted {
            return Err(ApiError::forbidden("Access denied"));
        }

        let current = AppointmentStatus::parse(&appointment.status)
            .ok_or_else(|| anyhow::anyhow!("unknown appointment status {:?}", appointment.status))?;
        if !action.allowed_from(current) {
            return Err(ApiError::conflict(format!(
                "Cannot {} an appointment that is {}",
                action.verb(),
                current.as_str()
            )));
        }

        let sources: Vec<&str> = action.sources().iter().map(|s| s.as_str()).collect();
        diesel::update(
            appointments::table
                .filter(appointments::id.eq(appointment_id))
                .filter(appointments::status.eq_any(sources)),
        )
        .set((
            appointments::status.eq(action.target().as_str()),
            appointments::updated_at.eq(Utc::now()),
        ))
        .get_result::<Appointment>(conn)
        .optional()?
        .ok_or_else(|| ApiError::conflict("Appointment status changed concurrently"))
    })
}

/// Loads the advisor and student accounts for `appointments` in two queries.
pub fn with_details(
    conn: &mut PgConnection,
    appointments: Vec<Appointment>,
) -> ApiResult<Vec<AppointmentDetails>> {
    use crate::schema::{advisors, users};

    let advisor_ids: Vec<Uuid> = appointments.iter().map(|a| a.advisor_id).collect();
    let advisor_rows: HashMap<Uuid, AdvisorData> = advisors::table
        .filter(advisors::id.eq_any(advisor_ids))
        .load::<AdvisorData>(conn)?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let mut user_ids: Vec<Uuid> = appointments.iter().map(|a| a.student_id).collect();
    user_ids.extend(advisor_rows.values().map(|a| a.user_id));
    let accounts: HashMap<Uuid, UserData> = users::table
        .filter(users::id.eq_any(user_ids))
        .load::<UserData>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(appointments
        .into_iter()
        .map(|appointment| {
            let advisor = advisor_rows.get(&appointment.advisor_id).and_then(|advisor| {
                accounts
                    .get(&advisor.user_id)
                    .map(|user| (advisor.clone(), user.clone()))
            });
            let student = accounts.get(&appointment.student_id).cloned();
            AppointmentDetails {
                appointment,
                advisor,
                student,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::testing::{self, create_advisor, create_student};

    fn booking(advisor_id: Uuid, hour: u32) -> Booking {
        Booking {
            advisor_id,
            date: NaiveDate::from_ymd_opt(2030, 6, 3).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            issue_category: "Academic".to_string(),
            issue_description: "Thesis topic".to_string(),
        }
    }

    #[test]
    fn double_booking_conflicts() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let first = create_student(&mut conn);
        let second = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);

        let appointment = book(&mut conn, first.id, booking(advisor.id, 9)).unwrap();
        assert_eq!(appointment.status, "Pending");

        let err = book(&mut conn, second.id, booking(advisor.id, 9)).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == SLOT_TAKEN));

        book(&mut conn, second.id, booking(advisor.id, 10)).unwrap();
    }

    #[test]
    fn rejected_slot_can_be_rebooked() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);

        let appointment = book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();
        transition(
            &mut conn,
            Party::Advisor(advisor.id),
            appointment.id,
            StatusAction::Reject,
        )
        .unwrap();

        book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();
    }

    #[test]
    fn unknown_advisor_is_not_found() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);

        let err = book(&mut conn, student.id, booking(Uuid::new_v4(), 9)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Advisor")));
    }

    #[test]
    fn only_the_owning_advisor_decides() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);
        let (_, stranger) = create_advisor(&mut conn);
        let appointment = book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();

        for action in [StatusAction::Approve, StatusAction::Reject] {
            let err = transition(&mut conn, Party::Advisor(stranger.id), appointment.id, action)
                .unwrap_err();
            assert!(matches!(err, ApiError::Forbidden(_)));

            let err = transition(&mut conn, Party::Student(student.id), appointment.id, action)
                .unwrap_err();
            assert!(matches!(err, ApiError::Forbidden(_)));
        }

        let approved = transition(
            &mut conn,
            Party::Advisor(advisor.id),
            appointment.id,
            StatusAction::Approve,
        )
        .unwrap();
        assert_eq!(approved.status, "Accepted");
    }

    #[test]
    fn wrong_source_state_conflicts() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);
        let party = Party::Advisor(advisor.id);
        let appointment = book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();

        let err = transition(&mut conn, party, appointment.id, StatusAction::Complete).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        transition(&mut conn, party, appointment.id, StatusAction::Approve).unwrap();
        let err = transition(&mut conn, party, appointment.id, StatusAction::Approve).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        let err = transition(&mut conn, party, appointment.id, StatusAction::Reject).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let done = transition(
            &mut conn,
            Party::Student(student.id),
            appointment.id,
            StatusAction::Complete,
        )
        .unwrap();
        assert_eq!(done.status, "Completed");

        let err = transition(&mut conn, party, appointment.id, StatusAction::Cancel).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn completion_requires_ownership() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let other = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);
        let appointment = book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();
        transition(
            &mut conn,
            Party::Advisor(advisor.id),
            appointment.id,
            StatusAction::Approve,
        )
        .unwrap();

        let err = transition(
            &mut conn,
            Party::Student(other.id),
            appointment.id,
            StatusAction::Complete,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        transition(
            &mut conn,
            Party::Advisor(advisor.id),
            appointment.id,
            StatusAction::Complete,
        )
        .unwrap();
    }

    #[test]
    fn cancelled_appointments_leave_both_listings() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);
        let appointment = book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();
        let kept = book(&mut conn, student.id, booking(advisor.id, 11)).unwrap();

        transition(
            &mut conn,
            Party::Student(student.id),
            appointment.id,
            StatusAction::Cancel,
        )
        .unwrap();

        for party in [Party::Student(student.id), Party::Advisor(advisor.id)] {
            let ids: Vec<Uuid> = list(&mut conn, party, None)
                .unwrap()
                .iter()
                .map(|a| a.id)
                .collect();
            assert_eq!(ids, vec![kept.id]);

            let cancelled = list(&mut conn, party, Some(AppointmentStatus::Cancelled)).unwrap();
            assert_eq!(cancelled.len(), 1);
            assert_eq!(cancelled[0].id, appointment.id);
        }

        // the freed slot is bookable again
        book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();
    }

    #[test]
    fn reading_requires_ownership() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let other = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);
        let appointment = book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();

        assert!(get(&mut conn, Party::Student(student.id), appointment.id).is_ok());
        assert!(get(&mut conn, Party::Advisor(advisor.id), appointment.id).is_ok());
        assert!(matches!(
            get(&mut conn, Party::Student(other.id), appointment.id),
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            get(&mut conn, Party::Student(student.id), Uuid::new_v4()),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn details_carry_both_accounts() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let (advisor_user, advisor) = create_advisor(&mut conn);
        let appointment = book(&mut conn, student.id, booking(advisor.id, 9)).unwrap();

        let details = with_details(&mut conn, vec![appointment]).unwrap();
        let (loaded_advisor, loaded_user) = details[0].advisor.as_ref().unwrap();
        assert_eq!(loaded_advisor.id, advisor.id);
        assert_eq!(loaded_user.id, advisor_user.id);
        assert_eq!(details[0].student.as_ref().unwrap().id, student.id);

        let party = Party::resolve(&mut conn, &advisor_user).unwrap();
        assert_eq!(party, Party::Advisor(advisor.id));
    }
}
