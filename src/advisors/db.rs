use chrono::{NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    database::assert,
    error::{ApiError, ApiResult},
    models::{
        advisors::{AdvisorData, UpdateAdvisor},
        appointments::AppointmentStatus,
        users::UserData,
    },
};

/// Every advisor with the owning user account, ordered by last name.
pub fn list_advisors(conn: &mut PgConnection) -> ApiResult<Vec<(AdvisorData, UserData)>> {
    use crate::schema::{advisors, users};

    Ok(advisors::table
        .inner_join(users::table.on(users::id.eq(advisors::user_id)))
        .order((users::last_name.asc(), users::first_name.asc()))
        .select((advisors::all_columns, users::all_columns))
        .load::<(AdvisorData, UserData)>(conn)?)
}

pub fn get_advisor(
    conn: &mut PgConnection,
    advisor_id: Uuid,
) -> ApiResult<(AdvisorData, Option<UserData>)> {
    let advisor = assert::find_advisor(conn, advisor_id)?;
    let user = match assert::find_user(conn, advisor.user_id) {
        Ok(user) => Some(user),
        Err(crate::error::ApiError::NotFound(_)) => None,
        Err(err) => return Err(err),
    };
    Ok((advisor, user))
}

/// Slots in `[start, end]` held by a Pending or Accepted appointment.
pub fn booked_slots(
    conn: &mut PgConnection,
    advisor_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<(NaiveDate, NaiveTime)>> {
    use crate::schema::appointments;

    Ok(appointments::table
        .filter(appointments::advisor_id.eq(advisor_id))
        .filter(appointments::status.eq_any(AppointmentStatus::live_strs()))
        .filter(appointments::appointment_date.between(start, end))
        .order((
            appointments::appointment_date.asc(),
            appointments::appointment_time.asc(),
        ))
        .select((appointments::appointment_date, appointments::appointment_time))
        .load(conn)?)
}

/// Applies `changes`, checking consultation hours against the stored row
/// when only one end is being changed.
pub fn update_profile(
    conn: &mut PgConnection,
    advisor_id: Uuid,
    mut changes: UpdateAdvisor,
) -> ApiResult<AdvisorData> {
    use crate::schema::advisors;

    conn.transaction(|conn| {
        let current = advisors::table
            .find(advisor_id)
            .for_update()
            .get_result::<AdvisorData>(conn)
            .optional()?
            .ok_or(ApiError::NotFound("Advisor"))?;

        let start = changes
            .consultation_hours_start
            .or(current.consultation_hours_start);
        let end = changes.consultation_hours_end.or(current.consultation_hours_end);
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err(ApiError::Validation(
                    "Consultation hours must start before they end".to_string(),
                ));
            }
        }

        changes.updated_at = Some(Utc::now());
        Ok(diesel::update(advisors::table.find(advisor_id))
            .set(&changes)
            .get_result::<AdvisorData>(conn)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::appointments::NewAppointment,
        testing::{self, create_advisor, create_student},
    };

    fn book(
        conn: &mut PgConnection,
        student: Uuid,
        advisor: Uuid,
        date: NaiveDate,
        hour: u32,
        status: AppointmentStatus,
    ) {
        use crate::schema::appointments;

        diesel::insert_into(appointments::table)
            .values(NewAppointment {
                id: Uuid::new_v4(),
                student_id: student,
                advisor_id: advisor,
                appointment_date: date,
                appointment_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                issue_category: "Academic".into(),
                issue_description: "Course selection".into(),
                status: status.as_str().into(),
            })
            .execute(conn)
            .unwrap();
    }

    #[test]
    fn booked_slots_cover_live_states_in_range() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let student = create_student(&mut conn);
        let (_, advisor) = create_advisor(&mut conn);
        let day = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();

        book(&mut conn, student.id, advisor.id, day, 9, AppointmentStatus::Pending);
        book(&mut conn, student.id, advisor.id, day, 10, AppointmentStatus::Accepted);
        book(&mut conn, student.id, advisor.id, day, 11, AppointmentStatus::Rejected);
        book(&mut conn, student.id, advisor.id, day, 12, AppointmentStatus::Cancelled);
        let later = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();
        book(&mut conn, student.id, advisor.id, later, 9, AppointmentStatus::Pending);

        let slots = booked_slots(&mut conn, advisor.id, day, day).unwrap();
        let hours: Vec<_> = slots.iter().map(|(_, t)| t.format("%H").to_string()).collect();
        assert_eq!(hours, vec!["09", "10"]);
    }

    #[test]
    fn profile_update_keeps_unset_fields() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let (_, advisor) = create_advisor(&mut conn);

        let updated = update_profile(
            &mut conn,
            advisor.id,
            UpdateAdvisor {
                bio: Some("Office B12".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("Office B12"));
        assert_eq!(updated.department, advisor.department);
        assert_eq!(updated.available_days, advisor.available_days);
    }

    #[test]
    fn hours_stay_ordered_across_partial_updates() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let (_, advisor) = create_advisor(&mut conn);
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();

        update_profile(
            &mut conn,
            advisor.id,
            UpdateAdvisor {
                consultation_hours_start: Some(at(15)),
                ..Default::default()
            },
        )
        .unwrap();

        let err = update_profile(
            &mut conn,
            advisor.id,
            UpdateAdvisor {
                consultation_hours_end: Some(at(9)),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let stored = update_profile(
            &mut conn,
            advisor.id,
            UpdateAdvisor {
                consultation_hours_end: Some(at(17)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(stored.consultation_hours_start, Some(at(15)));
        assert_eq!(stored.consultation_hours_end, Some(at(17)));
    }

    #[test]
    fn listing_joins_accounts() {
        let Some(mut conn) = testing::test_conn() else {
            return;
        };
        let (user, advisor) = create_advisor(&mut conn);

        let all = list_advisors(&mut conn).unwrap();
        let (found, account) = all.iter().find(|(a, _)| a.id == advisor.id).unwrap();
        assert_eq!(found.user_id, user.id);
        assert_eq!(account.email, user.email);

        let (_, account) = get_advisor(&mut conn, advisor.id).unwrap();
        assert_eq!(account.unwrap().id, user.id);
        assert!(get_advisor(&mut conn, Uuid::new_v4()).is_err());
    }
}
