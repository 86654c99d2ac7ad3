use crate::schema::feedback;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = feedback)]
pub struct Feedback {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = feedback)]
pub struct NewFeedback {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

/// Unique constraint Postgres generates for `feedback(appointment_id)`.
pub const ONE_PER_APPOINTMENT: &str = "feedback_appointment_id_key";

/// Mean rating rounded to one decimal place; zero when there is none.
pub fn average_rating(ratings: &[i16]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[5]), 5.0);
        assert_eq!(average_rating(&[4, 5, 5]), 4.7);
        assert_eq!(average_rating(&[1, 2]), 1.5);
    }
}
