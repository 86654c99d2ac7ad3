use crate::schema::appointments;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = appointments)]
pub struct Appointment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub issue_category: String,
    pub issue_description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub advisor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub issue_category: String,
    pub issue_description: String,
    pub status: String,
}

/// Name of the partial unique index guarding live slots.
pub const LIVE_SLOT_INDEX: &str = "appointments_live_slot_idx";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// States that occupy an advisor's slot.
    pub const LIVE: [AppointmentStatus; 2] = [AppointmentStatus::Pending, AppointmentStatus::Accepted];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Accepted => "Accepted",
            AppointmentStatus::Rejected => "Rejected",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(AppointmentStatus::Pending),
            "Accepted" => Some(AppointmentStatus::Accepted),
            "Rejected" => Some(AppointmentStatus::Rejected),
            "Completed" => Some(AppointmentStatus::Completed),
            "Cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn live_strs() -> [&'static str; 2] {
        Self::LIVE.map(|s| s.as_str())
    }
}

/// An action moving an appointment between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Approve,
    Reject,
    Complete,
    Cancel,
}

impl StatusAction {
    pub fn sources(&self) -> &'static [AppointmentStatus] {
        use AppointmentStatus::*;
        match self {
            StatusAction::Approve | StatusAction::Reject => &[Pending],
            StatusAction::Complete => &[Accepted],
            StatusAction::Cancel => &[Pending, Accepted],
        }
    }

    pub fn target(&self) -> AppointmentStatus {
        match self {
            StatusAction::Approve => AppointmentStatus::Accepted,
            StatusAction::Reject => AppointmentStatus::Rejected,
            StatusAction::Complete => AppointmentStatus::Completed,
            StatusAction::Cancel => AppointmentStatus::Cancelled,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            StatusAction::Approve => "approve",
            StatusAction::Reject => "reject",
            StatusAction::Complete => "complete",
            StatusAction::Cancel => "cancel",
        }
    }

    pub fn allowed_from(&self, status: AppointmentStatus) -> bool {
        self.sources().contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn status_strings_roundtrip() {
        for s in [Pending, Accepted, Rejected, Completed, Cancelled] {
            assert_eq!(AppointmentStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(AppointmentStatus::parse("pending"), None);
    }

    #[test]
    fn transitions() {
        assert!(StatusAction::Approve.allowed_from(Pending));
        assert!(!StatusAction::Approve.allowed_from(Rejected));
        assert!(!StatusAction::Reject.allowed_from(Accepted));
        assert!(StatusAction::Complete.allowed_from(Accepted));
        assert!(!StatusAction::Complete.allowed_from(Pending));
        assert!(StatusAction::Cancel.allowed_from(Accepted));
        assert!(!StatusAction::Cancel.allowed_from(Completed));
        assert!(!StatusAction::Cancel.allowed_from(Cancelled));
    }

    #[test]
    fn terminal_states_have_no_exit() {
        for action in [
            StatusAction::Approve,
            StatusAction::Reject,
            StatusAction::Complete,
            StatusAction::Cancel,
        ] {
            for terminal in [Rejected, Completed, Cancelled] {
                assert!(!action.allowed_from(terminal));
            }
        }
    }

    #[test]
    fn live_states() {
        assert_eq!(AppointmentStatus::live_strs(), ["Pending", "Accepted"]);
    }
}
