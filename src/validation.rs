//! Request shape checks shared by the handlers.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("Invalid {field} format (expected {expected})")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("Invalid {field} value: '{value}'")]
    InvalidVariant { field: &'static str, value: String },

    #[error("{0}")]
    Rule(&'static str),
}

/// Trims `value` and rejects it when nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value.to_string())
}

/// Trims an optional free-text field; blank input becomes `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Returns the normalized (trimmed, lower-cased) address.
pub fn email(value: &str) -> Result<String, ValidationError> {
    let invalid = ValidationError::InvalidFormat {
        field: "email",
        expected: "name@domain.tld",
    };

    let value = value.trim().to_lowercase();
    if value.chars().any(char::is_whitespace) {
        return Err(invalid);
    }
    let (local, domain) = match value.split_once('@') {
        Some(parts) => parts,
        None => return Err(invalid),
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid);
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid);
    }

    Ok(value)
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "Password",
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub fn date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field,
            expected: "YYYY-MM-DD",
        }
    })
}

/// Accepts `HH:MM:SS` and the shorter `HH:MM`.
pub fn time(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ValidationError::InvalidFormat {
            field,
            expected: "HH:MM:SS",
        })
}

pub fn rating(value: i64) -> Result<i16, ValidationError> {
    if !(1..=5).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "Rating",
            min: 1,
            max: 5,
        });
    }
    Ok(value as i16)
}

/// Normalizes a comma separated list of day names, e.g. `"monday, Wed"` is
/// rejected while `"monday,Wednesday"` becomes `"Monday,Wednesday"`.
pub fn weekdays(value: &str) -> Result<String, ValidationError> {
    let mut days = Vec::new();
    for day in value.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        let canonical = WEEKDAYS
            .iter()
            .find(|w| w.eq_ignore_ascii_case(day))
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "available day",
                value: day.to_string(),
            })?;
        if !days.contains(canonical) {
            days.push(*canonical);
        }
    }
    Ok(days.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(email("  Jane.Doe@Uni.EDU ").unwrap(), "jane.doe@uni.edu");
    }

    #[test]
    fn malformed_emails() {
        for bad in ["", "plain", "@uni.edu", "a@b", "a@@b.com", "a b@c.com", "a@.com", "a@c."] {
            assert!(email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn password_length() {
        assert!(password("12345").is_err());
        assert!(password("123456").is_ok());
        assert_eq!(
            password("abc").unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn required_trims() {
        assert_eq!(required("First name", "  Ada ").unwrap(), "Ada");
        assert_eq!(
            required("First name", "   ").unwrap_err(),
            ValidationError::Empty { field: "First name" }
        );
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" ok ".into())), Some("ok".into()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn time_formats() {
        assert_eq!(
            time("time", "09:30:00").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            time("time", "14:05").unwrap(),
            NaiveTime::from_hms_opt(14, 5, 0).unwrap()
        );
        assert!(time("time", "24:00:00").is_err());
        assert!(time("time", "9am").is_err());
    }

    #[test]
    fn date_format() {
        assert_eq!(
            date("date", "2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(date("date", "01/03/2025").is_err());
    }

    #[test]
    fn rating_bounds() {
        assert!(rating(0).is_err());
        assert_eq!(rating(1).unwrap(), 1);
        assert_eq!(rating(5).unwrap(), 5);
        assert!(rating(6).is_err());
    }

    #[test]
    fn weekday_list() {
        assert_eq!(
            weekdays("monday, WEDNESDAY,Monday").unwrap(),
            "Monday,Wednesday"
        );
        assert_eq!(weekdays("").unwrap(), "");
        assert!(weekdays("Mon").is_err());
    }
}
