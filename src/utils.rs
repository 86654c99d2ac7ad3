use blake2::{Blake2b, Digest};
use chrono::{Duration, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::validation::{self, ValidationError};

const DEFAULT_AVAILABILITY_DAYS: i64 = 30;

/// Salted blake2b digest stored as `salt$hex`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest_password(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hashed)) => digest_password(salt, password) == hashed,
        None => false,
    }
}

fn digest_password(salt: &str, password: &str) -> String {
    format!("{:x}", Blake2b::digest(format!("{}{}", salt, password).as_bytes()))
}

pub fn generate_login_token(user_id: &Uuid) -> String {
    let seed = format!("{}:{}", user_id, Uuid::new_v4());
    format!("{:x}", Blake2b::digest(seed.as_bytes()))
}

pub fn format_time_str(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub fn format_date_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name).trim().to_string()
}

/// Inclusive date window; missing bounds default to `today ..= today + 30 days`.
pub fn get_date_range_opt<S1: AsRef<str>, S2: AsRef<str>>(
    start_date: Option<S1>,
    end_date: Option<S2>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let start = match start_date {
        Some(s) => validation::date("startDate", s.as_ref())?,
        None => today,
    };
    let end = match end_date {
        Some(s) => validation::date("endDate", s.as_ref())?,
        None => today + Duration::days(DEFAULT_AVAILABILITY_DAYS),
    };
    if start > end {
        return Err(ValidationError::Rule("startDate must not be after endDate"));
    }
    Ok((start, end))
}

/// Splits the stored comma separated day list.
pub fn split_days(days: &str) -> Vec<String> {
    days.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let stored = hash_password("hunter22");
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
        assert!(!verify_password("hunter22", "no-salt-here"));
    }

    #[test]
    fn password_hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn login_tokens_are_unique() {
        let id = Uuid::new_v4();
        let a = generate_login_token(&id);
        let b = generate_login_token(&id);
        assert_ne!(a, b);
        assert_eq!(a.len(), 128);
    }

    #[test]
    fn date_range_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let (start, end) = get_date_range_opt::<&str, &str>(None, None, today).unwrap();
        assert_eq!(start, today);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 2, 9).unwrap());
    }

    #[test]
    fn date_range_rejects_inverted() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(get_date_range_opt(Some("2025-02-01"), Some("2025-01-01"), today).is_err());
        assert!(get_date_range_opt(Some("02/01/2025"), None::<&str>, today).is_err());
    }

    #[test]
    fn days_split() {
        assert_eq!(split_days("Monday, Friday,"), vec!["Monday", "Friday"]);
        assert!(split_days("").is_empty());
    }

    #[test]
    fn names() {
        assert_eq!(full_name("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(full_name("Ada", ""), "Ada");
    }
}
