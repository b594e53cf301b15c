//! Date-of-birth parsing and age eligibility

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

use crate::error::ValidationError;

/// Parses a date of birth given as `YYYY-MM-DD`, an RFC 3339 timestamp, or a
/// naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp.
pub fn parse_dob(dob: &str) -> Result<NaiveDate, ValidationError> {
    let dob = dob.trim();

    if let Ok(date) = NaiveDate::parse_from_str(dob, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(dob) {
        return Ok(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(dob, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|timestamp| timestamp.date())
        .map_err(|_| ValidationError::InvalidDate(dob.to_string()))
}

/// Parses masked form input in `DD/MM/YYYY` order. Separators are ignored;
/// exactly eight digits are required and the date must exist.
pub fn parse_dob_entry(raw: &str) -> Result<NaiveDate, ValidationError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 8 {
        return Err(ValidationError::IncompleteDate(raw.to_string()));
    }

    let invalid = || ValidationError::InvalidDate(raw.to_string());
    let day: u32 = digits[0..2].parse().map_err(|_| invalid())?;
    let month: u32 = digits[2..4].parse().map_err(|_| invalid())?;
    let year: i32 = digits[4..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Whole years between `dob` and `today`. Negative for future dates.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Age check against an explicit reference date.
pub fn is_at_least_age_on(dob: NaiveDate, min_age: u32, today: NaiveDate) -> bool {
    i64::from(age_on(dob, today)) >= i64::from(min_age)
}

/// Returns true if the person born on `dob` is at least `min_age` years old
/// today. An unparseable `dob` returns false.
pub fn is_at_least_age(dob: &str, min_age: u32) -> bool {
    match parse_dob(dob) {
        Ok(date) => is_at_least_age_on(date, min_age, Local::now().date_naive()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn years_ago(years: u32) -> NaiveDate {
        Local::now()
            .date_naive()
            .checked_sub_months(Months::new(years * 12))
            .unwrap()
    }

    #[test]
    fn test_age_relative_to_today() {
        let over18 = years_ago(20).format("%Y-%m-%d").to_string();
        assert!(is_at_least_age(&over18, 18));

        let under18 = years_ago(10).format("%Y-%m-%d").to_string();
        assert!(!is_at_least_age(&under18, 18));
    }

    #[test]
    fn test_accepts_iso_timestamps() {
        let stamp = (Utc::now() - chrono::Duration::days(365 * 20 + 10)).to_rfc3339();
        assert!(is_at_least_age(&stamp, 18));
        assert_eq!(parse_dob("2004-05-06T13:45:00.000Z"), Ok(ymd(2004, 5, 6)));
        assert_eq!(parse_dob("2004-05-06T13:45:00"), Ok(ymd(2004, 5, 6)));
    }

    #[test]
    fn test_birthday_boundary() {
        let dob = ymd(2008, 10, 19);
        assert_eq!(age_on(dob, ymd(2026, 10, 18)), 17);
        assert_eq!(age_on(dob, ymd(2026, 10, 19)), 18);
        assert!(!is_at_least_age_on(dob, 18, ymd(2026, 10, 18)));
        assert!(is_at_least_age_on(dob, 18, ymd(2026, 10, 19)));
    }

    #[test]
    fn test_leap_day_birthday() {
        let dob = ymd(2004, 2, 29);
        assert_eq!(age_on(dob, ymd(2022, 2, 28)), 17);
        assert_eq!(age_on(dob, ymd(2022, 3, 1)), 18);
    }

    #[test]
    fn test_future_date_is_negative() {
        assert_eq!(age_on(ymd(2030, 1, 1), ymd(2026, 1, 1)), -4);
        assert!(!is_at_least_age_on(ymd(2030, 1, 1), 0, ymd(2026, 1, 1)));
    }

    #[test]
    fn test_unparseable_dob_fails_closed() {
        assert!(!is_at_least_age("not a date", 0));
        assert!(!is_at_least_age("", 18));
        assert_eq!(
            parse_dob("2001-02-31"),
            Err(ValidationError::InvalidDate("2001-02-31".into()))
        );
    }

    #[test]
    fn test_dob_entry() {
        assert_eq!(parse_dob_entry("07/03/1995"), Ok(ymd(1995, 3, 7)));
        assert_eq!(parse_dob_entry("07031995"), Ok(ymd(1995, 3, 7)));
        assert_eq!(
            parse_dob_entry("31/02/2001"),
            Err(ValidationError::InvalidDate("31/02/2001".into()))
        );
        assert_eq!(
            parse_dob_entry("07/03/95"),
            Err(ValidationError::IncompleteDate("07/03/95".into()))
        );
    }
}
