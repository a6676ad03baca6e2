//! Human-readable relative timestamps ("3 minutes ago").
//!
//! Thresholds follow the common "from now" convention used by web UIs:
//! values are rounded to the nearest unit and each unit hands over to the
//! next one before it reaches its natural maximum (45 minutes become
//! "an hour", 22 hours become "a day", and so on).

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
/// Average Gregorian month (30.436875 days).
const MONTH: i64 = 2_629_746;
/// Average Gregorian year (365.2425 days).
const YEAR: i64 = 31_556_952;

/// Formats `then` relative to `now`, e.g. `"a few seconds ago"` or `"in 2 days"`.
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let phrase = humanize(delta.unsigned_abs().min(i64::MAX as u64) as i64);

    if delta >= 0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

/// Formats `then` relative to the current time.
pub fn since(then: DateTime<Utc>) -> String {
    from_now(then, Utc::now())
}

fn humanize(seconds: i64) -> String {
    let minutes = round_div(seconds, MINUTE);
    let hours = round_div(seconds, HOUR);
    let days = round_div(seconds, DAY);
    let months = round_div(seconds, MONTH);
    let years = round_div(seconds, YEAR);

    if seconds < 45 {
        "a few seconds".to_string()
    } else if minutes <= 1 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{minutes} minutes")
    } else if hours <= 1 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{hours} hours")
    } else if days <= 1 {
        "a day".to_string()
    } else if days < 26 {
        format!("{days} days")
    } else if months <= 1 {
        "a month".to_string()
    } else if months < 11 {
        format!("{months} months")
    } else if years <= 1 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

fn round_div(value: i64, unit: i64) -> i64 {
    value.saturating_add(unit / 2) / unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(d: Duration) -> String {
        let now = Utc::now();
        from_now(now - d, now)
    }

    #[test]
    fn test_seconds() {
        assert_eq!(ago(Duration::zero()), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(44)), "a few seconds ago");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(ago(Duration::seconds(45)), "a minute ago");
        assert_eq!(ago(Duration::seconds(89)), "a minute ago");
        assert_eq!(ago(Duration::seconds(90)), "2 minutes ago");
        assert_eq!(ago(Duration::minutes(44)), "44 minutes ago");
    }

    #[test]
    fn test_hours() {
        assert_eq!(ago(Duration::minutes(45)), "an hour ago");
        assert_eq!(ago(Duration::hours(3)), "3 hours ago");
        assert_eq!(ago(Duration::hours(21)), "21 hours ago");
        assert_eq!(ago(Duration::hours(22)), "a day ago");
    }

    #[test]
    fn test_days_months_years() {
        assert_eq!(ago(Duration::days(5)), "5 days ago");
        assert_eq!(ago(Duration::days(26)), "a month ago");
        assert_eq!(ago(Duration::days(100)), "3 months ago");
        assert_eq!(ago(Duration::days(340)), "a year ago");
        assert_eq!(ago(Duration::days(365 * 3)), "3 years ago");
    }

    #[test]
    fn test_future() {
        let now = Utc::now();
        assert_eq!(from_now(now + Duration::hours(3), now), "in 3 hours");
    }
}
