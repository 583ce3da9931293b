use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an API timestamp. Accepts RFC 3339, a naive date-time (read as UTC)
/// or a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// A date filter value: either a whole day or an exact instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl DateBound {
    /// First instant covered by the bound.
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            DateBound::Day(date) => date.and_time(NaiveTime::MIN).and_utc(),
            DateBound::Instant(instant) => *instant,
        }
    }

    /// Last instant covered by the bound (23:59:59.999 for a whole day).
    pub fn end(&self) -> DateTime<Utc> {
        match self {
            DateBound::Day(_) => self.start() + Duration::days(1) - Duration::milliseconds(1),
            DateBound::Instant(instant) => *instant,
        }
    }
}

pub fn parse_date_bound(value: &str) -> Option<DateBound> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(DateBound::Day(date));
    }
    parse_timestamp(value).map(DateBound::Instant)
}

/// `YYYY-MM-DD` for a timestamp, or the raw leading date text when it does not parse.
pub fn date_label(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => value.trim().chars().take(10).collect(),
    }
}
