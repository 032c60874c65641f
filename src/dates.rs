//! Lenient start-date parsing and per-day labels.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};

/// Parses a start date typed by a person or sent by a form.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, `dd/mm/yyyy` (or `d/m/yy`),
/// and integer Unix timestamps in milliseconds.
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_integer(trimmed) {
        let millis = trimmed.parse::<i64>().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|datetime| datetime.date_naive());
    }

    if trimmed.contains('/') {
        return parse_day_month_year(trimmed);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|datetime| datetime.date())
}

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD` labels for `days` consecutive days starting at `start`.
pub fn day_labels(start: NaiveDate, days: usize) -> Vec<String> {
    (0..days)
        .map(|offset| {
            let date = i64::try_from(offset)
                .ok()
                .and_then(|offset| start.checked_add_signed(Duration::days(offset)))
                .unwrap_or(start);
            date.format("%Y-%m-%d").to_string()
        })
        .collect()
}

fn is_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit())
}

fn parse_day_month_year(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    let widths_ok = (1..=2).contains(&day.len())
        && (1..=2).contains(&month.len())
        && (2..=4).contains(&year.len());
    if !widths_ok || ![day, month, year].iter().all(|part| is_integer(part)) {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += if year < 70 { 2000 } else { 1900 };
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parses_iso_dates_and_timestamps() {
        assert_eq!(parse_start_date("2025-01-06"), Some(date(2025, 1, 6)));
        assert_eq!(parse_start_date(" 2025-01-06T09:30:00Z "), Some(date(2025, 1, 6)));
        assert_eq!(parse_start_date("2025-01-06T09:30"), Some(date(2025, 1, 6)));
    }

    #[test]
    fn parses_day_first_slash_dates() {
        assert_eq!(parse_start_date("06/01/2025"), Some(date(2025, 1, 6)));
        assert_eq!(parse_start_date("6/1/25"), Some(date(2025, 1, 6)));
        assert_eq!(parse_start_date("6/1/85"), Some(date(1985, 1, 6)));
        assert_eq!(parse_start_date("31/02/2025"), None);
    }

    #[test]
    fn parses_millisecond_timestamps() {
        assert_eq!(parse_start_date("1736121600000"), Some(date(2025, 1, 6)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_start_date(""), None);
        assert_eq!(parse_start_date("next monday"), None);
        assert_eq!(parse_start_date("2025/01"), None);
    }

    #[test]
    fn day_labels_cross_month_boundaries() {
        assert_eq!(
            day_labels(date(2025, 1, 30), 4),
            vec!["2025-01-30", "2025-01-31", "2025-02-01", "2025-02-02"]
        );
        assert!(day_labels(date(2025, 1, 30), 0).is_empty());
    }
}
