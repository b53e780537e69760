//! Parsing of user-supplied dates and times.

use chrono::{Days, NaiveDate, NaiveTime};
use mockable::Clock;

use crate::clock::today;
use crate::error::{Error, Result};
use crate::models::{DateRange, TaskType};

/// Parses `YYYY-MM-DD`, `today` or `tomorrow`.
pub fn parse_date(input: &str, clock: &impl Clock) -> Result<NaiveDate> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "today" => Ok(today(clock)),
        "tomorrow" => today(clock)
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::InvalidDate(input.to_string())),
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(input.to_string())),
    }
}

/// Parses a 24-hour `HH:MM` time.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| Error::InvalidTime(input.to_string()))
}

/// Works out the task type from which dates were given.
///
/// No dates make a floating task, an end date alone a deadline and both a
/// range. A start date without an end date is rejected.
pub fn build_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(TaskType, Option<DateRange>)> {
    match (start, end) {
        (None, None) => Ok((TaskType::Floating, None)),
        (None, Some(end)) => Ok((TaskType::Deadline, Some(DateRange::deadline(end)))),
        (Some(start), Some(end)) => Ok((TaskType::Range, Some(DateRange::between(start, end)?))),
        (Some(_), None) => Err(Error::MissingEndDate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_keywords_and_iso_dates() {
        let clock = FixedClock::on(date(2026, 12, 31));
        assert_eq!(parse_date("today", &clock).unwrap(), date(2026, 12, 31));
        assert_eq!(parse_date("Tomorrow", &clock).unwrap(), date(2027, 1, 1));
        assert_eq!(parse_date(" 2026-02-03 ", &clock).unwrap(), date(2026, 2, 3));
        assert!(matches!(parse_date("03/02/2026", &clock), Err(Error::InvalidDate(_))));
    }

    #[test]
    fn parses_times() {
        assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(matches!(parse_time("25:00"), Err(Error::InvalidTime(_))));
    }

    #[test]
    fn infers_task_type_from_dates() {
        assert_eq!(build_range(None, None).unwrap().0, TaskType::Floating);
        assert_eq!(build_range(None, Some(date(2026, 1, 1))).unwrap().0, TaskType::Deadline);
        let (task_type, range) = build_range(Some(date(2026, 1, 1)), Some(date(2026, 1, 10))).unwrap();
        assert_eq!(task_type, TaskType::Range);
        assert_eq!(range.unwrap().start_date(), Some(date(2026, 1, 1)));
        assert!(matches!(build_range(Some(date(2026, 1, 1)), None), Err(Error::MissingEndDate)));
        assert!(build_range(Some(date(2026, 1, 2)), Some(date(2026, 1, 1))).is_err());
    }
}
