//! Clock sources for the date predicates.
//!
//! Every predicate asks a [`Clock`] for "today" on each call. The system clock
//! is used in normal runs; [`FixedClock`] pins the date for tests and for the
//! `--today` override of the CLI.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
pub use mockable::{Clock, DefaultClock};

/// Returns the local calendar date the clock considers "today".
pub fn today(clock: &impl Clock) -> NaiveDate {
    clock.local().date_naive()
}

/// A clock frozen at noon of a given local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        FixedClock { date }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        let noon = self
            .date
            .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        Local
            .from_local_datetime(&noon)
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&noon))
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

/// The clock the binary runs with, picked at startup.
#[derive(Debug, Clone, Copy)]
pub enum AppClock {
    System,
    Fixed(FixedClock),
}

impl AppClock {
    pub fn new(today: Option<NaiveDate>) -> Self {
        match today {
            Some(date) => AppClock::Fixed(FixedClock::on(date)),
            None => AppClock::System,
        }
    }
}

impl Clock for AppClock {
    fn local(&self) -> DateTime<Local> {
        match self {
            AppClock::System => DefaultClock.local(),
            AppClock::Fixed(clock) => clock.local(),
        }
    }

    fn utc(&self) -> DateTime<Utc> {
        match self {
            AppClock::System => DefaultClock.utc(),
            AppClock::Fixed(clock) => clock.utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(today(&clock), date);
        assert_eq!(today(&AppClock::new(Some(date))), date);
    }
}
