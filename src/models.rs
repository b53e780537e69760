use std::fmt;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::clock::today;
use crate::error::{Error, Result};

/// Identifier of a task inside a [`TaskManager`](crate::manager::TaskManager).
pub type TaskId = i64;

/// Id carried by a task that has not been given one yet.
pub const UNASSIGNED_TASK: TaskId = -1;

/// Length of the look-ahead window used by "coming soon" and "ending soon".
pub const DAYS_A_WEEK: u64 = 7;

/// How a task relates to the calendar.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// No date at all.
    Floating,
    /// Due on a single day (the end date of its range).
    Deadline,
    /// Spans from a start date to an end date, both inclusive.
    Range,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskType::Floating => "floating",
            TaskType::Deadline => "deadline",
            TaskType::Range => "range",
        };
        f.write_str(s)
    }
}

/// The dates (and optional times of day) attached to a task.
///
/// Deadlines only use the end date. Once built a range cannot be changed;
/// editing a task swaps in a whole new `DateRange`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start_date: Option<NaiveDate>,
    end_date: NaiveDate,
    #[serde(default)]
    start_time: Option<NaiveTime>,
    #[serde(default)]
    end_time: Option<NaiveTime>,
}

impl DateRange {
    /// A single due date.
    pub fn deadline(end_date: NaiveDate) -> Self {
        DateRange {
            start_date: None,
            end_date,
            start_time: None,
            end_time: None,
        }
    }

    /// An inclusive span of days. Fails if `start` falls after `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(DateRange {
            start_date: Some(start),
            end_date: end,
            start_time: None,
            end_time: None,
        })
    }

    /// Returns a copy carrying the given times of day.
    pub fn with_times(self, start_time: Option<NaiveTime>, end_time: Option<NaiveTime>) -> Self {
        DateRange {
            start_time,
            end_time,
            ..self
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.end_time
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start_date {
            write!(f, "{}", start)?;
            if let Some(t) = self.start_time {
                write!(f, " {}", t.format("%H:%M"))?;
            }
            f.write_str(" - ")?;
        }
        write!(f, "{}", self.end_date)?;
        if let Some(t) = self.end_time {
            write!(f, " {}", t.format("%H:%M"))?;
        }
        Ok(())
    }
}

/// Comparison key for calendar days: the year first, then the day of the year.
fn day_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.ordinal())
}

/// The `count` days starting at `from`, inclusive.
fn days_from(from: NaiveDate, count: u64) -> impl Iterator<Item = NaiveDate> {
    (0..count).filter_map(move |offset| from.checked_add_days(Days::new(offset)))
}

/// Represents a single task in the task manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: TaskId,
    /// Whether the task is floating, a deadline or a range.
    pub task_type: TaskType,
    /// The name or description of the task.
    pub name: String,
    /// Free-form label, empty when unset.
    #[serde(default)]
    pub category: String,
    /// Dates of the task. Only floating tasks may leave this empty.
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Whether the task has been completed.
    #[serde(default)]
    pub is_completed: bool,
    /// Soft-deletion flag; deleted tasks stay in the list.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Task {
    /// Builds a task that is neither completed nor deleted.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty, or if a deadline or range task has no
    /// date range.
    pub fn new(
        id: TaskId,
        task_type: TaskType,
        name: impl Into<String>,
        date_range: Option<DateRange>,
        category: impl Into<String>,
    ) -> Self {
        let task = Task {
            id,
            task_type,
            name: name.into(),
            category: category.into(),
            date_range,
            is_completed: false,
            is_deleted: false,
        };
        task.assert_invariants();
        task
    }

    /// Whether the task has a name and, unless floating, a date range.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && (self.task_type == TaskType::Floating || self.date_range.is_some())
    }

    /// Checks the construction invariants.
    ///
    /// # Panics
    ///
    /// Panics when the name is empty or a dated task has no date range.
    pub fn assert_invariants(&self) {
        assert!(!self.name.is_empty(), "task {} has an empty name", self.id);
        assert!(
            self.task_type == TaskType::Floating || self.date_range.is_some(),
            "{} task {} has no date range",
            self.task_type,
            self.id
        );
    }

    fn range(&self) -> &DateRange {
        self.date_range
            .as_ref()
            .expect("deadline and range tasks always carry a date range")
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.date_range.as_ref().and_then(DateRange::start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.date_range.as_ref().map(DateRange::end_date)
    }

    /// Start date of a range task. Ranges always have one; a range stored
    /// without it starts on its end date.
    fn range_start(&self) -> NaiveDate {
        let range = self.range();
        range.start_date().unwrap_or_else(|| range.end_date())
    }

    /// Returns true if the task's end date has passed and it is still open.
    ///
    /// Floating tasks are never overdue.
    pub fn is_overdue(&self, clock: &impl Clock) -> bool {
        match self.task_type {
            TaskType::Floating => false,
            TaskType::Deadline | TaskType::Range => {
                day_key(self.range().end_date()) < day_key(today(clock))
                    && !self.is_completed
                    && !self.is_deleted
            }
        }
    }

    /// Returns true if a deadline falls on `date`, or `date` lies inside a
    /// range (inclusive on both ends).
    ///
    /// Completed tasks count. Deleted deadlines do not, but deleted ranges do.
    pub fn is_on(&self, date: NaiveDate) -> bool {
        match self.task_type {
            TaskType::Floating => false,
            TaskType::Deadline => {
                day_key(self.range().end_date()) == day_key(date) && !self.is_deleted
            }
            TaskType::Range => {
                let day = day_key(date);
                day_key(self.range_start()) <= day && day <= day_key(self.range().end_date())
            }
        }
    }

    /// Returns true if the task is open and has nothing on any of the next
    /// seven days (today included), i.e. it lies further ahead.
    pub fn is_coming_soon(&self, clock: &impl Clock) -> bool {
        if self.task_type == TaskType::Floating {
            return false;
        }
        if self.is_overdue(clock) || self.is_completed || self.is_deleted {
            return false;
        }
        !days_from(today(clock), DAYS_A_WEEK).any(|day| self.is_on(day))
    }

    /// Returns true if an open range task ends within the next seven days,
    /// today included.
    pub fn is_ending_soon(&self, clock: &impl Clock) -> bool {
        if self.task_type != TaskType::Range {
            return false;
        }
        if self.is_completed || self.is_deleted || self.is_overdue(clock) {
            return false;
        }
        let end = day_key(self.range().end_date());
        days_from(today(clock), DAYS_A_WEEK).any(|day| day_key(day) == end)
    }

    /// Returns true if an open range task started before today.
    pub fn is_started(&self, clock: &impl Clock) -> bool {
        if self.task_type != TaskType::Range {
            return false;
        }
        if self.is_completed || self.is_deleted || self.is_overdue(clock) {
            return false;
        }
        day_key(self.range_start()) < day_key(today(clock))
    }

    /// Case-insensitive substring match on the id, the name or the category.
    pub fn is_searched_task(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.id.to_string().contains(&keyword)
            || self.name.to_lowercase().contains(&keyword)
            || self.category.to_lowercase().contains(&keyword)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn between_rejects_reversed_range() {
        let err = DateRange::between(date(2026, 3, 2), date(2026, 3, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
        assert!(DateRange::between(date(2026, 3, 1), date(2026, 3, 1)).is_ok());
    }

    #[test]
    fn day_key_orders_by_year_first() {
        assert!(day_key(date(2025, 12, 31)) < day_key(date(2026, 1, 1)));
        assert!(day_key(date(2026, 2, 1)) < day_key(date(2026, 2, 2)));
    }

    #[test]
    fn window_crosses_year_end() {
        let days: Vec<_> = days_from(date(2026, 12, 29), DAYS_A_WEEK).collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[3], date(2027, 1, 1));
    }

    #[test]
    fn display_formats_range_with_times() {
        let range = DateRange::between(date(2026, 1, 1), date(2026, 1, 10))
            .unwrap()
            .with_times(None, NaiveTime::from_hms_opt(18, 30, 0));
        assert_eq!(range.to_string(), "2026-01-01 - 2026-01-10 18:30");
    }

    #[test]
    #[should_panic(expected = "has no date range")]
    fn deadline_without_range_panics() {
        Task::new(0, TaskType::Deadline, "pay rent", None, "");
    }

    #[test]
    #[should_panic(expected = "empty name")]
    fn empty_name_panics() {
        Task::new(0, TaskType::Floating, "", None, "");
    }
}
