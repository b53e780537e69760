//! In-memory task repository.
//!
//! Tasks are only ever appended; deletion flips `is_deleted` so ids stay
//! stable and every change can be undone.

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{DateRange, Task, TaskId, TaskType};
use crate::storage::Storage;

/// Owns the task list and hands it to `S` on [`TaskManager::exit`].
pub struct TaskManager<S, C> {
    latest_id: TaskId,
    tasks: Vec<Task>,
    storage: S,
    clock: C,
}

/// Sorts tasks into their natural order: dated tasks by end date, end time
/// and id, then floating tasks by id.
pub fn sort_tasks(tasks: &mut [&Task]) {
    tasks.sort_by_key(|t| {
        let range = t.date_range.as_ref().filter(|_| t.task_type != TaskType::Floating);
        (
            range.is_none(),
            range.map(DateRange::end_date),
            range.and_then(DateRange::end_time),
            t.id,
        )
    });
}

impl<S: Storage, C: Clock> TaskManager<S, C> {
    /// Loads the stored tasks and continues numbering after the last one.
    pub fn new(storage: S, clock: C) -> Result<Self> {
        let tasks = storage.load_tasks()?;
        if tasks.windows(2).any(|w| w[0].id >= w[1].id) {
            warn!("stored task ids are not ascending; new ids may collide");
        }
        let latest_id = tasks.last().map_or(0, |t| t.id + 1);
        debug!(count = tasks.len(), next_id = latest_id, "task manager ready");
        Ok(TaskManager {
            latest_id,
            tasks,
            storage,
            clock,
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Appends a new open task with the next id.
    pub fn add_task(
        &mut self,
        name: impl Into<String>,
        date_range: Option<DateRange>,
        category: impl Into<String>,
        task_type: TaskType,
    ) -> &Task {
        let task = Task::new(self.latest_id, task_type, name, date_range, category);
        debug!(id = task.id, name = %task.name, "adding task");
        self.latest_id += 1;
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Soft-deletes a task. Deleting twice is harmless.
    pub fn delete_task(&mut self, id: TaskId) -> Option<&Task> {
        debug!(id, "deleting task");
        self.task_mut(id).map(|t| {
            t.is_deleted = true;
            &*t
        })
    }

    pub fn undelete_task(&mut self, id: TaskId) -> Option<&Task> {
        debug!(id, "restoring task");
        self.task_mut(id).map(|t| {
            t.is_deleted = false;
            &*t
        })
    }

    /// Overwrites name, dates, category and type of a task.
    ///
    /// # Panics
    ///
    /// Panics if the new values leave a deadline or range task without dates.
    pub fn update_task(
        &mut self,
        id: TaskId,
        name: impl Into<String>,
        date_range: Option<DateRange>,
        category: impl Into<String>,
        task_type: TaskType,
    ) -> Option<&Task> {
        let t = self.task_mut(id)?;
        t.name = name.into();
        t.date_range = date_range;
        t.category = category.into();
        t.task_type = task_type;
        t.assert_invariants();
        debug!(id, name = %t.name, "updated task");
        Some(&*t)
    }

    pub fn mark_task(&mut self, id: TaskId, is_completed: bool) -> Option<&Task> {
        debug!(id, is_completed, "marking task");
        self.task_mut(id).map(|t| {
            t.is_completed = is_completed;
            &*t
        })
    }

    /// Visible tasks whose id, name or category contains `keyword`.
    pub fn search_task(&self, keyword: &str) -> Vec<&Task> {
        self.collect(|t| !t.is_deleted && t.is_searched_task(keyword))
    }

    /// Hands every task, deleted and completed ones included, to storage.
    pub fn exit(&self) -> Result<()> {
        self.storage.save_tasks(&self.tasks)
    }

    /// First task with this id, deleted or not.
    pub fn get_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The visible task with this id, if its completion flag matches.
    pub fn get_task_with_status(&self, id: TaskId, is_completed: bool) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id && !t.is_deleted && t.is_completed == is_completed)
    }

    /// All tasks, unfiltered and unsorted.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_by_type(&self, task_type: TaskType, is_completed: bool) -> Vec<&Task> {
        self.collect(|t| t.task_type == task_type && !t.is_deleted && t.is_completed == is_completed)
    }

    /// Deadlines due on `date` and ranges covering it.
    pub fn tasks_on(&self, date: NaiveDate, is_completed: bool) -> Vec<&Task> {
        self.collect(|t| t.is_on(date) && !t.is_deleted && t.is_completed == is_completed)
    }

    pub fn tasks_by_status(&self, is_completed: bool) -> Vec<&Task> {
        self.collect(|t| t.is_completed == is_completed && !t.is_deleted)
    }

    pub fn overdue_tasks(&self) -> Vec<&Task> {
        let tasks = self.collect(|t| t.is_overdue(&self.clock));
        debug_assert!(tasks.iter().all(|t| !t.is_completed && !t.is_deleted));
        tasks
    }

    /// Open tasks with nothing happening in the coming week.
    pub fn coming_soon_tasks(&self) -> Vec<&Task> {
        let tasks = self.collect(|t| t.is_coming_soon(&self.clock));
        debug_assert!(tasks.iter().all(|t| !t.is_completed && !t.is_deleted));
        tasks
    }

    fn collect(&self, keep: impl Fn(&Task) -> bool) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().filter(|&t| keep(t)).collect();
        sort_tasks(&mut tasks);
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manager(tasks: Vec<Task>) -> TaskManager<MemoryStorage, FixedClock> {
        TaskManager::new(MemoryStorage::new(tasks), FixedClock::on(date(2026, 1, 5))).unwrap()
    }

    #[test]
    fn ids_continue_after_last_loaded_task() {
        let mut m = manager(vec![
            Task::new(3, TaskType::Floating, "a", None, ""),
            Task::new(7, TaskType::Floating, "b", None, ""),
        ]);
        assert_eq!(m.add_task("c", None, "", TaskType::Floating).id, 8);
    }

    #[test]
    fn sort_puts_floating_last() {
        let mut m = manager(Vec::new());
        m.add_task("float", None, "", TaskType::Floating);
        m.add_task("late", Some(DateRange::deadline(date(2026, 3, 1))), "", TaskType::Deadline);
        m.add_task("early", Some(DateRange::deadline(date(2026, 2, 1))), "", TaskType::Deadline);
        let names: Vec<_> = m.tasks_by_status(false).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["early", "late", "float"]);
    }

    #[test]
    fn unknown_id_is_absent() {
        let mut m = manager(Vec::new());
        assert!(m.delete_task(4).is_none());
        assert!(m.mark_task(4, true).is_none());
        assert!(m.update_task(4, "x", None, "", TaskType::Floating).is_none());
        assert!(m.get_task(4).is_none());
    }

    #[test]
    #[should_panic(expected = "has no date range")]
    fn update_to_dated_type_without_range_panics() {
        let mut m = manager(Vec::new());
        m.add_task("float", None, "", TaskType::Floating);
        m.update_task(0, "float", None, "", TaskType::Deadline);
    }
}
