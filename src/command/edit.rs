use mockable::Clock;

use super::{Action, CommandResult, History, ReversibleCommand};
use crate::manager::TaskManager;
use crate::models::{DateRange, Task, TaskId, TaskType, UNASSIGNED_TASK};
use crate::storage::Storage;

/// New values for an edit. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub date_range: Option<DateRange>,
    pub category: Option<String>,
    pub task_type: Option<TaskType>,
}

/// Changes the name, dates, category or type of one task.
#[derive(Debug, Clone)]
pub struct EditCommand {
    id: TaskId,
    old_task: Option<Task>,
    edit: TaskEdit,
}

impl EditCommand {
    /// Captures the task as it is now, so the edit can be undone later.
    pub fn new<S: Storage, C: Clock>(manager: &TaskManager<S, C>, id: TaskId, edit: TaskEdit) -> Self {
        EditCommand {
            id,
            old_task: manager.get_task(id).cloned(),
            edit,
        }
    }

    /// Applies the edit and records it in `history`.
    ///
    /// Unknown ids, and edits that would leave a dated task without dates,
    /// give an `Invalid` result and change nothing. A task made floating
    /// loses its dates.
    pub fn execute<S: Storage, C: Clock>(
        mut self,
        manager: &mut TaskManager<S, C>,
        history: &mut History,
    ) -> CommandResult {
        if self.old_task.is_none() {
            return CommandResult::invalid();
        }
        self.check_null();

        let task_type = self.edit.task_type.unwrap_or(TaskType::Floating);
        if task_type == TaskType::Floating {
            self.edit.date_range = None;
        } else if self.edit.date_range.is_none() {
            return CommandResult::invalid();
        }

        let updated = manager.update_task(
            self.id,
            self.edit.name.clone().unwrap_or_default(),
            self.edit.date_range.clone(),
            self.edit.category.clone().unwrap_or_default(),
            task_type,
        );
        match updated {
            Some(task) => {
                let result = CommandResult::single(Action::Edit, task);
                history.push(ReversibleCommand::Edit(self));
                result
            }
            None => CommandResult::invalid(),
        }
    }

    /// Puts back every field captured before the edit.
    pub fn undo<S: Storage, C: Clock>(&self, manager: &mut TaskManager<S, C>) -> CommandResult {
        let Some(old) = &self.old_task else {
            return CommandResult::invalid();
        };
        match manager.update_task(
            old.id,
            old.name.clone(),
            old.date_range.clone(),
            old.category.clone(),
            old.task_type,
        ) {
            Some(task) => CommandResult::single(Action::Undo, task),
            None => CommandResult::invalid(),
        }
    }

    /// Fills every field the edit leaves out from the captured task.
    ///
    /// # Panics
    ///
    /// Panics if the command targets the unassigned id.
    fn check_null(&mut self) {
        assert!(self.id != UNASSIGNED_TASK, "task id cannot be unassigned");
        let Some(old) = &self.old_task else {
            return;
        };
        if self.edit.name.is_none() {
            self.edit.name = Some(old.name.clone());
        }
        if self.edit.date_range.is_none() {
            self.edit.date_range = old.date_range.clone();
        }
        if self.edit.category.is_none() {
            self.edit.category = Some(old.category.clone());
        }
        if self.edit.task_type.is_none() {
            self.edit.task_type = Some(old.task_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::command::undo_last;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn manager() -> TaskManager<MemoryStorage, FixedClock> {
        let mut m = TaskManager::new(MemoryStorage::default(), FixedClock::on(date(2026, 1, 5))).unwrap();
        m.add_task("A", Some(DateRange::deadline(date(2026, 2, 1))), "C", TaskType::Deadline);
        m.add_task("loose end", None, "", TaskType::Floating);
        m
    }

    #[test]
    fn missing_fields_keep_old_values() {
        let mut m = manager();
        let mut history = History::new();
        let edit = TaskEdit {
            name: Some("B".into()),
            ..TaskEdit::default()
        };
        let result = EditCommand::new(&m, 0, edit).execute(&mut m, &mut history);
        assert_eq!(result.action, Action::Edit);
        let task = &result.tasks[0];
        assert_eq!(task.name, "B");
        assert_eq!(task.category, "C");
        assert_eq!(task.task_type, TaskType::Deadline);
        assert_eq!(task.end_date(), Some(date(2026, 2, 1)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn unknown_id_is_invalid_and_not_recorded() {
        let mut m = manager();
        let mut history = History::new();
        let result = EditCommand::new(&m, 42, TaskEdit::default()).execute(&mut m, &mut history);
        assert!(result.is_invalid());
        assert!(result.tasks.is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn dated_type_without_dates_is_invalid() {
        let mut m = manager();
        let mut history = History::new();
        let edit = TaskEdit {
            task_type: Some(TaskType::Deadline),
            ..TaskEdit::default()
        };
        let result = EditCommand::new(&m, 1, edit).execute(&mut m, &mut history);
        assert!(result.is_invalid());
        assert_eq!(m.get_task(1).unwrap().task_type, TaskType::Floating);
    }

    #[test]
    fn making_a_task_floating_drops_its_dates() {
        let mut m = manager();
        let mut history = History::new();
        let edit = TaskEdit {
            task_type: Some(TaskType::Floating),
            ..TaskEdit::default()
        };
        let result = EditCommand::new(&m, 0, edit).execute(&mut m, &mut history);
        assert_eq!(result.action, Action::Edit);
        let task = m.get_task(0).unwrap();
        assert_eq!(task.task_type, TaskType::Floating);
        assert!(task.date_range.is_none());

        undo_last(&mut m, &mut history);
        let task = m.get_task(0).unwrap();
        assert_eq!(task.task_type, TaskType::Deadline);
        assert_eq!(task.end_date(), Some(date(2026, 2, 1)));
    }

    #[test]
    #[should_panic(expected = "unassigned")]
    fn unassigned_id_panics() {
        let mut m = manager();
        let mut cmd = EditCommand::new(&m, UNASSIGNED_TASK, TaskEdit::default());
        cmd.old_task = m.get_task(0).cloned();
        cmd.execute(&mut m, &mut History::new());
    }
}
