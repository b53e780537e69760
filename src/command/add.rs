use mockable::Clock;

use super::{Action, CommandResult, History, ReversibleCommand};
use crate::manager::TaskManager;
use crate::models::{DateRange, TaskId, TaskType, UNASSIGNED_TASK};
use crate::storage::Storage;

/// Adds a task. Undoing it soft-deletes the new task.
#[derive(Debug, Clone)]
pub struct AddCommand {
    name: String,
    date_range: Option<DateRange>,
    category: String,
    task_type: TaskType,
    id: TaskId,
}

impl AddCommand {
    pub fn new(
        name: impl Into<String>,
        date_range: Option<DateRange>,
        category: impl Into<String>,
        task_type: TaskType,
    ) -> Self {
        AddCommand {
            name: name.into(),
            date_range,
            category: category.into(),
            task_type,
            id: UNASSIGNED_TASK,
        }
    }

    pub fn execute<S: Storage, C: Clock>(
        mut self,
        manager: &mut TaskManager<S, C>,
        history: &mut History,
    ) -> CommandResult {
        let task = manager.add_task(
            self.name.clone(),
            self.date_range.clone(),
            self.category.clone(),
            self.task_type,
        );
        self.id = task.id;
        let result = CommandResult::single(Action::Add, task);
        history.push(ReversibleCommand::Add(self));
        result
    }

    pub fn undo<S: Storage, C: Clock>(&self, manager: &mut TaskManager<S, C>) -> CommandResult {
        match manager.delete_task(self.id) {
            Some(task) => CommandResult::single(Action::Undo, task),
            None => CommandResult::invalid(),
        }
    }
}
