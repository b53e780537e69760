use mockable::Clock;

use super::{Action, CommandResult, History, ReversibleCommand};
use crate::manager::TaskManager;
use crate::models::TaskId;
use crate::storage::Storage;

/// Marks a visible task as completed or open again.
#[derive(Debug, Clone)]
pub struct MarkCommand {
    id: TaskId,
    is_completed: bool,
    was_completed: bool,
}

impl MarkCommand {
    pub fn new(id: TaskId, is_completed: bool) -> Self {
        MarkCommand {
            id,
            is_completed,
            was_completed: false,
        }
    }

    pub fn execute<S: Storage, C: Clock>(
        mut self,
        manager: &mut TaskManager<S, C>,
        history: &mut History,
    ) -> CommandResult {
        match manager.get_task(self.id) {
            Some(task) if !task.is_deleted => self.was_completed = task.is_completed,
            _ => return CommandResult::invalid(),
        }
        match manager.mark_task(self.id, self.is_completed) {
            Some(task) => {
                let result = CommandResult::single(Action::Mark, task);
                history.push(ReversibleCommand::Mark(self));
                result
            }
            None => CommandResult::invalid(),
        }
    }

    /// Restores the completion flag the task had before.
    pub fn undo<S: Storage, C: Clock>(&self, manager: &mut TaskManager<S, C>) -> CommandResult {
        match manager.mark_task(self.id, self.was_completed) {
            Some(task) => CommandResult::single(Action::Undo, task),
            None => CommandResult::invalid(),
        }
    }
}
