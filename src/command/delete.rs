use mockable::Clock;

use super::{Action, CommandResult, History, ReversibleCommand};
use crate::manager::TaskManager;
use crate::models::TaskId;
use crate::storage::Storage;

/// Soft-deletes a visible task.
#[derive(Debug, Clone)]
pub struct DeleteCommand {
    id: TaskId,
}

impl DeleteCommand {
    pub fn new(id: TaskId) -> Self {
        DeleteCommand { id }
    }

    /// Unknown or already deleted ids give an `Invalid` result.
    pub fn execute<S: Storage, C: Clock>(
        self,
        manager: &mut TaskManager<S, C>,
        history: &mut History,
    ) -> CommandResult {
        if manager.get_task(self.id).map_or(true, |t| t.is_deleted) {
            return CommandResult::invalid();
        }
        match manager.delete_task(self.id) {
            Some(task) => {
                let result = CommandResult::single(Action::Delete, task);
                history.push(ReversibleCommand::Delete(self));
                result
            }
            None => CommandResult::invalid(),
        }
    }

    pub fn undo<S: Storage, C: Clock>(&self, manager: &mut TaskManager<S, C>) -> CommandResult {
        match manager.undelete_task(self.id) {
            Some(task) => CommandResult::single(Action::Undo, task),
            None => CommandResult::invalid(),
        }
    }
}
