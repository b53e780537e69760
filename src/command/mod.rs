//! Commands that change the task list and know how to revert themselves.
//!
//! A command is built against the current state, executed once, and on
//! success pushes itself onto the [`History`]. Undoing pops the most recent
//! entry and asks it to restore the state it captured before executing.

mod add;
mod delete;
mod edit;
mod mark;

pub use add::AddCommand;
pub use delete::DeleteCommand;
pub use edit::{EditCommand, TaskEdit};
pub use mark::MarkCommand;

use mockable::Clock;
use tracing::debug;

use crate::manager::TaskManager;
use crate::models::Task;
use crate::storage::Storage;

/// What a command did, for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Delete,
    Edit,
    Mark,
    Search,
    Display,
    Undo,
    Invalid,
}

/// The outcome of running a command: its action and the tasks it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub action: Action,
    pub tasks: Vec<Task>,
}

impl CommandResult {
    pub fn new(action: Action, tasks: Vec<Task>) -> Self {
        CommandResult { action, tasks }
    }

    /// A result for a single affected task.
    pub fn single(action: Action, task: &Task) -> Self {
        CommandResult::new(action, vec![task.clone()])
    }

    /// An `Invalid` result with no tasks.
    pub fn invalid() -> Self {
        CommandResult::new(Action::Invalid, Vec::new())
    }

    /// Snapshots the tasks of a query into a result.
    pub fn from_refs(action: Action, tasks: Vec<&Task>) -> Self {
        CommandResult::new(action, tasks.into_iter().cloned().collect())
    }

    pub fn is_invalid(&self) -> bool {
        self.action == Action::Invalid
    }
}

/// An executed command together with the state needed to revert it.
#[derive(Debug, Clone)]
pub enum ReversibleCommand {
    Add(AddCommand),
    Delete(DeleteCommand),
    Edit(EditCommand),
    Mark(MarkCommand),
}

impl ReversibleCommand {
    pub fn undo<S: Storage, C: Clock>(&self, manager: &mut TaskManager<S, C>) -> CommandResult {
        match self {
            ReversibleCommand::Add(cmd) => cmd.undo(manager),
            ReversibleCommand::Delete(cmd) => cmd.undo(manager),
            ReversibleCommand::Edit(cmd) => cmd.undo(manager),
            ReversibleCommand::Mark(cmd) => cmd.undo(manager),
        }
    }
}

/// Commands that can still be undone, most recent last.
pub type History = Vec<ReversibleCommand>;

/// Reverts the most recently executed command.
///
/// Returns an `Invalid` result when there is nothing to undo.
pub fn undo_last<S: Storage, C: Clock>(
    manager: &mut TaskManager<S, C>,
    history: &mut History,
) -> CommandResult {
    match history.pop() {
        Some(cmd) => {
            debug!(?cmd, "undoing command");
            cmd.undo(manager)
        }
        None => CommandResult::invalid(),
    }
}

/// Visible tasks matching `keyword`.
pub fn search<S: Storage, C: Clock>(manager: &TaskManager<S, C>, keyword: &str) -> CommandResult {
    CommandResult::from_refs(Action::Search, manager.search_task(keyword))
}
