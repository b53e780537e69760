//! Session controller: the task manager plus the undo history.

use chrono::NaiveDate;
use mockable::Clock;
use tracing::debug;

use crate::clock::today;
use crate::command::{
    self, Action, AddCommand, CommandResult, DeleteCommand, EditCommand, History, MarkCommand,
    TaskEdit,
};
use crate::error::Result;
use crate::manager::TaskManager;
use crate::models::{DateRange, TaskId, TaskType};
use crate::storage::Storage;

/// A named slice of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every open task.
    Pending,
    /// Open tasks due today or spanning today.
    Today,
    Overdue,
    ComingSoon,
    Floating,
    Completed,
    /// Open tasks due on, or spanning, a given day.
    On(NaiveDate),
    /// Open tasks of one type.
    Type(TaskType),
}

impl View {
    pub fn title(&self) -> String {
        match self {
            View::Pending => "Pending".to_string(),
            View::Today => "Today".to_string(),
            View::Overdue => "Overdue".to_string(),
            View::ComingSoon => "Coming Soon".to_string(),
            View::Floating => "Floating".to_string(),
            View::Completed => "Completed".to_string(),
            View::On(date) => format!("On {}", date),
            View::Type(task_type) => format!("Type: {}", task_type),
        }
    }
}

/// Something the user asked for.
#[derive(Debug, Clone)]
pub enum Request {
    Add {
        name: String,
        date_range: Option<DateRange>,
        category: String,
        task_type: TaskType,
    },
    Edit {
        id: TaskId,
        edit: TaskEdit,
    },
    Delete(TaskId),
    Mark {
        id: TaskId,
        is_completed: bool,
    },
    Search(String),
    Display(View),
    Undo,
}

/// Runs requests against a task manager and remembers what can be undone.
pub struct Session<S, C> {
    manager: TaskManager<S, C>,
    history: History,
}

impl<S: Storage, C: Clock> Session<S, C> {
    pub fn new(manager: TaskManager<S, C>) -> Self {
        Session {
            manager,
            history: History::new(),
        }
    }

    /// Opens a session on the tasks held by `storage`.
    pub fn open(storage: S, clock: C) -> Result<Self> {
        Ok(Session::new(TaskManager::new(storage, clock)?))
    }

    pub fn manager(&self) -> &TaskManager<S, C> {
        &self.manager
    }

    /// Number of commands that can still be undone.
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn run(&mut self, request: Request) -> CommandResult {
        debug!(?request, "running request");
        match request {
            Request::Add {
                name,
                date_range,
                category,
                task_type,
            } => AddCommand::new(name, date_range, category, task_type)
                .execute(&mut self.manager, &mut self.history),
            Request::Edit { id, edit } => {
                EditCommand::new(&self.manager, id, edit).execute(&mut self.manager, &mut self.history)
            }
            Request::Delete(id) => DeleteCommand::new(id).execute(&mut self.manager, &mut self.history),
            Request::Mark { id, is_completed } => {
                MarkCommand::new(id, is_completed).execute(&mut self.manager, &mut self.history)
            }
            Request::Search(keyword) => command::search(&self.manager, &keyword),
            Request::Display(view) => self.display(view),
            Request::Undo => command::undo_last(&mut self.manager, &mut self.history),
        }
    }

    /// The tasks of a view, in natural order.
    pub fn display(&self, view: View) -> CommandResult {
        let m = &self.manager;
        let tasks = match view {
            View::Pending => m.tasks_by_status(false),
            View::Today => m.tasks_on(today(m.clock()), false),
            View::Overdue => m.overdue_tasks(),
            View::ComingSoon => m.coming_soon_tasks(),
            View::Floating => m.tasks_by_type(TaskType::Floating, false),
            View::Completed => m.tasks_by_status(true),
            View::On(date) => m.tasks_on(date, false),
            View::Type(task_type) => m.tasks_by_type(task_type, false),
        };
        CommandResult::from_refs(Action::Display, tasks)
    }

    /// Saves every task through the storage collaborator.
    pub fn exit(&self) -> Result<()> {
        self.manager.exit()
    }
}
