use ratatui::widgets::TableState;

use crate::clock::AppClock;
use crate::command::{Action, CommandResult, TaskEdit};
use crate::dates::{build_range, parse_date};
use crate::error::Result;
use crate::models::{DateRange, Task, TaskId, TaskType};
use crate::session::{Request, Session, View};
use crate::storage::JsonStorage;

/// Views reachable with Tab, in order.
pub const VIEWS: [View; 6] = [
    View::Pending,
    View::Today,
    View::Overdue,
    View::ComingSoon,
    View::Floating,
    View::Completed,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    None,
    Name,
    Category,
    Start,
    Due,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub category: String,
    pub start: Option<String>,
    pub step: usize, // 0: Name, 1: Category, 2: Start, 3: Due
}

pub struct App {
    pub session: Session<JsonStorage, AppClock>,
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub view_index: usize,
    pub search: Option<String>,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<TaskId>,
    pub add_state: AddState,
    /// Feedback from the last action, shown above the help line.
    pub message: Option<String>,
}

impl App {
    /// Creates a new App on an open session and shows the pending tasks.
    pub fn new(session: Session<JsonStorage, AppClock>) -> App {
        let mut app = App {
            session,
            tasks: Vec::new(),
            state: TableState::default(),
            view_index: 0,
            search: None,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            message: None,
        };
        app.reload();
        app
    }

    pub fn clock(&self) -> &AppClock {
        self.session.manager().clock()
    }

    pub fn view(&self) -> View {
        VIEWS[self.view_index]
    }

    pub fn title(&self) -> String {
        match &self.search {
            Some(keyword) => format!("Search: {}", keyword),
            None => self.view().title(),
        }
    }

    /// Selects the next task in the list.
    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task in the list.
    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn next_view(&mut self) {
        self.view_index = (self.view_index + 1) % VIEWS.len();
        self.search = None;
        self.reload();
    }

    pub fn previous_view(&mut self) {
        self.view_index = (self.view_index + VIEWS.len() - 1) % VIEWS.len();
        self.search = None;
        self.reload();
    }

    fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Refreshes the task list from the session.
    pub fn reload(&mut self) {
        let result = match &self.search {
            Some(keyword) => self.session.run(Request::Search(keyword.clone())),
            None => self.session.display(self.view()),
        };
        self.tasks = result.tasks;

        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Runs a request, records feedback and refreshes the list.
    fn apply(&mut self, request: Request) -> CommandResult {
        let result = self.session.run(request);
        self.message = Some(describe(&result));
        self.reload();
        result
    }

    /// Flips the completion flag of the selected task.
    pub fn toggle_selected(&mut self) {
        if let Some((id, done)) = self.selected_task().map(|t| (t.id, t.is_completed)) {
            self.apply(Request::Mark {
                id,
                is_completed: !done,
            });
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.apply(Request::Delete(id));
        }
    }

    pub fn undo(&mut self) {
        let result = self.apply(Request::Undo);
        if result.is_invalid() {
            self.message = Some("Nothing to undo".to_string());
        }
    }

    pub fn make_selected_floating(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            let edit = TaskEdit {
                task_type: Some(TaskType::Floating),
                ..TaskEdit::default()
            };
            self.apply(Request::Edit { id, edit });
        }
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input_buffer = self.search.clone().unwrap_or_default();
    }

    pub fn clear_search(&mut self) {
        if self.search.take().is_some() {
            self.reload();
        }
    }

    /// Initiates editing of a specific field for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        let Some(t) = self.selected_task() else {
            return;
        };
        let id = t.id;
        let buffer = match field {
            InputField::Name => t.name.clone(),
            InputField::Category => t.category.clone(),
            InputField::Start => t.start_date().map(|d| d.to_string()).unwrap_or_default(),
            InputField::Due => t.end_date().map(|d| d.to_string()).unwrap_or_default(),
            InputField::None => String::new(),
        };
        self.target_id = Some(id);
        self.input_mode = InputMode::Editing;
        self.input_field = field;
        self.input_buffer = buffer;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Searching => {
                let keyword = self.input_buffer.trim().to_string();
                self.search = (!keyword.is_empty()).then_some(keyword);
                self.state.select(None);
                self.cancel_input();
                self.reload();
            }
            InputMode::Normal => {}
        }
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => {
                // Name
                if !input.is_empty() {
                    self.add_state.name = input;
                    self.add_state.step += 1;
                }
            }
            1 => {
                // Category
                self.add_state.category = input;
                self.add_state.step += 1;
            }
            2 => {
                // Start
                self.add_state.start = (!input.is_empty()).then_some(input);
                self.add_state.step += 1;
            }
            _ => {
                // Due, then finish
                let due = (!input.is_empty()).then_some(input);
                match self.dates(self.add_state.start.clone(), due) {
                    Ok((task_type, date_range)) => {
                        let name = std::mem::take(&mut self.add_state.name);
                        let category = std::mem::take(&mut self.add_state.category);
                        self.apply(Request::Add {
                            name,
                            date_range,
                            category,
                            task_type,
                        });
                    }
                    Err(e) => self.message = Some(e.to_string()),
                }
                self.input_mode = InputMode::Normal;
            }
        }
        self.input_buffer.clear();
    }

    fn dates(
        &self,
        start: Option<String>,
        due: Option<String>,
    ) -> Result<(TaskType, Option<DateRange>)> {
        let clock = self.clock();
        let start = start.map(|s| parse_date(&s, clock)).transpose()?;
        let due = due.map(|s| parse_date(&s, clock)).transpose()?;
        build_range(start, due)
    }

    /// Handles input for the "Edit Task" mode.
    fn handle_editing_input(&mut self) {
        let Some(id) = self.target_id else {
            self.cancel_input();
            return;
        };
        let input = self.input_buffer.trim().to_string();
        let current = self.session.manager().get_task(id).cloned();
        let edit = match (self.input_field, current) {
            (InputField::Name, _) if !input.is_empty() => Ok(TaskEdit {
                name: Some(input),
                ..TaskEdit::default()
            }),
            (InputField::Category, _) => Ok(TaskEdit {
                category: Some(input),
                ..TaskEdit::default()
            }),
            (InputField::Start, Some(t)) => {
                let start = (!input.is_empty()).then_some(input);
                let due = t.end_date().map(|d| d.to_string());
                self.dates(start, due).map(|(task_type, date_range)| TaskEdit {
                    task_type: Some(task_type),
                    date_range,
                    ..TaskEdit::default()
                })
            }
            (InputField::Due, Some(t)) if !input.is_empty() => {
                let start = match t.task_type {
                    TaskType::Range => t.start_date().map(|d| d.to_string()),
                    _ => None,
                };
                self.dates(start, Some(input)).map(|(task_type, date_range)| TaskEdit {
                    task_type: Some(task_type),
                    date_range,
                    ..TaskEdit::default()
                })
            }
            _ => Ok(TaskEdit::default()),
        };
        match edit {
            Ok(edit) if edit != TaskEdit::default() => {
                self.apply(Request::Edit { id, edit });
            }
            Ok(_) => {}
            Err(e) => self.message = Some(e.to_string()),
        }
        self.cancel_input();
    }
}

/// One-line feedback for a command result.
pub fn describe(result: &CommandResult) -> String {
    let name = result.tasks.first().map(|t| t.name.as_str()).unwrap_or("");
    match result.action {
        Action::Add => format!("Added: {}", name),
        Action::Delete => format!("Deleted: {}", name),
        Action::Edit => format!("Updated: {}", name),
        Action::Mark => match result.tasks.first() {
            Some(t) if t.is_completed => format!("Done: {}", name),
            _ => format!("Reopened: {}", name),
        },
        Action::Search | Action::Display => format!("{} task(s)", result.tasks.len()),
        Action::Undo => format!("Undone: {}", name),
        Action::Invalid => "Task not found".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn app(dir: &std::path::Path) -> App {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let storage = JsonStorage::new(dir.join("tasks.json"));
        App::new(Session::open(storage, AppClock::new(Some(today))).unwrap())
    }

    fn type_in(app: &mut App, text: &str) {
        app.input_buffer = text.to_string();
        app.handle_input();
    }

    #[test]
    fn add_wizard_creates_range_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.start_add();
        type_in(&mut app, "Conference");
        type_in(&mut app, "work");
        type_in(&mut app, "2026-01-04");
        type_in(&mut app, "2026-01-06");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].task_type, TaskType::Range);
        assert_eq!(app.message.as_deref(), Some("Added: Conference"));
    }

    #[test]
    fn toggle_then_undo_restores_task() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.start_add();
        for text in ["Laundry", "", "", ""] {
            type_in(&mut app, text);
        }
        app.toggle_selected();
        assert!(app.tasks.is_empty());
        app.undo();
        assert_eq!(app.tasks.len(), 1);
        assert!(!app.tasks[0].is_completed);
    }

    #[test]
    fn editing_due_date_of_floating_task_makes_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.start_add();
        for text in ["Renew passport", "", "", ""] {
            type_in(&mut app, text);
        }
        app.start_edit(InputField::Due);
        type_in(&mut app, "2026-03-01");
        let task = app.session.manager().get_task(0).unwrap();
        assert_eq!(task.task_type, TaskType::Deadline);
    }

    #[test]
    fn bad_date_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.start_add();
        for text in ["Trip", "", "someday", "2026-02-01"] {
            type_in(&mut app, text);
        }
        assert!(app.tasks.is_empty());
        assert!(app.message.unwrap().contains("someday"));
    }
}
