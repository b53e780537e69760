use std::path::Path;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use mockable::Clock;

use crate::clock::AppClock;
use crate::command::{Action, CommandResult, TaskEdit};
use crate::dates::{build_range, parse_date, parse_time};
use crate::error::{Error, Result};
use crate::models::{DateRange, Task, TaskId, TaskType};
use crate::session::{Request, Session, View};
use crate::storage::JsonStorage;

/// Opens a session on the database at `db`.
pub fn open(db: &Path, clock: AppClock) -> Result<Session<JsonStorage, AppClock>> {
    Session::open(JsonStorage::new(db), clock)
}

/// Turns an `Invalid` result for `id` into an error.
fn expect_task(result: CommandResult, id: TaskId) -> Result<Task> {
    match result.action {
        Action::Invalid => Err(Error::TaskNotFound(id)),
        _ => result.tasks.into_iter().next().ok_or(Error::TaskNotFound(id)),
    }
}

/// Options accepted when adding or editing a task from the command line.
#[derive(Debug, Default, Clone)]
pub struct TaskArgs {
    pub name: Option<String>,
    pub category: Option<String>,
    pub start: Option<String>,
    pub due: Option<String>,
    pub start_time: Option<String>,
    pub due_time: Option<String>,
}

/// Rejects names that are empty once trimmed.
fn task_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(name.to_string())
}

/// Adds a new task to the database.
///
/// The task type follows from the dates: none gives a floating task, `due`
/// alone a deadline, `start` and `due` a range. Times need a date.
pub fn cmd_add(db: &Path, clock: AppClock, name: String, args: TaskArgs, silent: bool) -> Result<TaskId> {
    let name = task_name(&name)?;
    let start = args.start.as_deref().map(|s| parse_date(s, &clock)).transpose()?;
    let due = args.due.as_deref().map(|s| parse_date(s, &clock)).transpose()?;
    let start_time = args.start_time.as_deref().map(parse_time).transpose()?;
    let due_time = args.due_time.as_deref().map(parse_time).transpose()?;
    let (task_type, date_range) = build_range(start, due)?;
    if date_range.is_none() && (start_time.is_some() || due_time.is_some()) {
        return Err(Error::TimeWithoutDate);
    }
    let date_range = date_range.map(|r| r.with_times(start_time, due_time));

    let mut session = open(db, clock)?;
    let result = session.run(Request::Add {
        name,
        date_range,
        category: args.category.unwrap_or_default(),
        task_type,
    });
    session.exit()?;
    let id = result.tasks.first().map_or(0, |t| t.id);
    if !silent {
        println!("Task added (id = {})", id);
    }
    Ok(id)
}

/// Edits an existing task's details.
///
/// Dates and times left out keep their current value. `floating` turns the
/// task into a floating one and drops its dates.
pub fn cmd_edit(db: &Path, clock: AppClock, id: TaskId, args: TaskArgs, floating: bool, silent: bool) -> Result<()> {
    let mut session = open(db, clock)?;
    let current = session
        .manager()
        .get_task(id)
        .filter(|t| !t.is_deleted)
        .cloned()
        .ok_or(Error::TaskNotFound(id))?;

    let mut edit = TaskEdit {
        name: args.name.as_deref().map(task_name).transpose()?,
        category: args.category,
        ..TaskEdit::default()
    };
    let redate = args.start.is_some()
        || args.due.is_some()
        || args.start_time.is_some()
        || args.due_time.is_some();
    if floating {
        edit.task_type = Some(TaskType::Floating);
    } else if redate {
        let range = current
            .date_range
            .as_ref()
            .filter(|_| current.task_type != TaskType::Floating);
        let start = match args.start.as_deref() {
            Some(s) => Some(parse_date(s, &clock)?),
            None if current.task_type == TaskType::Range => range.and_then(DateRange::start_date),
            None => None,
        };
        let due = match args.due.as_deref() {
            Some(s) => Some(parse_date(s, &clock)?),
            None => range.map(DateRange::end_date),
        };
        let start_time = match args.start_time.as_deref() {
            Some(s) => Some(parse_time(s)?),
            None => range.and_then(DateRange::start_time),
        };
        let due_time = match args.due_time.as_deref() {
            Some(s) => Some(parse_time(s)?),
            None => range.and_then(DateRange::end_time),
        };
        let (task_type, date_range) = build_range(start, due)?;
        if date_range.is_none() {
            return Err(Error::TimeWithoutDate);
        }
        edit.task_type = Some(task_type);
        edit.date_range = date_range.map(|r| r.with_times(start_time, due_time));
    }

    let result = session.run(Request::Edit { id, edit });
    let task = expect_task(result, id)?;
    session.exit()?;
    if !silent {
        println!("Task {} updated: {}", id, task.name);
    }
    Ok(())
}

/// Soft-deletes a task by ID.
pub fn cmd_delete(db: &Path, clock: AppClock, id: TaskId, silent: bool) -> Result<()> {
    let mut session = open(db, clock)?;
    let task = expect_task(session.run(Request::Delete(id)), id)?;
    session.exit()?;
    if !silent {
        println!("Task {} deleted: {}", id, task.name);
    }
    Ok(())
}

/// Marks a task as done (or open again when `is_completed` is false).
pub fn cmd_mark(db: &Path, clock: AppClock, id: TaskId, is_completed: bool, silent: bool) -> Result<()> {
    let mut session = open(db, clock)?;
    let task = expect_task(session.run(Request::Mark { id, is_completed }), id)?;
    session.exit()?;
    if !silent {
        let state = if is_completed { "complete" } else { "open" };
        println!("Task {} marked as {}: {}", id, state, task.name);
    }
    Ok(())
}

/// Lists the tasks of a view in a formatted table.
pub fn cmd_list(db: &Path, clock: AppClock, view: View) -> Result<()> {
    let session = open(db, clock)?;
    let result = session.display(view);
    print_tasks(&view.title(), &result.tasks, &clock);
    Ok(())
}

/// Lists visible tasks whose id, name or category contains `keyword`.
pub fn cmd_search(db: &Path, clock: AppClock, keyword: String) -> Result<()> {
    let mut session = open(db, clock)?;
    let title = format!("Search: {}", keyword);
    let result = session.run(Request::Search(keyword));
    print_tasks(&title, &result.tasks, &clock);
    Ok(())
}

/// Short label for the most relevant derived state of a task.
pub fn status_label(task: &Task, clock: &impl Clock) -> &'static str {
    if task.is_deleted {
        "Deleted"
    } else if task.is_completed {
        "Done"
    } else if task.is_overdue(clock) {
        "Overdue"
    } else if task.is_ending_soon(clock) {
        "Ending soon"
    } else if task.is_started(clock) {
        "Started"
    } else if task.is_coming_soon(clock) {
        "Coming soon"
    } else {
        "Pending"
    }
}

fn status_color(label: &str) -> Color {
    match label {
        "Overdue" => Color::Red,
        "Ending soon" => Color::Yellow,
        "Started" => Color::Cyan,
        "Done" | "Deleted" => Color::Grey,
        _ => Color::Green,
    }
}

fn print_tasks(title: &str, tasks: &[Task], clock: &impl Clock) {
    if tasks.is_empty() {
        println!("{}: no tasks found.", title);
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Dates").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status = status_label(t, clock);
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.name),
            Cell::new(&t.category),
            Cell::new(t.task_type),
            Cell::new(t.date_range.as_ref().map(|r| r.to_string()).unwrap_or_default()),
            Cell::new(status).fg(status_color(status)),
        ]);
    }

    println!("{}", title);
    println!("{table}");
}
