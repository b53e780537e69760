use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notify_tasks::clock::AppClock;
use notify_tasks::commands::*;
use notify_tasks::models::{TaskId, TaskType};
use notify_tasks::session::View;
use notify_tasks::storage::default_db_path;
use notify_tasks::tui::run_tui;
use notify_tasks::Result;

#[derive(Parser)]
#[command(name = "notify")]
#[command(about = "Personal task tracker with deadlines and date ranges", long_about = None)]
struct Cli {
    /// Path of the task database (defaults to the local data directory)
    #[arg(long, global = true, env = "NOTIFY_DB")]
    db: Option<PathBuf>,
    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task name (quoted if it has spaces)
        name: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// List tasks
    List {
        /// Which tasks to show
        #[arg(value_enum, default_value_t = ListView::Pending)]
        view: ListView,
        /// Only tasks due on or spanning this date
        #[arg(long, conflicts_with = "task_type")]
        on: Option<String>,
        /// Only tasks of this type
        #[arg(long = "type", value_enum)]
        task_type: Option<TypeArg>,
    },
    /// Edit a task
    Edit {
        id: TaskId,
        /// New task name
        #[arg(short, long)]
        name: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
        /// Drop the dates and make the task floating
        #[arg(long, conflicts_with_all = ["start", "due", "start_time", "due_time"])]
        floating: bool,
    },
    /// Delete a task (it can be restored with undo in the UI)
    Delete {
        id: TaskId,
    },
    /// Mark a task as complete
    Done {
        id: TaskId,
    },
    /// Mark a completed task as open again
    Undone {
        id: TaskId,
    },
    /// Search tasks by id, name or category
    Search {
        keyword: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(clap::Args)]
struct FieldArgs {
    /// Category label
    #[arg(short, long)]
    category: Option<String>,
    /// Start date of a range (YYYY-MM-DD, today, tomorrow)
    #[arg(short, long)]
    start: Option<String>,
    /// Due date, or end date of a range
    #[arg(short, long)]
    due: Option<String>,
    /// Start time (HH:MM)
    #[arg(long)]
    start_time: Option<String>,
    /// Due time (HH:MM)
    #[arg(long)]
    due_time: Option<String>,
}

impl FieldArgs {
    fn into_task_args(self, name: Option<String>) -> TaskArgs {
        TaskArgs {
            name,
            category: self.category,
            start: self.start,
            due: self.due,
            start_time: self.start_time,
            due_time: self.due_time,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ListView {
    Pending,
    Today,
    Overdue,
    ComingSoon,
    Floating,
    Completed,
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Floating,
    Deadline,
    Range,
}

impl From<TypeArg> for TaskType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Floating => TaskType::Floating,
            TypeArg::Deadline => TaskType::Deadline,
            TypeArg::Range => TaskType::Range,
        }
    }
}

fn init_tracing() {
    // Opt-in via RUST_LOG; an unusable filter just leaves logging off.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let db = cli.db.unwrap_or_else(default_db_path);
    let clock = AppClock::new(cli.today);
    match cli.command {
        Some(Commands::Add { name, fields }) => {
            cmd_add(&db, clock, name, fields.into_task_args(None), false)?;
        }
        Some(Commands::List { view, on, task_type }) => {
            let view = match (on, task_type) {
                (Some(date), _) => View::On(notify_tasks::dates::parse_date(&date, &clock)?),
                (None, Some(t)) => View::Type(t.into()),
                (None, None) => match view {
                    ListView::Pending => View::Pending,
                    ListView::Today => View::Today,
                    ListView::Overdue => View::Overdue,
                    ListView::ComingSoon => View::ComingSoon,
                    ListView::Floating => View::Floating,
                    ListView::Completed => View::Completed,
                },
            };
            cmd_list(&db, clock, view)?;
        }
        Some(Commands::Edit { id, name, fields, floating }) => {
            cmd_edit(&db, clock, id, fields.into_task_args(name), floating, false)?;
        }
        Some(Commands::Delete { id }) => cmd_delete(&db, clock, id, false)?,
        Some(Commands::Done { id }) => cmd_mark(&db, clock, id, true, false)?,
        Some(Commands::Undone { id }) => cmd_mark(&db, clock, id, false, false)?,
        Some(Commands::Search { keyword }) => cmd_search(&db, clock, keyword)?,
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "notify", &mut io::stdout());
        }
        Some(Commands::Ui) | None => run_tui(&db, clock)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
