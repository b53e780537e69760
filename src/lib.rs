//! # Notify
//!
//! A terminal task tracker for things with a deadline, things that span a
//! few days, and things that float without any date at all.
//!
//! ## Features
//!
//! *   **Three task types**: floating, deadline and range tasks.
//! *   **Derived states**: overdue, coming soon, ending soon and started are
//!     worked out from the dates every time they are asked for.
//! *   **Undo**: adds, edits, deletes and completions are commands that can be
//!     reverted, most recent first.
//! *   **Soft deletion**: deleted tasks keep their id and stay in the database.
//! *   **Dual Interface**: a CLI for single commands and a TUI for
//!     interactive sessions.
//!
//! ## Usage
//!
//! ```bash
//! # Deadline task
//! notify add "Submit report" --category work --due 2026-12-01
//!
//! # Range task
//! notify add "Conference" --start 2026-11-03 --due 2026-11-05
//!
//! # Floating task
//! notify add "Read a book"
//!
//! # Views
//! notify list today
//! notify list overdue
//! notify list coming-soon
//!
//! notify done <ID>
//! notify search report
//! ```
//!
//! Running `notify` without arguments opens the TUI.
//!
//! ## Data Storage
//!
//! Tasks are saved as JSON in your local data directory:
//! *   Linux: `~/.local/share/notify/tasks.json`
//! *   macOS: `~/Library/Application Support/notify/tasks.json`
//! *   Windows: `%APPDATA%\notify\tasks.json`
//!
//! You can override this with `--db` or the `NOTIFY_DB` environment variable.
//!
//! ## Dates
//!
//! Days are compared by year, then by day of the year. "Coming soon" and
//! "ending soon" look at a seven-day window starting today.

pub mod clock;
pub mod command;
pub mod commands;
pub mod dates;
pub mod error;
pub mod manager;
pub mod models;
pub mod session;
pub mod storage;
pub mod tui;

pub use error::{Error, Result};
