use chrono::{NaiveDate, NaiveTime};
use notify_tasks::clock::AppClock;
use notify_tasks::commands::*;
use notify_tasks::models::TaskType;
use notify_tasks::storage::{JsonStorage, Storage};
use notify_tasks::Error;
use std::path::Path;

fn clock() -> AppClock {
    AppClock::new(NaiveDate::from_ymd_opt(2026, 1, 5))
}

fn with_test_db<F>(f: F)
where
    F: FnOnce(&Path),
{
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tasks.json");
    f(&db_path);
}

fn load(db: &Path) -> Vec<notify_tasks::models::Task> {
    JsonStorage::new(db).load_tasks().unwrap()
}

fn args(due: Option<&str>, start: Option<&str>) -> TaskArgs {
    TaskArgs {
        due: due.map(String::from),
        start: start.map(String::from),
        ..TaskArgs::default()
    }
}

#[test]
fn test_add_and_list() {
    with_test_db(|db| {
        let mut fields = args(Some("2026-12-01"), None);
        fields.category = Some("Work".into());
        cmd_add(db, clock(), "Test Task".into(), fields, true).unwrap();

        let tasks = load(db);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 0);
        assert_eq!(tasks[0].name, "Test Task");
        assert_eq!(tasks[0].category, "Work");
        assert_eq!(tasks[0].task_type, TaskType::Deadline);
        cmd_list(db, clock(), notify_tasks::session::View::Pending).unwrap();
    });
}

#[test]
fn test_add_infers_type_from_dates() {
    with_test_db(|db| {
        cmd_add(db, clock(), "Float".into(), TaskArgs::default(), true).unwrap();
        cmd_add(db, clock(), "Trip".into(), args(Some("2026-01-09"), Some("today")), true).unwrap();
        let mut timed = args(Some("tomorrow"), None);
        timed.due_time = Some("17:30".into());
        cmd_add(db, clock(), "Call".into(), timed, true).unwrap();

        let tasks = load(db);
        assert_eq!(tasks[0].task_type, TaskType::Floating);
        assert_eq!(tasks[1].task_type, TaskType::Range);
        assert_eq!(tasks[1].start_date(), NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(tasks[2].end_date(), NaiveDate::from_ymd_opt(2026, 1, 6));
        assert!(tasks[2].date_range.as_ref().unwrap().end_time().is_some());
    });
}

#[test]
fn test_add_rejects_bad_input() {
    with_test_db(|db| {
        let err = cmd_add(db, clock(), "Bad".into(), args(Some("12/01/2026"), None), true).unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
        let err = cmd_add(db, clock(), "Bad".into(), args(Some("2026-01-01"), Some("2026-01-09")), true).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
        assert!(load(db).is_empty());
    });
}

#[test]
fn test_add_rejects_empty_name() {
    with_test_db(|db| {
        let err = cmd_add(db, clock(), "   ".into(), TaskArgs::default(), true).unwrap_err();
        assert!(matches!(err, Error::EmptyName));
        assert!(load(db).is_empty());

        let id = cmd_add(db, clock(), "  Water plants ".into(), TaskArgs::default(), true).unwrap();
        assert_eq!(load(db)[id as usize].name, "Water plants");
    });
}

#[test]
fn test_edit_rejects_empty_name() {
    with_test_db(|db| {
        cmd_add(db, clock(), "Keep me".into(), TaskArgs::default(), true).unwrap();
        let edit = TaskArgs {
            name: Some(String::new()),
            ..TaskArgs::default()
        };
        assert!(matches!(cmd_edit(db, clock(), 0, edit, false, true), Err(Error::EmptyName)));
        assert_eq!(load(db)[0].name, "Keep me");
    });
}

#[test]
fn test_time_needs_a_date() {
    with_test_db(|db| {
        let mut timed = TaskArgs::default();
        timed.due_time = Some("09:00".into());
        let err = cmd_add(db, clock(), "Standup".into(), timed.clone(), true).unwrap_err();
        assert!(matches!(err, Error::TimeWithoutDate));

        cmd_add(db, clock(), "Standup".into(), TaskArgs::default(), true).unwrap();
        let err = cmd_edit(db, clock(), 0, timed, false, true).unwrap_err();
        assert!(matches!(err, Error::TimeWithoutDate));
        assert!(load(db)[0].date_range.is_none());
    });
}

#[test]
fn test_edit_keeps_times_and_dates_not_given() {
    with_test_db(|db| {
        let mut fields = args(Some("2026-01-09"), None);
        fields.due_time = Some("17:30".into());
        cmd_add(db, clock(), "Report".into(), fields, true).unwrap();

        cmd_edit(db, clock(), 0, args(Some("2026-01-12"), None), false, true).unwrap();
        let range = load(db)[0].date_range.clone().unwrap();
        assert_eq!(range.end_date(), NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
        assert_eq!(range.end_time(), NaiveTime::from_hms_opt(17, 30, 0));

        let mut retimed = TaskArgs::default();
        retimed.start_time = Some("08:00".into());
        retimed.start = Some("2026-01-10".into());
        cmd_edit(db, clock(), 0, retimed, false, true).unwrap();
        let range = load(db)[0].date_range.clone().unwrap();
        assert_eq!(range.start_time(), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(range.end_time(), NaiveTime::from_hms_opt(17, 30, 0));
        assert_eq!(range.end_date(), NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
    });
}

#[test]
fn test_corrupt_task_in_database_is_an_error() {
    with_test_db(|db| {
        std::fs::write(db, r#"[{"id":0,"task_type":"deadline","name":"x"}]"#).unwrap();
        let err = cmd_list(db, clock(), notify_tasks::session::View::Overdue).unwrap_err();
        assert!(matches!(err, Error::InvalidTask { id: 0, .. }));
    });
}

#[test]
fn test_complete_task() {
    with_test_db(|db| {
        cmd_add(db, clock(), "Task to complete".into(), TaskArgs::default(), true).unwrap();
        cmd_mark(db, clock(), 0, true, true).unwrap();
        assert!(load(db)[0].is_completed);
        cmd_mark(db, clock(), 0, false, true).unwrap();
        assert!(!load(db)[0].is_completed);
    });
}

#[test]
fn test_delete_keeps_task_in_database() {
    with_test_db(|db| {
        cmd_add(db, clock(), "Task to delete".into(), TaskArgs::default(), true).unwrap();
        cmd_delete(db, clock(), 0, true).unwrap();

        let tasks = load(db);
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].is_deleted);

        assert!(matches!(cmd_delete(db, clock(), 0, true), Err(Error::TaskNotFound(0))));
        assert!(matches!(cmd_mark(db, clock(), 7, true, true), Err(Error::TaskNotFound(7))));
    });
}

#[test]
fn test_ids_continue_after_reload() {
    with_test_db(|db| {
        cmd_add(db, clock(), "one".into(), TaskArgs::default(), true).unwrap();
        cmd_add(db, clock(), "two".into(), TaskArgs::default(), true).unwrap();
        cmd_delete(db, clock(), 1, true).unwrap();
        let id = cmd_add(db, clock(), "three".into(), TaskArgs::default(), true).unwrap();
        assert_eq!(id, 2);
    });
}

#[test]
fn test_edit_task() {
    with_test_db(|db| {
        cmd_add(db, clock(), "Conference".into(), args(Some("2026-01-09"), Some("2026-01-07")), true).unwrap();

        let edit = TaskArgs {
            name: Some("Summit".into()),
            due: Some("2026-01-10".into()),
            ..TaskArgs::default()
        };
        cmd_edit(db, clock(), 0, edit, false, true).unwrap();
        let task = &load(db)[0];
        assert_eq!(task.name, "Summit");
        assert_eq!(task.task_type, TaskType::Range);
        assert_eq!(task.start_date(), NaiveDate::from_ymd_opt(2026, 1, 7));
        assert_eq!(task.end_date(), NaiveDate::from_ymd_opt(2026, 1, 10));

        cmd_edit(db, clock(), 0, TaskArgs::default(), true, true).unwrap();
        assert_eq!(load(db)[0].task_type, TaskType::Floating);
        assert!(load(db)[0].date_range.is_none());

        assert!(matches!(
            cmd_edit(db, clock(), 9, TaskArgs::default(), false, true),
            Err(Error::TaskNotFound(9))
        ));
    });
}

#[test]
fn test_search_and_views_run() {
    with_test_db(|db| {
        cmd_add(db, clock(), "Pay rent".into(), args(Some("2026-01-01"), None), true).unwrap();
        cmd_search(db, clock(), "rent".into()).unwrap();
        cmd_list(db, clock(), notify_tasks::session::View::Overdue).unwrap();
    });
}
