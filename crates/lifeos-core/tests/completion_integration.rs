//! End-to-end completion flows over an in-memory database.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use lifeos_core::completion::CompletionController;
use lifeos_core::error::CoreError;
use lifeos_core::model::{log_status, Task, TaskKind, UserProfile};
use lifeos_core::storage::Database;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
    chrono_tz::UTC.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn recurring(db: &Database, title: &str) -> Task {
    let task = Task::new(title);
    db.create_task(&task).unwrap();
    task
}

#[test]
fn marking_done_twice_awards_xp_once() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let task = recurring(&db, "Morning run");
    let now = at(2024, 1, 1, 9, 0);

    let first = controller
        .mark(&task.id, log_status::DONE, None, now)
        .unwrap();
    assert_eq!(first.profile.xp, 10);
    assert_eq!(first.profile.streak, 1);

    let second = controller
        .mark(&task.id, log_status::DONE, None, at(2024, 1, 1, 21, 0))
        .unwrap();
    assert_eq!(second.profile.xp, 10);
    assert_eq!(second.profile.streak, 1);

    // Exactly one done log for the day.
    assert_eq!(db.count_done_on("2024-01-01").unwrap(), 1);
}

#[test]
fn undo_deletes_log_but_keeps_xp_and_streak() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let task = recurring(&db, "Stretch");
    let now = at(2024, 1, 1, 9, 0);

    controller
        .mark(&task.id, log_status::DONE, None, now)
        .unwrap();
    let undone = controller
        .mark(&task.id, log_status::PENDING, None, now)
        .unwrap();

    assert!(db.get_log(&task.id, "2024-01-01").unwrap().is_none());
    // Reversal is lossy: no XP revoked, no streak decrement.
    assert_eq!(undone.profile.xp, 10);
    assert_eq!(undone.profile.streak, 1);
}

#[test]
fn unrecognized_status_behaves_as_undo() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let task = recurring(&db, "Journal");
    let now = at(2024, 1, 1, 9, 0);

    controller
        .mark(&task.id, log_status::DONE, None, now)
        .unwrap();
    let outcome = controller.mark(&task.id, "half-done", None, now).unwrap();

    assert_eq!(outcome.status, "half-done");
    assert!(db.get_log(&task.id, "2024-01-01").unwrap().is_none());
}

#[test]
fn one_time_task_archives_on_first_completion() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let mut task = Task::new("File taxes");
    task.kind = TaskKind::OneTime;
    db.create_task(&task).unwrap();

    controller
        .mark(&task.id, log_status::DONE, Some("finally"), at(2024, 1, 1, 9, 0))
        .unwrap();

    let archived = db.get_task(&task.id).unwrap().unwrap();
    assert!(archived.archived);
    // Excluded from the default (non-archived) listing.
    assert!(db.list_tasks(false).unwrap().is_empty());

    let log = db.get_log(&task.id, "2024-01-01").unwrap().unwrap();
    assert_eq!(log.note.as_deref(), Some("finally"));
}

#[test]
fn recurring_task_never_auto_archives() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let task = recurring(&db, "Meditate");

    controller
        .mark(&task.id, log_status::DONE, None, at(2024, 1, 1, 9, 0))
        .unwrap();
    controller
        .mark(&task.id, log_status::DONE, None, at(2024, 1, 2, 9, 0))
        .unwrap();

    assert!(!db.get_task(&task.id).unwrap().unwrap().archived);
    assert_eq!(db.list_tasks(false).unwrap().len(), 1);
}

#[test]
fn level_cascades_when_threshold_crossed() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let task = recurring(&db, "Deep work");

    db.save_profile(&UserProfile {
        level: 1,
        xp: 95,
        streak: 0,
        last_activity_day: None,
    })
    .unwrap();

    let outcome = controller
        .mark(&task.id, log_status::DONE, None, at(2024, 1, 1, 9, 0))
        .unwrap();
    assert_eq!(outcome.profile.level, 2);
    assert_eq!(outcome.profile.xp, 5);
}

#[test]
fn streak_extends_on_consecutive_days_and_resets_after_gap() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let task = recurring(&db, "Duolingo");

    let day1 = controller
        .mark(&task.id, log_status::DONE, None, at(2024, 1, 1, 9, 0))
        .unwrap();
    assert_eq!(day1.profile.streak, 1);

    let day2 = controller
        .mark(&task.id, log_status::DONE, None, at(2024, 1, 2, 9, 0))
        .unwrap();
    assert_eq!(day2.profile.streak, 2);

    // Two idle days: the next completion starts over at 1.
    let day4 = controller
        .mark(&task.id, log_status::DONE, None, at(2024, 1, 4, 9, 0))
        .unwrap();
    assert_eq!(day4.profile.streak, 1);
}

#[test]
fn stats_project_streak_decay_without_writing() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);

    db.save_profile(&UserProfile {
        level: 2,
        xp: 30,
        streak: 5,
        last_activity_day: NaiveDate::from_ymd_opt(2024, 1, 1),
    })
    .unwrap();

    let stats = controller.stats(at(2024, 1, 5, 12, 0)).unwrap();
    assert_eq!(stats.effective_streak, 0);

    // The stored streak is untouched until the next completion.
    assert_eq!(db.get_or_create_profile().unwrap().streak, 5);
}

#[test]
fn stats_count_today_and_last_seven_days() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);
    let run = recurring(&db, "Run");
    let read = recurring(&db, "Read");
    recurring(&db, "Untouched");

    controller
        .mark(&run.id, log_status::DONE, None, at(2024, 1, 1, 9, 0))
        .unwrap();
    controller
        .mark(&run.id, log_status::DONE, None, at(2024, 1, 6, 9, 0))
        .unwrap();
    controller
        .mark(&read.id, log_status::DONE, None, at(2024, 1, 7, 9, 0))
        .unwrap();

    let stats = controller.stats(at(2024, 1, 7, 22, 0)).unwrap();
    assert_eq!(stats.completed_today, 1);
    assert_eq!(stats.total_active, 3);
    // Trailing window is the inclusive [Jan 1, Jan 7], so all three count.
    assert_eq!(stats.completed_last_7_days, 3);
    assert!((stats.completion_rate_today - 1.0 / 3.0).abs() < f64::EPSILON);
}

#[test]
fn marking_unknown_task_is_not_found() {
    let db = Database::open_memory().unwrap();
    let controller = CompletionController::new(&db);

    let err = controller
        .mark("missing", log_status::DONE, None, at(2024, 1, 1, 9, 0))
        .unwrap_err();
    assert!(matches!(err, CoreError::TaskNotFound { .. }));
}
