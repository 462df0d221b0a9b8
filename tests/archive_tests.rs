mod common;
use common::{TestEnv, local, read};

use rworklog::core::archive::ArchiveLogic;
use rworklog::core::background::spawn_auto_archive;
use rworklog::db::queries::{count_sessions, get_sessions_started_in_range, insert_session};
use rworklog::errors::AppError;
use rworklog::models::Session;
use rworklog::utils::time::Clock;
use std::fs;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn closed(start: &str, end: &str, break_minutes: i32, note: Option<&str>) -> Session {
    let start = local(start);
    Session {
        id: String::new(),
        date: start.date_naive(),
        start,
        end: Some(local(end)),
        break_minutes,
        note: note.map(str::to_string),
    }
}

fn seed(env: &TestEnv, sessions: &[Session]) {
    let ctx = env.ctx_at("2025-01-01T00:00");
    for s in sessions {
        insert_session(&ctx.pool, s).unwrap();
    }
}

fn month_count(env: &TestEnv, now: &str, from: &str, to: &str) -> usize {
    let ctx = env.ctx_at(now);
    get_sessions_started_in_range(&ctx.pool, &local(from), &local(to))
        .unwrap()
        .len()
}

#[test]
fn test_empty_month_writes_and_deletes_nothing() {
    let env = TestEnv::new();
    seed(
        &env,
        &[closed("2025-02-03T09:00", "2025-02-03T17:00", 30, None)],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");
    let err = ArchiveLogic::archive_month(&ctx, 2025, 1, true).unwrap_err();

    assert!(matches!(err, AppError::EmptyMonth(_)));
    assert!(!ArchiveLogic::archive_path(&ctx.cfg, 2025, 1).exists());
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 1);
}

#[test]
fn test_archive_month_markdown_record() {
    let env = TestEnv::new();
    seed(
        &env,
        &[
            // 2025-02-03 / 04: Monday and Tuesday of ISO week 6
            closed(
                "2025-02-03T09:00",
                "2025-02-03T17:00",
                30,
                Some("a note that is definitely longer than thirty columns"),
            ),
            closed("2025-02-04T09:00", "2025-02-04T17:30", 30, Some("a|b")),
        ],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");
    let path = ArchiveLogic::archive_month(&ctx, 2025, 2, false).unwrap();

    assert_eq!(path, env.history().join("2025-02.md"));
    let md = read(&path);

    assert!(md.starts_with("# February 2025\n"));
    assert!(md.contains("| Total Hours | 15.50 |"));
    assert!(md.contains("| Days Worked | 2 |"));
    assert!(md.contains("| Daily Average | 7.75 |"));
    assert!(md.contains("| Weekly Goal | 38.50 |"));
    assert!(md.contains("| W6 | 15.50 |"));
    assert!(md.contains("| 2025-02-03 | 09:00 | 17:00 | 7.50 | 30m | a note that is definitely l... |"));
    assert!(md.contains("| 2025-02-04 | 09:00 | 17:30 | 8.00 | 30m | a\\|b |"));
    assert!(md.contains("---\n*Archived: 2025-04-15 10:00*"));

    // no temp file left, rows kept without --clean
    assert!(!env.history().join("2025-02.md.tmp").exists());
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 2);
}

#[test]
fn test_archive_overwrites_deterministically() {
    let env = TestEnv::new();
    seed(
        &env,
        &[closed("2025-02-03T09:00", "2025-02-03T17:00", 30, None)],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");
    let path = ArchiveLogic::archive_month(&ctx, 2025, 2, false).unwrap();
    let first = read(&path);
    ArchiveLogic::archive_month(&ctx, 2025, 2, false).unwrap();

    assert_eq!(read(&path), first);
}

#[test]
fn test_archive_with_delete_keeps_active_session() {
    let env = TestEnv::new();
    seed(
        &env,
        &[
            closed("2025-02-03T09:00", "2025-02-03T17:00", 30, None),
            Session::open(local("2025-02-27T09:00"), None),
        ],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");
    let path = ArchiveLogic::archive_month(&ctx, 2025, 2, true).unwrap();

    let md = read(&path);
    assert!(md.contains("| 2025-02-27 | 09:00 | active | - | 0m |"));
    assert!(md.contains("| Total Hours | 7.50 |"));

    assert_eq!(count_sessions(&ctx.pool).unwrap(), 1);
    assert!(rworklog::db::queries::get_active_session(&ctx.pool).unwrap().is_some());
}

#[test]
fn test_auto_archive_is_idempotent() {
    let env = TestEnv::new();
    seed(
        &env,
        &[
            closed("2025-01-13T09:00", "2025-01-13T17:00", 30, None),
            closed("2025-02-03T09:00", "2025-02-03T17:00", 30, None),
            // March has nothing, April is the current month
            closed("2025-04-01T09:00", "2025-04-01T12:00", 0, None),
        ],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");

    let first = ArchiveLogic::auto_archive_past_months(&ctx);
    assert!(first.error.is_none());
    assert_eq!(first.archived, vec!["2025-01.md", "2025-02.md"]);

    let second = ArchiveLogic::auto_archive_past_months(&ctx);
    assert!(second.error.is_none());
    assert!(second.archived.is_empty());

    assert!(!env.history().join("2025-03.md").exists());
    assert_eq!(
        month_count(&env, "2025-04-15T10:00", "2025-01-01T00:00", "2025-02-28T23:59"),
        0
    );
    // the current month is untouched
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 1);
}

#[test]
fn test_auto_archive_on_empty_ledger() {
    let env = TestEnv::new();
    let report = ArchiveLogic::auto_archive_past_months(&env.ctx_at("2025-04-15T10:00"));
    assert!(report.archived.is_empty());
    assert!(report.error.is_none());
    assert!(!env.history().exists());
}

#[test]
fn test_auto_archive_skips_existing_records() {
    let env = TestEnv::new();
    seed(
        &env,
        &[closed("2025-01-13T09:00", "2025-01-13T17:00", 30, None)],
    );

    fs::create_dir_all(env.history()).unwrap();
    fs::write(env.history().join("2025-01.md"), "kept as is\n").unwrap();

    let ctx = env.ctx_at("2025-04-15T10:00");
    let report = ArchiveLogic::auto_archive_past_months(&ctx);

    assert!(report.archived.is_empty());
    assert_eq!(read(&env.history().join("2025-01.md")), "kept as is\n");
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 1);
}

#[test]
fn test_auto_archive_stops_before_month_of_open_session() {
    let env = TestEnv::new();
    seed(
        &env,
        &[
            closed("2025-01-13T09:00", "2025-01-13T17:00", 30, None),
            Session::open(local("2025-02-28T22:00"), None),
            closed("2025-02-03T09:00", "2025-02-03T17:00", 30, None),
        ],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");
    let report = ArchiveLogic::auto_archive_past_months(&ctx);

    assert!(report.error.is_none());
    assert_eq!(report.archived, vec!["2025-01.md"]);
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 2);
}

#[test]
fn test_auto_archive_keeps_partial_progress_on_failure() {
    let env = TestEnv::new();
    seed(
        &env,
        &[
            closed("2025-01-13T09:00", "2025-01-13T17:00", 30, None),
            closed("2025-02-03T09:00", "2025-02-03T17:00", 30, None),
            closed("2025-03-03T09:00", "2025-03-03T17:00", 30, None),
        ],
    );

    // a directory where February's temp file must go
    fs::create_dir_all(env.history().join("2025-02.md.tmp")).unwrap();

    let ctx = env.ctx_at("2025-05-15T10:00");
    let report = ArchiveLogic::auto_archive_past_months(&ctx);

    assert_eq!(report.archived, vec!["2025-01.md"]);
    assert!(matches!(report.error, Some(AppError::Io(_))));
    assert!(!env.history().join("2025-02.md").exists());
    assert!(!env.history().join("2025-03.md").exists());
    // February and March still live in the ledger
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 2);
}

#[test]
fn test_cancelled_walk_archives_nothing() {
    let env = TestEnv::new();
    seed(
        &env,
        &[closed("2025-01-13T09:00", "2025-01-13T17:00", 30, None)],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");
    let report = ArchiveLogic::auto_archive_until_cancelled(&ctx, &AtomicBool::new(true));

    assert!(report.archived.is_empty());
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 1);
}

#[test]
fn test_background_task_reports_over_channel() {
    let env = TestEnv::new();
    seed(
        &env,
        &[closed("2025-01-13T09:00", "2025-01-13T17:00", 30, None)],
    );

    let clock = Clock::fixed(common::tz(), common::naive("2025-04-15T10:00"));
    let report = spawn_auto_archive(env.config(), clock)
        .wait(Duration::from_secs(30))
        .expect("background report");

    assert_eq!(report.archived, vec!["2025-01.md"]);
    assert!(report.error.is_none());
    assert!(env.history().join("2025-01.md").exists());
}

#[test]
fn test_list_read_and_history_context() {
    let env = TestEnv::new();
    seed(
        &env,
        &[
            closed("2025-01-13T09:00", "2025-01-13T17:00", 30, None),
            closed("2025-02-03T09:00", "2025-02-03T17:00", 30, None),
        ],
    );

    let ctx = env.ctx_at("2025-04-15T10:00");
    assert!(ArchiveLogic::list_archives(&ctx.cfg).unwrap().is_empty());
    assert_eq!(ArchiveLogic::history_context(&ctx.cfg, 3).unwrap(), "");

    ArchiveLogic::auto_archive_past_months(&ctx);

    assert_eq!(
        ArchiveLogic::list_archives(&ctx.cfg).unwrap(),
        vec!["2025-01.md", "2025-02.md"]
    );
    assert!(
        ArchiveLogic::read_archive(&ctx.cfg, 2025, 1)
            .unwrap()
            .starts_with("# January 2025")
    );
    assert!(matches!(
        ArchiveLogic::read_archive(&ctx.cfg, 2024, 12).unwrap_err(),
        AppError::ArchiveNotFound(_)
    ));

    let history = ArchiveLogic::history_context(&ctx.cfg, 1).unwrap();
    assert!(history.starts_with("HISTORICAL DATA:\n"));
    assert!(history.contains("February 2025:"));
    assert!(history.contains("  | Total Hours | 7.50 |"));
    assert!(!history.contains("January 2025"));
    assert!(!history.contains("| Metric"));
}
