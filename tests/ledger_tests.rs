mod common;
use common::{TestEnv, local};

use rworklog::db::queries::{
    count_sessions, delete_session, delete_sessions_in_range, get_active_session,
    get_session_by_id, get_sessions_in_range, insert_session, oldest_session_date,
    update_session,
};
use rworklog::errors::AppError;
use rworklog::models::Session;

fn closed(id: &str, start: &str, end: &str, break_minutes: i32) -> Session {
    let start = local(start);
    Session {
        id: id.to_string(),
        date: start.date_naive(),
        start,
        end: Some(local(end)),
        break_minutes,
        note: None,
    }
}

#[test]
fn test_insert_assigns_uuid_and_derives_date() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-10T12:00");

    let s = Session::open(local("2025-03-10T09:00"), Some("standup".into()));
    let stored = insert_session(&ctx.pool, &s).unwrap();

    assert_eq!(stored.id.len(), 36);
    assert_eq!(stored.date.to_string(), "2025-03-10");

    let back = get_session_by_id(&ctx.pool, &stored.id).unwrap();
    assert_eq!(back.start, stored.start);
    assert_eq!(back.note.as_deref(), Some("standup"));
    assert!(back.is_active());
}

#[test]
fn test_instants_stored_as_utc_and_bucketed_locally() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-10T12:00");

    // 00:30 in Vienna (UTC+1) is still the previous day in UTC
    let s = closed("tz-check-0001", "2025-03-10T00:30", "2025-03-10T02:30", 0);
    insert_session(&ctx.pool, &s).unwrap();

    let (raw_start, raw_date): (String, String) = ctx
        .pool
        .conn
        .query_row(
            "SELECT start_time, date FROM work_sessions WHERE id = 'tz-check-0001'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(raw_start, "2025-03-09T23:30:00Z");
    assert_eq!(raw_date, "2025-03-10");

    let back = get_session_by_id(&ctx.pool, "tz-check-0001").unwrap();
    assert_eq!(back.date.to_string(), "2025-03-10");
    assert_eq!(back.start.format("%H:%M").to_string(), "00:30");
}

#[test]
fn test_short_id_resolution() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-10T12:00");

    let stored = insert_session(
        &ctx.pool,
        &closed("", "2025-03-10T08:00", "2025-03-10T09:00", 0),
    )
    .unwrap();

    let short = &stored.id[..8];
    assert_eq!(get_session_by_id(&ctx.pool, short).unwrap().id, stored.id);

    // longer than the short form but not the stored id: no prefix fallback
    let noisy = format!("{short}-not-the-rest");
    let err = get_session_by_id(&ctx.pool, &noisy).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // shorter than the short form: no prefix lookup
    let err = get_session_by_id(&ctx.pool, &stored.id[..6]).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_stale_full_id_does_not_resolve_to_sibling() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-10T12:00");

    insert_session(
        &ctx.pool,
        &closed(
            "abcdef12-1111-4111-8111-111111111111",
            "2025-03-10T08:00",
            "2025-03-10T09:00",
            0,
        ),
    )
    .unwrap();

    let err = get_session_by_id(&ctx.pool, "abcdef12-9999-4999-8999-999999999999").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // the short form still reaches it, and delete with the stale id removes nothing
    assert!(get_session_by_id(&ctx.pool, "abcdef12").is_ok());
    assert!(matches!(
        delete_session(&ctx.pool, "abcdef12-9999-4999-8999-999999999999").unwrap_err(),
        AppError::NotFound(_)
    ));
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 1);
}

#[test]
fn test_ambiguous_prefix_is_rejected() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-10T12:00");

    insert_session(
        &ctx.pool,
        &closed("abcdef12-aaaa", "2025-03-10T08:00", "2025-03-10T09:00", 0),
    )
    .unwrap();
    insert_session(
        &ctx.pool,
        &closed("abcdef12-bbbb", "2025-03-10T10:00", "2025-03-10T11:00", 0),
    )
    .unwrap();

    match get_session_by_id(&ctx.pool, "abcdef12").unwrap_err() {
        AppError::Ambiguous { prefix, count } => {
            assert_eq!(prefix, "abcdef12");
            assert_eq!(count, 2);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }

    // a full identifier still wins
    let exact = get_session_by_id(&ctx.pool, "abcdef12-bbbb").unwrap();
    assert_eq!(exact.id, "abcdef12-bbbb");
}

#[test]
fn test_prefix_is_not_a_like_pattern() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-10T12:00");

    insert_session(
        &ctx.pool,
        &closed("abcdef12-aaaa", "2025-03-10T08:00", "2025-03-10T09:00", 0),
    )
    .unwrap();

    let err = get_session_by_id(&ctx.pool, "abcd%___").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-10T12:00");

    let ghost = closed("ghost", "2025-03-10T08:00", "2025-03-10T09:00", 0);
    assert!(matches!(
        update_session(&ctx.pool, &ghost).unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        delete_session(&ctx.pool, "ghost").unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[test]
fn test_range_query_intersects_and_keeps_active_open() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-12T12:00");

    insert_session(
        &ctx.pool,
        &closed("a", "2025-03-09T22:00", "2025-03-10T02:00", 0),
    )
    .unwrap();
    insert_session(
        &ctx.pool,
        &closed("b", "2025-03-10T09:00", "2025-03-10T17:00", 30),
    )
    .unwrap();
    insert_session(
        &ctx.pool,
        &closed("c", "2025-03-08T09:00", "2025-03-08T10:00", 0),
    )
    .unwrap();
    insert_session(&ctx.pool, &Session::open(local("2025-03-10T20:00"), None)).unwrap();

    let found = get_sessions_in_range(
        &ctx.pool,
        &local("2025-03-10T00:00"),
        &local("2025-03-10T23:59"),
    )
    .unwrap();

    // ordered by start; "c" is outside, the active one is open-ended
    let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], "a");
    assert_eq!(ids[1], "b");
    assert!(found[2].is_active());

    let later = get_sessions_in_range(
        &ctx.pool,
        &local("2025-03-11T00:00"),
        &local("2025-03-11T23:59"),
    )
    .unwrap();
    assert_eq!(later.len(), 1);
    assert!(later[0].is_active());
}

#[test]
fn test_range_delete_never_removes_active() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-12T12:00");

    insert_session(
        &ctx.pool,
        &closed("a", "2025-03-10T09:00", "2025-03-10T17:00", 30),
    )
    .unwrap();
    let active = insert_session(&ctx.pool, &Session::open(local("2025-03-11T09:00"), None))
        .unwrap();

    let deleted = delete_sessions_in_range(
        &ctx.pool,
        &local("2025-03-01T00:00"),
        &local("2025-03-31T23:59"),
    )
    .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(count_sessions(&ctx.pool).unwrap(), 1);
    assert_eq!(get_active_session(&ctx.pool).unwrap().unwrap().id, active.id);
}

#[test]
fn test_oldest_session_date() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-12T12:00");

    assert!(oldest_session_date(&ctx.pool).unwrap().is_none());

    insert_session(
        &ctx.pool,
        &closed("b", "2025-03-10T09:00", "2025-03-10T17:00", 30),
    )
    .unwrap();
    insert_session(
        &ctx.pool,
        &closed("a", "2025-01-31T23:30", "2025-02-01T01:00", 0),
    )
    .unwrap();

    assert_eq!(
        oldest_session_date(&ctx.pool).unwrap().unwrap().to_string(),
        "2025-01-31"
    );
}

#[test]
fn test_unusable_schema_is_a_migration_error() {
    let env = TestEnv::new();

    // a `log` table from some other tool: the migration bookkeeping cannot read it
    let conn = rusqlite::Connection::open(&env.db).unwrap();
    conn.execute_batch("CREATE TABLE log (x INTEGER);").unwrap();
    drop(conn);

    let clock = rworklog::utils::time::Clock::fixed(common::tz(), common::naive("2025-03-10T12:00"));
    match rworklog::context::AppContext::open(env.config(), clock) {
        Err(AppError::Migration(msg)) => assert!(msg.contains("operation")),
        Err(other) => panic!("expected a migration error, got {other}"),
        Ok(_) => panic!("expected a migration error"),
    }
}
