mod common;
use common::{TestEnv, approx};

use chrono::NaiveDate;
use rworklog::core::progress::ProgressLogic;
use rworklog::core::session::SessionLogic;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Clock in at `start`, clock out at `end` (same local day) with `brk`.
fn work(env: &TestEnv, day: &str, start: &str, end: &str, brk: i32) {
    SessionLogic::clock_in(&env.ctx_at(&format!("{day}T{start}")), None, None).unwrap();
    SessionLogic::clock_out(
        &env.ctx_at(&format!("{day}T{end}")),
        None,
        Some(brk),
        None,
        None,
    )
    .unwrap();
}

#[test]
fn test_week_scenario_against_goal() {
    let env = TestEnv::new();

    // 2025-03-10 is a Monday
    work(&env, "2025-03-10", "09:00", "17:00", 30);
    work(&env, "2025-03-11", "09:00", "17:30", 30);

    let week = ProgressLogic::week_progress(&env.ctx_at("2025-03-12T10:00")).unwrap();

    assert_eq!(week.week_start, d("2025-03-10"));
    assert_eq!(week.week_end, d("2025-03-16"));
    assert!(approx(week.total_hours, 15.5));
    assert!(approx(week.remaining_hours, 23.0));
    assert_eq!(week.days_worked_count, 2);
    assert!(approx(week.hours_on(&d("2025-03-10")), 7.5));
    assert!(approx(week.hours_on(&d("2025-03-11")), 8.0));
    assert!(approx(week.hours_on(&d("2025-03-12")), 0.0));
}

#[test]
fn test_week_total_matches_sum_of_closed_durations() {
    let env = TestEnv::new();

    work(&env, "2025-03-10", "08:00", "12:00", 0);
    work(&env, "2025-03-10", "13:00", "17:15", 15);
    work(&env, "2025-03-12", "07:30", "16:00", 30);
    work(&env, "2025-03-14", "09:00", "13:00", 0);
    // open session: counted nowhere
    SessionLogic::clock_in(&env.ctx_at("2025-03-15T10:00"), None, None).unwrap();

    let ctx = env.ctx_at("2025-03-15T11:00");
    let week = ProgressLogic::week_progress(&ctx).unwrap();

    let expected: f64 = week.sessions.iter().filter_map(|s| s.duration_hours()).sum();
    assert!(approx(week.total_hours, expected));
    assert!(approx(week.total_hours, 4.0 + 4.0 + 8.0 + 4.0));
    assert_eq!(week.days_worked_count, 3);
    assert!(approx(week.remaining_hours, 38.5 - 20.0));
}

#[test]
fn test_overtime_gives_negative_remaining() {
    let env = TestEnv::new();

    for day in ["2025-03-10", "2025-03-11", "2025-03-12", "2025-03-13", "2025-03-14"] {
        work(&env, day, "08:00", "17:00", 0);
    }

    let week = ProgressLogic::week_progress(&env.ctx_at("2025-03-14T18:00")).unwrap();
    assert!(approx(week.total_hours, 45.0));
    assert!(approx(week.remaining_hours, -6.5));
}

#[test]
fn test_last_week_and_week_for_date() {
    let env = TestEnv::new();

    work(&env, "2025-03-05", "09:00", "12:00", 0);
    work(&env, "2025-03-11", "09:00", "10:00", 0);

    let ctx = env.ctx_at("2025-03-12T10:00");

    let last = ProgressLogic::last_week_progress(&ctx).unwrap();
    assert_eq!(last.week_start, d("2025-03-03"));
    assert!(approx(last.total_hours, 3.0));

    let other = ProgressLogic::week_progress_for_date(&ctx, d("2025-03-08")).unwrap();
    assert_eq!(other.week_start, d("2025-03-03"));
    assert!(approx(other.total_hours, 3.0));

    let this = ProgressLogic::week_progress(&ctx).unwrap();
    assert!(approx(this.total_hours, 1.0));
}

#[test]
fn test_midnight_crossing_counts_on_start_date() {
    let env = TestEnv::new();

    // Sunday night into Monday: belongs to the previous week
    SessionLogic::clock_in(&env.ctx_at("2025-03-09T22:00"), None, None).unwrap();
    SessionLogic::clock_out(&env.ctx_at("2025-03-10T02:00"), None, Some(0), None, None).unwrap();

    let ctx = env.ctx_at("2025-03-10T12:00");

    let this = ProgressLogic::week_progress(&ctx).unwrap();
    assert!(approx(this.total_hours, 0.0));
    assert_eq!(this.days_worked_count, 0);

    let last = ProgressLogic::last_week_progress(&ctx).unwrap();
    assert!(approx(last.total_hours, 4.0));
    assert!(approx(last.hours_on(&d("2025-03-09")), 4.0));

    let today = ProgressLogic::day_progress(&ctx).unwrap();
    assert!(approx(today.total_hours, 0.0));
    assert_eq!(today.sessions.len(), 1);
}

#[test]
fn test_day_progress_surfaces_active_session() {
    let env = TestEnv::new();

    work(&env, "2025-03-10", "08:00", "12:00", 0);
    let open = SessionLogic::clock_in(&env.ctx_at("2025-03-10T13:00"), None, None).unwrap();

    let day = ProgressLogic::day_progress(&env.ctx_at("2025-03-10T16:00")).unwrap();

    assert_eq!(day.date, d("2025-03-10"));
    assert!(approx(day.total_hours, 4.0));
    assert_eq!(day.current_session_id.as_deref(), Some(open.id.as_str()));
    assert_eq!(day.sessions.len(), 2);
}

#[test]
fn test_month_progress_is_partial() {
    let env = TestEnv::new();

    work(&env, "2025-02-28", "09:00", "17:00", 0);
    work(&env, "2025-03-03", "09:00", "17:00", 30);
    work(&env, "2025-03-10", "09:00", "17:30", 30);

    let month = ProgressLogic::month_progress(&env.ctx_at("2025-03-10T18:00")).unwrap();

    assert_eq!(month.month, d("2025-03-01"));
    assert_eq!(month.through, d("2025-03-10"));
    assert!(approx(month.total_hours, 15.5));
    assert!(approx(month.daily_average, 1.55));
    assert_eq!(month.days_worked_count, 2);
    assert_eq!(month.week_count, 2);
    assert!(approx(month.week_hours[&10], 7.5));
    assert!(approx(month.week_hours[&11], 8.0));
}

#[test]
fn test_progress_snapshots_serialize() {
    let env = TestEnv::new();
    work(&env, "2025-03-10", "09:00", "17:00", 30);

    let week = ProgressLogic::week_progress(&env.ctx_at("2025-03-12T10:00")).unwrap();
    let json = serde_json::to_value(&week).unwrap();

    assert_eq!(json["week_start"], "2025-03-10");
    assert_eq!(json["total_hours"], 7.5);
    assert_eq!(json["days_worked"]["2025-03-10"], 7.5);
    assert!(
        json["sessions"][0]["start"]
            .as_str()
            .unwrap()
            .starts_with("2025-03-10T09:00:00+01:00")
    );
}

#[test]
fn test_range_progress_breaks_down_by_day() {
    let env = TestEnv::new();

    work(&env, "2025-03-07", "09:00", "12:00", 0);
    work(&env, "2025-03-10", "09:00", "17:00", 30);
    work(&env, "2025-03-11", "09:00", "17:30", 30);
    work(&env, "2025-03-13", "09:00", "10:00", 0);
    SessionLogic::clock_in(&env.ctx_at("2025-03-12T09:00"), None, None).unwrap();

    let ctx = env.ctx_at("2025-03-12T11:00");
    let range = ProgressLogic::range_progress(&ctx, d("2025-03-08"), d("2025-03-12")).unwrap();

    assert_eq!(range.from, d("2025-03-08"));
    assert_eq!(range.to, d("2025-03-12"));
    assert!(approx(range.total_hours, 15.5));
    assert_eq!(range.days_worked_count, 2);
    assert!(approx(range.days_worked[&d("2025-03-10")], 7.5));
    assert!(approx(range.days_worked[&d("2025-03-11")], 8.0));
    // Mar 7 and Mar 13 are outside, the open session is listed but adds 0
    assert_eq!(range.sessions.len(), 3);
    assert!(range.sessions.iter().any(|s| s.is_active()));
}

#[test]
fn test_range_progress_rejects_reversed_bounds() {
    let env = TestEnv::new();
    let ctx = env.ctx_at("2025-03-12T11:00");

    let err = ProgressLogic::range_progress(&ctx, d("2025-03-12"), d("2025-03-08")).unwrap_err();
    assert!(matches!(err, rworklog::errors::AppError::InvalidDate(_)));
}

#[test]
fn test_named_range_windows() {
    use rworklog::utils::date::named_range;

    let today = d("2025-03-12");

    assert_eq!(
        named_range(today, None, None, None).unwrap(),
        (d("2025-03-05"), today)
    );
    assert_eq!(
        named_range(today, Some("last-week"), None, None).unwrap(),
        (d("2025-03-05"), today)
    );
    assert_eq!(
        named_range(today, Some("last-month"), None, None).unwrap(),
        (d("2025-02-12"), today)
    );
    assert_eq!(
        named_range(today, Some("2025-03-01"), None, None).unwrap(),
        (d("2025-03-01"), d("2025-03-01"))
    );
    assert_eq!(
        named_range(today, None, Some("2025-01-01"), Some("2025-01-31")).unwrap(),
        (d("2025-01-01"), d("2025-01-31"))
    );

    assert!(named_range(today, Some("yesterday"), None, None).is_err());
    assert!(named_range(today, None, Some("2025-13-01"), None).is_err());
    assert!(named_range(today, None, Some("2025-03-20"), None).is_err());
}
