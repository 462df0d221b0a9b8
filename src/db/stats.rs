use crate::db::pool::DbPool;
use crate::db::queries::{count_sessions, get_active_session, oldest_session_date};
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time::format_hhmm;
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTAL SESSIONS
    //
    let count = count_sessions(pool)?;
    println!(
        "{}• Total sessions:{} {}{}{}",
        CYAN, RESET, GREEN, count, RESET
    );

    //
    // 3) ACTIVE SESSION
    //
    match get_active_session(pool)? {
        Some(s) => println!(
            "{}• Active session:{} {} (since {} {})",
            CYAN,
            RESET,
            s.short_id(),
            s.date,
            format_hhmm(&s.start)
        ),
        None => println!("{}• Active session:{} {GREY}--{RESET}", CYAN, RESET),
    }

    //
    // 4) DATE RANGE
    //
    let first_date = oldest_session_date(pool)?;
    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM work_sessions ORDER BY start_time DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last_date = last_date.and_then(|d| crate::utils::date::parse_date(&d));

    let fmt_first = first_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = last_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 5) AVERAGE SESSIONS/DAY
    //
    if let (Some(d1), Some(d2)) = (first_date, last_date) {
        let days = (d2 - d1).num_days().max(1);
        let avg = count as f64 / days as f64;
        println!("{}• Average sessions/day:{} {:.2}", CYAN, RESET, avg);
    }

    println!();
    Ok(())
}
