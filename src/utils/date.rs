use chrono::{Datelike, Days, Months, NaiveDate};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse `YYYY-MM` into (year, month).
pub fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d").ok()?;
    Some((d.year(), d.month()))
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_monday() as u64)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn next_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))
}

/// Last calendar day of the given month.
pub fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    next_month(first)?.pred_opt()
}

/// Human month title, e.g. "March 2025".
pub fn month_title(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

/// Bounds of a period expression:
/// - `YYYY-MM-DD`
/// - `YYYY-MM`
/// - `YYYY`
pub fn period_bounds(p: &str) -> Result<(NaiveDate, NaiveDate), String> {
    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY-MM
    if let Some((y, m)) = parse_year_month(p) {
        let first = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| format!("Invalid period: {p}"))?;
        let last = last_of_month(y, m).ok_or_else(|| format!("Invalid period: {p}"))?;
        return Ok((first, last));
    }

    // YYYY
    if let Ok(year) = p.trim().parse::<i32>()
        && let (Some(first), Some(last)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        )
    {
        return Ok((first, last));
    }

    Err(format!("Invalid period: {}", p))
}

/// Parse a range such as `2025`, `2025-03`, `2025-03-01:2025-03-15`.
pub fn parse_range(r: &str) -> Result<(NaiveDate, NaiveDate), String> {
    if let Some((start, end)) = r.split_once(':') {
        let (s, _) = period_bounds(start)?;
        let (_, e) = period_bounds(end)?;
        if e < s {
            return Err(format!("Range end precedes start: {}", r));
        }
        return Ok((s, e));
    }
    period_bounds(r)
}

/// Days covered by `range` with no argument (and by `last-week`).
const DEFAULT_WINDOW_DAYS: u64 = 7;

/// Window of the `range` command, relative to `today`:
/// - nothing or `last-week` → the last 7 days through today
/// - `last-month` → one month back through today
/// - `YYYY-MM-DD` → that day only
///
/// `start` / `end` then override either bound.
pub fn named_range(
    today: NaiveDate,
    which: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), String> {
    let week_back = today
        .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
        .unwrap_or(today);

    let (mut from, mut to) = match which.map(str::trim) {
        None => (week_back, today),
        Some(w) if w.eq_ignore_ascii_case("last-week") => (week_back, today),
        Some(w) if w.eq_ignore_ascii_case("last-month") => (
            today.checked_sub_months(Months::new(1)).unwrap_or(today),
            today,
        ),
        Some(w) => {
            let day = parse_date(w).ok_or_else(|| format!("Invalid range: {w}"))?;
            (day, day)
        }
    };

    if let Some(s) = start {
        from = parse_date(s).ok_or_else(|| format!("Invalid start date: {s}"))?;
    }
    if let Some(e) = end {
        to = parse_date(e).ok_or_else(|| format!("Invalid end date: {e}"))?;
    }

    if to < from {
        return Err(format!("Range end {to} precedes start {from}"));
    }
    Ok((from, to))
}
