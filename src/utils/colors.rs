/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Remaining-hours color:
/// \>0 → yellow (still to work)
/// \<=0 → green (goal reached or overtime)
pub fn color_for_remaining(value: f64) -> &'static str {
    if value > 0.0 { YELLOW } else { GREEN }
}

/// Grey for days without any tracked hours.
pub fn color_for_hours(value: f64) -> &'static str {
    if value == 0.0 { GREY } else { RESET }
}
