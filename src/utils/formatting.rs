//! Formatting utilities used for CLI and archive outputs.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

/// Render fractional hours as `07h 30m`, optionally signed.
pub fn hours2readable(hours: f64, want_sign: bool) -> String {
    let mins = (hours * 60.0).round() as i64;
    let abs_m = mins.abs();

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 {
        "-"
    } else {
        ""
    };

    format!("{}{:02}h {:02}m", sign, abs_m / 60, abs_m % 60)
}

/// Truncate to at most `max` display columns, ending with "..." when cut.
/// Counts terminal columns, not bytes, so multi-byte notes never split a char.
pub fn truncate_display(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }

    let budget = max.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Escape characters that would break a Markdown table cell.
pub fn md_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}
