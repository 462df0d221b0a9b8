use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

/// Larghezza massima della colonna operazione+target
const OP_WIDTH: usize = 60;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// Restituisce il colore ANSI in base all'operazione
fn color_for_operation(op: &str) -> Colour {
    match op {
        "clockin" => Colour::Green,
        "clockout" => Colour::Cyan,
        "delete" => Colour::Red,
        "edit" => Colour::Yellow,
        "archive" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51), // arancione
        _ => Colour::White,
    }
}

/// Short form of a session id in the target column.
fn short_target(target: &str) -> &str {
    if target.len() == 36 && target.chars().filter(|c| *c == '-').count() == 4 {
        &target[..8]
    } else {
        target
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]")
            .map_err(|e| crate::errors::AppError::Other(e.to_string()))?;

        let entries: Vec<(i64, String, String, String, String)> = load_log(&pool.conn)?
            .into_iter()
            .map(|(id, raw_date, operation, target, message)| {
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(raw_date);

                // Unica colonna op+target
                let op_target = if target.is_empty() {
                    operation.clone()
                } else {
                    format!("{operation} ({})", short_target(&target))
                };

                (id, date, operation, op_target, message)
            })
            .collect();

        if entries.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|(_, _, _, op_target, _)| UnicodeWidthStr::width(op_target.as_str()))
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH);
        let id_w = entries
            .iter()
            .map(|(id, _, _, _, _)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, _, _, _)| date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, op_target, message) in entries {
            let color = color_for_operation(&operation);

            // --- TRUNCATE a OP_WIDTH caratteri ---
            let visible = if op_target.chars().count() > OP_WIDTH {
                let mut s = op_target.chars().take(OP_WIDTH - 3).collect::<String>();
                s.push_str("...");
                s
            } else {
                op_target
            };

            // solo la prima parola (l'operazione) è colorata
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            // padding calcolato SENZA ANSI
            let plain = strip_ansi(&ansi, &colored);
            let padding = " ".repeat(op_w.saturating_sub(UnicodeWidthStr::width(plain.as_str())));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                colored,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
