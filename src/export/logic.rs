// src/export/logic.rs

use crate::context::AppContext;
use crate::db::queries::{get_sessions_started_in_range, oldest_session_date};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::SessionExport;
use crate::ui::messages::warning;
use crate::utils::date::parse_range;
use chrono::{Days, NaiveDate};
use std::path::Path;

/// Default window when no `--range` is given.
const DEFAULT_RANGE_DAYS: u64 = 30;

/// Logica di alto livello per l'export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export delle sessioni iniziate nel periodo.
    ///
    /// - `range`: `None` (ultimi 30 giorni), `"all"` oppure espressioni come:
    ///   - `YYYY`
    ///   - `YYYY-MM`
    ///   - `YYYY-MM-DD`
    ///   - `YYYY-MM-DD:YYYY-MM-DD`
    ///
    /// Returns the number of exported sessions.
    pub fn export(
        ctx: &AppContext,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let (from, to) = Self::bounds(ctx, range)?;

        ensure_writable(path, force)?;

        let sessions = get_sessions_started_in_range(
            &ctx.pool,
            &ctx.clock.day_start(from),
            &ctx.clock.day_end(to),
        )?;

        if sessions.is_empty() {
            warning(format!("No sessions found between {} and {}.", from, to));
            return Ok(0);
        }

        let rows: Vec<SessionExport> = sessions.iter().map(SessionExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }

    fn bounds(ctx: &AppContext, range: Option<&str>) -> AppResult<(NaiveDate, NaiveDate)> {
        let today = ctx.clock.today();

        match range.map(str::trim) {
            None => {
                let from = today
                    .checked_sub_days(Days::new(DEFAULT_RANGE_DAYS))
                    .unwrap_or(today);
                Ok((from, today))
            }
            Some(r) if r.eq_ignore_ascii_case("all") => {
                let from = oldest_session_date(&ctx.pool)?.unwrap_or(today);
                Ok((from, today.max(from)))
            }
            Some(r) => parse_range(r).map_err(AppError::InvalidDate),
        }
    }
}
