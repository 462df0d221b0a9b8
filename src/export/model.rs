// src/export/model.rs

use crate::models::Session;
use serde::Serialize;

/// Struttura “piatta” per export delle sessioni.
/// Orari in locale (RFC 3339 con offset), `hours` vuoto se la sessione è aperta.
#[derive(Serialize, Clone, Debug)]
pub struct SessionExport {
    pub id: String,
    pub date: String,
    pub start: String,
    pub end: Option<String>,
    pub break_minutes: i32,
    pub hours: Option<f64>,
    pub note: String,
}

impl From<&Session> for SessionExport {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id.clone(),
            date: s.date.format("%Y-%m-%d").to_string(),
            start: s.start.to_rfc3339(),
            end: s.end.as_ref().map(|e| e.to_rfc3339()),
            break_minutes: s.break_minutes,
            // arrotondato al centesimo, come negli archivi
            hours: s.duration_hours().map(|h| (h * 100.0).round() / 100.0),
            note: s.note_str().to_string(),
        }
    }
}
