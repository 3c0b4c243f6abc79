//! Minimal RFC 5545 calendar generation for the "add to calendar" link.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

const DEFAULT_PRODUCT_ID: &str = "-//Wedding Website//ICS Export//EN";

pub struct CalendarEvent {
    pub uid: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub product_id: Option<String>,
}

/// Renders a single-event VCALENDAR. Lines are CRLF-joined without a
/// trailing newline, matching what calendar apps accept for downloads.
pub fn build_ics(event: &CalendarEvent) -> String {
    let uid = event
        .uid
        .clone()
        .unwrap_or_else(|| random_uid(&event.start));
    let product_id = event.product_id.as_deref().unwrap_or(DEFAULT_PRODUCT_ID);

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{product_id}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{uid}"),
        format!("DTSTAMP:{}", format_utc(&Utc::now())),
        format!("DTSTART:{}", format_utc(&event.start)),
        format!("DTEND:{}", format_utc(&event.end)),
        format!("SUMMARY:{}", escape_text(&event.title)),
    ];

    if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
    }
    if let Some(location) = event.location.as_deref() {
        let full = match (event.latitude, event.longitude) {
            (Some(lat), Some(lng)) => format!("{location} ({lat}, {lng})"),
            _ => location.to_string(),
        };
        lines.push(format!("LOCATION:{}", escape_text(&full)));
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

/// `YYYYMMDDTHHMMSSZ`, always UTC.
fn format_utc(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes backslash, newline, comma and semicolon per RFC 5545, in that
/// order so escapes are not themselves re-escaped.
fn escape_text(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

fn random_uid(start: &DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(11)
        .map(char::from)
        .collect();
    format!("{}-{}@event.local", format_utc(start), suffix.to_lowercase())
}
