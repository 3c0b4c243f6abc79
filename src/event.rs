//! The one wedding this site is about. Dates, venue and couple live here
//! so copy changes never touch handler code.

use chrono::{DateTime, Utc};

pub struct WeddingEvent {
    pub couple_a: &'static str,
    pub couple_b: &'static str,
    /// Short forms used in correspondence.
    pub couple_a_short: &'static str,
    pub couple_b_short: &'static str,
    /// Event start, local Korea time (UTC+9).
    pub date_iso: &'static str,
    /// Approximate end, 4h after the start.
    pub end_date_iso: &'static str,
    pub date_pretty: &'static str,
    pub food_time: &'static str,
    pub venue_name: &'static str,
    pub venue_address: &'static str,
    pub venue_lat: f64,
    pub venue_lng: f64,
    pub timezone: &'static str,
    /// Guests who answered no/maybe are asked to decide by this date.
    pub rsvp_deadline: &'static str,
}

pub const WEDDING_EVENT: WeddingEvent = WeddingEvent {
    couple_a: "JeongHee Hong",
    couple_b: "Christian Axell",
    couple_a_short: "Scarlett",
    couple_b_short: "Chris",
    date_iso: "2026-03-28T12:00:00+09:00",
    end_date_iso: "2026-03-28T16:00:00+09:00",
    date_pretty: "March 28, 2026",
    food_time: "13:30",
    venue_name: "Hanok Hwaje",
    venue_address: "Busan, South Korea",
    venue_lat: 35.36410463760984,
    venue_lng: 128.99068710998083,
    timezone: "Asia/Seoul",
    rsvp_deadline: "28 February",
};

pub fn starts_at() -> DateTime<Utc> {
    parse_utc(WEDDING_EVENT.date_iso)
}

pub fn ends_at() -> DateTime<Utc> {
    parse_utc(WEDDING_EVENT.end_date_iso)
}

fn parse_utc(iso: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(iso)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Whole days until the event, rounded up, floored at zero once the day
/// has passed.
pub fn days_until_event() -> i64 {
    let seconds = (starts_at() - Utc::now()).num_seconds();
    (seconds + 86_399).div_euclid(86_400).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn event_timestamps_parse() {
        assert!(DateTime::parse_from_rfc3339(WEDDING_EVENT.date_iso).is_ok());
        assert!(DateTime::parse_from_rfc3339(WEDDING_EVENT.end_date_iso).is_ok());
        assert!(ends_at() > starts_at());
        // Noon in Seoul is 03:00 UTC.
        assert_eq!(starts_at().hour(), 3);
    }
}
