use super::schema::{invites, rsvps, visitors};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Answer a guest can give on the RSVP form. Stored lowercase in the
/// `status` columns and echoed verbatim to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Yes,
    No,
    Maybe,
}

impl RsvpStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "maybe" => Some(Self::Maybe),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }
}

/// Pre-seeded personal invite. Rows are created by migrations, never at
/// runtime; only `rsvp_status` is ever updated.
#[derive(Debug, Clone, Selectable, Queryable, Serialize)]
#[diesel(table_name = invites)]
pub struct Invite {
    pub id: String,
    pub guest_name: String,
    pub language: String,
    pub rsvp_status: Option<String>,
}

/// One submitted RSVP. The table is append-only; a guest answering twice
/// produces two rows and the newest one wins.
#[derive(Debug, Clone, Selectable, Queryable, Serialize)]
#[diesel(table_name = rsvps)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub plus_one: bool,
    pub dietary_restrictions: Option<String>,
    pub invite_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = rsvps)]
pub struct NewRsvp {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub plus_one: bool,
    pub dietary_restrictions: Option<String>,
    pub invite_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Page-view telemetry reported by the client beacon. Every field except
/// the id and timestamp is optional; we record whatever the client knew.
#[derive(Debug, Clone, Selectable, Queryable, Serialize)]
#[diesel(table_name = visitors)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_region: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub language: Option<String>,
    pub page: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = visitors)]
pub struct NewVisitor {
    pub id: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_region: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub language: Option<String>,
    pub page: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::RsvpStatus;

    #[test]
    fn status_parses_only_known_answers() {
        assert_eq!(RsvpStatus::parse("yes"), Some(RsvpStatus::Yes));
        assert_eq!(RsvpStatus::parse("no"), Some(RsvpStatus::No));
        assert_eq!(RsvpStatus::parse("maybe"), Some(RsvpStatus::Maybe));
        assert_eq!(RsvpStatus::parse("YES"), None);
        assert_eq!(RsvpStatus::parse("attending"), None);
        assert_eq!(RsvpStatus::parse(""), None);
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in [RsvpStatus::Yes, RsvpStatus::No, RsvpStatus::Maybe] {
            assert_eq!(RsvpStatus::parse(status.as_str()), Some(status));
        }
    }
}
