//! RSVP submission: validation, persistence and the follow-up side
//! effects (invite status, history count, identity cookies, email).
//!
//! The table is append-only. Submitting twice is allowed and creates two
//! rows; duplicate detection elsewhere is advisory and never blocks a
//! guest from answering again.

use chrono::Utc;
use log::{error, warn};
use rocket::http::CookieJar;
use rocket_db_pools::diesel::prelude::*;
use rocket_db_pools::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::email;
use crate::guest::{self, GuestIdentity};
use crate::models::{NewRsvp, RsvpStatus};
use crate::Db;

pub const MAX_DIETARY_CHARS: usize = 500;

#[derive(Debug, Default, FromForm)]
pub struct RsvpForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    #[field(name = "dietaryRestrictions")]
    pub dietary_restrictions: Option<String>,
    #[field(name = "numberOfPeople")]
    pub number_of_people: Option<String>,
    #[field(name = "inviteId")]
    pub invite_id: Option<String>,
}

/// A submission that passed validation, trimmed and normalized.
#[derive(Debug, PartialEq)]
pub struct ValidRsvp {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: RsvpStatus,
    pub plus_one: bool,
    pub dietary_restrictions: Option<String>,
    /// Raw invite reference; only associated once it matches a known row.
    pub invite_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SubmitOutcome {
    #[serde(rename_all = "camelCase")]
    Accepted {
        ok: bool,
        history_count: i64,
        latest_id: String,
    },
    Rejected {
        ok: bool,
        error: String,
    },
}

impl SubmitOutcome {
    fn accepted(history_count: i64, latest_id: String) -> Self {
        SubmitOutcome::Accepted {
            ok: true,
            history_count,
            latest_id,
        }
    }

    fn rejected(error: impl Into<String>) -> Self {
        SubmitOutcome::Rejected {
            ok: false,
            error: error.into(),
        }
    }
}

/// Checks the form in a fixed order and reports the first problem as a
/// user-displayable message. Pure; all I/O happens after this passes.
pub fn validate(form: &RsvpForm) -> Result<ValidRsvp, &'static str> {
    let name = form.name.as_deref().unwrap_or("").trim();
    if name.is_empty() {
        return Err("Missing name");
    }

    let email = non_empty(form.email.as_deref());
    let phone = non_empty(form.phone.as_deref());
    if email.is_none() && phone.is_none() {
        return Err("Please provide an email or phone number");
    }

    let status = form
        .status
        .as_deref()
        .map(str::trim)
        .and_then(RsvpStatus::parse)
        .ok_or("Invalid status")?;

    let dietary_restrictions = non_empty(form.dietary_restrictions.as_deref());
    if let Some(text) = &dietary_restrictions {
        if text.chars().count() > MAX_DIETARY_CHARS {
            return Err("Dietary restrictions must be 500 characters or fewer");
        }
    }

    let plus_one = party_size(form.number_of_people.as_deref()) > 1.0;

    Ok(ValidRsvp {
        name: name.to_string(),
        email,
        phone,
        status,
        plus_one,
        dietary_restrictions,
        invite_id: non_empty(form.invite_id.as_deref()),
    })
}

/// Party size as submitted. Anything unparseable, non-finite or below one
/// counts as a single guest; this never rejects a form.
pub fn party_size(raw: Option<&str>) -> f64 {
    let parsed = raw
        .unwrap_or("")
        .trim()
        .parse::<f64>()
        .unwrap_or(f64::NAN);
    if parsed.is_finite() && parsed >= 1.0 {
        parsed
    } else {
        1.0
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Runs one submission end to end. The insert is the only step that can
/// fail the request; the invite update, the history count, the cookies and
/// the email are each best-effort on their own.
pub async fn submit(
    mut db: Connection<Db>,
    config: &AppConfig,
    cookies: &CookieJar<'_>,
    form: RsvpForm,
) -> SubmitOutcome {
    let valid = match validate(&form) {
        Ok(valid) => valid,
        Err(message) => return SubmitOutcome::rejected(message),
    };

    let invite_id = match valid.invite_id.as_deref() {
        Some(raw) => {
            let canonical = Uuid::parse_str(raw.trim()).ok().map(|id| id.to_string());
            if canonical.is_none() {
                warn!("ignoring malformed invite id on RSVP from {}", valid.name);
            }
            match canonical {
                Some(id) => known_invite(&mut db, &id).await,
                None => None,
            }
        }
        None => None,
    };

    let record = NewRsvp {
        id: Uuid::new_v4().to_string(),
        name: valid.name.clone(),
        email: valid.email.clone(),
        phone: valid.phone.clone(),
        status: valid.status.as_str().to_string(),
        plus_one: valid.plus_one,
        dietary_restrictions: valid.dietary_restrictions.clone(),
        invite_id: invite_id.clone(),
        created_at: Utc::now().naive_utc(),
    };

    {
        use crate::schema::rsvps::dsl::*;
        if let Err(err) = diesel::insert_into(rsvps)
            .values(&record)
            .execute(&mut db)
            .await
        {
            error!("failed to persist RSVP from {}: {err}", record.name);
            return SubmitOutcome::rejected("Server error");
        }
    }

    if let Some(ref invite) = invite_id {
        mark_invite_responded(&mut db, invite, valid.status).await;
    }

    let history_count = history_count(&mut db, &record.name).await;

    guest::remember(
        cookies,
        &GuestIdentity {
            name: Some(record.name.clone()),
            email: record.email.clone(),
            phone: record.phone.clone(),
            last_status: Some(record.status.clone()),
            rsvp_seen: false,
        },
    );

    if let Some(address) = valid.email {
        email::dispatch_confirmation(config, address, valid.name, valid.status);
    }

    SubmitOutcome::accepted(history_count, record.id)
}

/// Confirms the referenced invite exists before we associate it.
async fn known_invite(db: &mut Connection<Db>, candidate: &str) -> Option<String> {
    use crate::schema::invites::dsl::*;
    match diesel::select(diesel::dsl::exists(invites.filter(id.eq(candidate))))
        .get_result::<bool>(db)
        .await
    {
        Ok(true) => Some(candidate.to_string()),
        Ok(false) => {
            warn!("RSVP referenced unknown invite {candidate}");
            None
        }
        Err(err) => {
            warn!("invite lookup for {candidate} failed: {err}");
            None
        }
    }
}

async fn mark_invite_responded(db: &mut Connection<Db>, invite: &str, answer: RsvpStatus) {
    use crate::schema::invites::dsl::*;
    let result = diesel::update(invites.find(invite))
        .set(rsvp_status.eq(Some(answer.as_str().to_string())))
        .execute(db)
        .await;
    if let Err(err) = result {
        warn!("could not update invite {invite} to {}: {err}", answer.as_str());
    }
}

/// Counts rows sharing the submitted name, the new row included. Failure
/// is reported as 1 so the guest still sees their own submission.
async fn history_count(db: &mut Connection<Db>, submitted_name: &str) -> i64 {
    use crate::schema::rsvps::dsl::*;
    match rsvps
        .filter(name.eq(submitted_name))
        .count()
        .get_result::<i64>(db)
        .await
    {
        Ok(count) => count,
        Err(err) => {
            warn!("history count for {submitted_name} failed: {err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> RsvpForm {
        let mut form = RsvpForm::default();
        for (key, value) in fields {
            let value = Some(value.to_string());
            match *key {
                "name" => form.name = value,
                "email" => form.email = value,
                "phone" => form.phone = value,
                "status" => form.status = value,
                "dietaryRestrictions" => form.dietary_restrictions = value,
                "numberOfPeople" => form.number_of_people = value,
                "inviteId" => form.invite_id = value,
                other => panic!("unknown field {other}"),
            }
        }
        form
    }

    #[test]
    fn name_is_checked_first() {
        let err = validate(&form(&[("email", "a@b.se")])).unwrap_err();
        assert_eq!(err, "Missing name");
        let err = validate(&form(&[("name", "   "), ("email", "a@b.se")])).unwrap_err();
        assert_eq!(err, "Missing name");
    }

    #[test]
    fn some_contact_detail_is_required() {
        let err = validate(&form(&[("name", "Maria"), ("status", "yes")])).unwrap_err();
        assert_eq!(err, "Please provide an email or phone number");
        let err =
            validate(&form(&[("name", "Maria"), ("email", "  "), ("phone", "")])).unwrap_err();
        assert_eq!(err, "Please provide an email or phone number");
    }

    #[test]
    fn status_must_be_a_known_answer() {
        let err = validate(&form(&[("name", "Maria"), ("phone", "0701234567")])).unwrap_err();
        assert_eq!(err, "Invalid status");
        let err = validate(&form(&[
            ("name", "Maria"),
            ("phone", "0701234567"),
            ("status", "attending"),
        ]))
        .unwrap_err();
        assert_eq!(err, "Invalid status");
    }

    #[test]
    fn dietary_text_is_capped_at_500_chars() {
        let long = "x".repeat(501);
        let err = validate(&form(&[
            ("name", "Maria"),
            ("email", "a@b.se"),
            ("status", "yes"),
            ("dietaryRestrictions", &long),
        ]))
        .unwrap_err();
        assert_eq!(err, "Dietary restrictions must be 500 characters or fewer");

        let exactly = "x".repeat(500);
        let valid = validate(&form(&[
            ("name", "Maria"),
            ("email", "a@b.se"),
            ("status", "yes"),
            ("dietaryRestrictions", &exactly),
        ]))
        .expect("500 chars is allowed");
        assert_eq!(valid.dietary_restrictions, Some(exactly));
    }

    #[test]
    fn party_size_coercion_grid() {
        assert_eq!(party_size(None), 1.0);
        assert_eq!(party_size(Some("")), 1.0);
        assert_eq!(party_size(Some("abc")), 1.0);
        assert_eq!(party_size(Some("0")), 1.0);
        assert_eq!(party_size(Some("-3")), 1.0);
        assert_eq!(party_size(Some("NaN")), 1.0);
        assert_eq!(party_size(Some("1")), 1.0);
        assert_eq!(party_size(Some("1.5")), 1.5);
        assert_eq!(party_size(Some("2")), 2.0);
        assert_eq!(party_size(Some("3")), 3.0);
        assert_eq!(party_size(Some("2.9")), 2.9);
        assert_eq!(party_size(Some(" 4 ")), 4.0);
    }

    #[test]
    fn plus_one_follows_party_size() {
        let alone = validate(&form(&[
            ("name", "Maria"),
            ("email", "a@b.se"),
            ("status", "yes"),
            ("numberOfPeople", "1"),
        ]))
        .expect("valid");
        assert!(!alone.plus_one);

        let couple = validate(&form(&[
            ("name", "Maria"),
            ("email", "a@b.se"),
            ("status", "yes"),
            ("numberOfPeople", "3"),
        ]))
        .expect("valid");
        assert!(couple.plus_one);

        let fractional = validate(&form(&[
            ("name", "Maria"),
            ("email", "a@b.se"),
            ("status", "yes"),
            ("numberOfPeople", "1.5"),
        ]))
        .expect("valid");
        assert!(fractional.plus_one);

        let garbage = validate(&form(&[
            ("name", "Maria"),
            ("email", "a@b.se"),
            ("status", "yes"),
            ("numberOfPeople", "-3"),
        ]))
        .expect("valid");
        assert!(!garbage.plus_one);
    }

    #[test]
    fn fields_are_trimmed_and_blank_optionals_dropped() {
        let valid = validate(&form(&[
            ("name", "  Maria Svensson "),
            ("email", " maria@example.se "),
            ("status", " yes "),
            ("dietaryRestrictions", "   "),
            ("inviteId", ""),
        ]))
        .expect("valid");
        assert_eq!(valid.name, "Maria Svensson");
        assert_eq!(valid.email.as_deref(), Some("maria@example.se"));
        assert_eq!(valid.phone, None);
        assert_eq!(valid.status, RsvpStatus::Yes);
        assert_eq!(valid.dietary_restrictions, None);
        assert_eq!(valid.invite_id, None);
    }

    #[test]
    fn rejection_serializes_with_error_message() {
        let outcome = SubmitOutcome::rejected("Missing name");
        let json = serde_json::to_string(&outcome).expect("serializes");
        assert_eq!(json, r#"{"ok":false,"error":"Missing name"}"#);
    }

    #[test]
    fn acceptance_serializes_with_history_and_id() {
        let outcome = SubmitOutcome::accepted(2, "abc-123".to_string());
        let json = serde_json::to_string(&outcome).expect("serializes");
        assert_eq!(json, r#"{"ok":true,"historyCount":2,"latestId":"abc-123"}"#);
    }
}
