//! Server-rendered pages.

use rocket::http::{ContentType, CookieJar, Status};
use rocket::response::Redirect;
use rocket_db_pools::diesel::prelude::*;
use rocket_db_pools::Connection;
use rocket_dyn_templates::{context, Template};
use std::path::PathBuf;
use uuid::Uuid;

use crate::auth::AdminSession;
use crate::errors::Error;
use crate::event::{self, WEDDING_EVENT};
use crate::gate;
use crate::guest;
use crate::ics::{self, CalendarEvent};
use crate::locale;
use crate::models::{Invite, Rsvp, Visitor};
use crate::Db;

#[get("/")]
pub fn home() -> Redirect {
    Redirect::to(uri!(invite))
}

/// The guest invite. Everything personal comes from cookies; first-time
/// visitors get an empty form and an auto-opening RSVP dialog.
#[get("/invite")]
pub fn invite(cookies: &CookieJar<'_>) -> Template {
    let identity = guest::read(cookies);
    Template::render("invite", invite_context(
        gate::current_locale(cookies),
        identity.name,
        identity.email,
        identity.phone,
        identity.last_status,
        identity.rsvp_seen,
        None,
    ))
}

/// Personalized invite for a pre-seeded guest. The invite's own language
/// wins over any locale cookie.
#[get("/invite/<invite_id>")]
pub async fn invite_by_id(
    mut db: Connection<Db>,
    cookies: &CookieJar<'_>,
    invite_id: &str,
) -> Result<Option<Template>, Error> {
    let Ok(parsed) = Uuid::parse_str(invite_id) else {
        return Ok(None);
    };
    let canonical = parsed.to_string();

    let found = {
        use crate::schema::invites::dsl;
        dsl::invites
            .filter(dsl::id.eq(&canonical))
            .select(Invite::as_select())
            .first::<Invite>(&mut db)
            .await
            .optional()?
    };
    let Some(invite) = found else {
        return Ok(None);
    };

    let identity = guest::read(cookies);
    Ok(Some(Template::render("invite", invite_context(
        normalize_language(&invite.language),
        Some(invite.guest_name),
        identity.email,
        identity.phone,
        invite.rsvp_status.or(identity.last_status),
        identity.rsvp_seen,
        Some(invite.id),
    ))))
}

/// Invite tags from the seed data may be bare variants like `no`; run
/// them through the resolver's alias table before handing them to a page.
fn normalize_language(tag: &str) -> String {
    if locale::is_supported(tag) {
        return tag.to_string();
    }
    locale::language_from_header(tag)
        .unwrap_or(locale::DEFAULT_LOCALE)
        .to_string()
}

#[allow(clippy::too_many_arguments)]
fn invite_context(
    locale: String,
    guest_name: Option<String>,
    guest_email: Option<String>,
    guest_phone: Option<String>,
    last_status: Option<String>,
    rsvp_seen: bool,
    invite_id: Option<String>,
) -> impl serde::Serialize {
    context! {
        locale,
        guest_name,
        guest_email,
        guest_phone,
        last_status,
        rsvp_seen,
        invite_id,
        couple_a: WEDDING_EVENT.couple_a,
        couple_b: WEDDING_EVENT.couple_b,
        date_iso: WEDDING_EVENT.date_iso,
        date_pretty: WEDDING_EVENT.date_pretty,
        food_time: WEDDING_EVENT.food_time,
        venue_name: WEDDING_EVENT.venue_name,
        venue_address: WEDDING_EVENT.venue_address,
        venue_lat: WEDDING_EVENT.venue_lat,
        venue_lng: WEDDING_EVENT.venue_lng,
        timezone: WEDDING_EVENT.timezone,
        rsvp_deadline: WEDDING_EVENT.rsvp_deadline,
        days_left: event::days_until_event(),
    }
}

/// Downloadable calendar entry for the ceremony.
#[get("/invite/calendar.ics")]
pub fn calendar() -> (ContentType, String) {
    let event = CalendarEvent {
        uid: None,
        title: format!(
            "{} & {} Wedding",
            WEDDING_EVENT.couple_a, WEDDING_EVENT.couple_b
        ),
        description: Some(format!(
            "Join {} & {} at {}. Food is served at {}.",
            WEDDING_EVENT.couple_a,
            WEDDING_EVENT.couple_b,
            WEDDING_EVENT.venue_name,
            WEDDING_EVENT.food_time
        )),
        start: event::starts_at(),
        end: event::ends_at(),
        location: Some(WEDDING_EVENT.venue_name.to_string()),
        latitude: Some(WEDDING_EVENT.venue_lat),
        longitude: Some(WEDDING_EVENT.venue_lng),
        product_id: None,
    };
    (ContentType::Calendar, ics::build_ics(&event))
}

/// Public wedding page, also the landing spot for gated admin requests.
/// `from` survives into the login link so a successful login can return.
#[get("/wedding?<from>")]
pub fn wedding(cookies: &CookieJar<'_>, from: Option<String>) -> Template {
    Template::render(
        "wedding",
        context! {
            locale: gate::current_locale(cookies),
            from,
            couple_a: WEDDING_EVENT.couple_a,
            couple_b: WEDDING_EVENT.couple_b,
            date_pretty: WEDDING_EVENT.date_pretty,
            venue_name: WEDDING_EVENT.venue_name,
            venue_address: WEDDING_EVENT.venue_address,
            days_left: event::days_until_event(),
        },
    )
}

#[get("/login?<from>&<err>")]
pub fn login_page(from: Option<String>, err: Option<u8>) -> Template {
    Template::render(
        "login",
        context! {
            from,
            error: err.is_some(),
        },
    )
}

/// Admin dashboard: all RSVPs with a tally, plus recent visitor telemetry.
#[get("/admin")]
pub async fn admin_dashboard(
    session: AdminSession,
    mut db: Connection<Db>,
) -> Result<Template, Error> {
    let responses = {
        use crate::schema::rsvps::dsl;
        dsl::rsvps
            .order(dsl::created_at.desc())
            .select(Rsvp::as_select())
            .load::<Rsvp>(&mut db)
            .await?
    };
    let yes_count = responses.iter().filter(|r| r.status == "yes").count();
    let no_count = responses.iter().filter(|r| r.status == "no").count();
    let maybe_count = responses.iter().filter(|r| r.status == "maybe").count();
    let plus_one_count = responses.iter().filter(|r| r.plus_one).count();

    let recent_visitors = {
        use crate::schema::visitors::dsl;
        dsl::visitors
            .order(dsl::created_at.desc())
            .limit(50)
            .select(Visitor::as_select())
            .load::<Visitor>(&mut db)
            .await?
    };
    let visitor_total = {
        use crate::schema::visitors::dsl;
        dsl::visitors.count().get_result::<i64>(&mut db).await?
    };

    Ok(Template::render(
        "admin",
        context! {
            subject: session.0.sub,
            responses,
            yes_count,
            no_count,
            maybe_count,
            plus_one_count,
            recent_visitors,
            visitor_total,
        },
    ))
}

/// Gate fallback: anything under `/admin` without a session goes to the
/// wedding page with the original path in `from`. Applies to every
/// method, so each verb gets a route delegating here.
fn gate_admin(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    if session.is_some() {
        return Err(Status::NotFound);
    }
    let suffix = path.to_string_lossy().into_owned();
    let from = if suffix.is_empty() {
        "/admin".to_string()
    } else {
        format!("/admin/{suffix}")
    };
    Ok(Redirect::to(uri!(wedding(from = Some(from)))))
}

#[get("/admin/<path..>", rank = 2)]
pub fn admin_redirect(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}

#[post("/admin/<path..>", rank = 2)]
pub fn admin_redirect_post(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}

#[put("/admin/<path..>", rank = 2)]
pub fn admin_redirect_put(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}

#[delete("/admin/<path..>", rank = 2)]
pub fn admin_redirect_delete(session: Option<AdminSession>, path: PathBuf) -> Result<Redirect, Status> {
    gate_admin(session, path)
}
