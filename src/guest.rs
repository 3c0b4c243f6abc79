//! Guest identity cookies.
//!
//! A guest has no account; what we know about them lives in a handful of
//! client-visible cookies written after a successful RSVP. Values are
//! percent-encoded so names survive spaces and non-ASCII, matching what
//! the in-page script writes with `encodeURIComponent`.

use rocket::http::{Cookie, CookieJar, RawStr, SameSite};

pub const GUEST_NAME_COOKIE: &str = "guest_name";
pub const GUEST_EMAIL_COOKIE: &str = "guest_email";
pub const GUEST_PHONE_COOKIE: &str = "guest_phone";
pub const RSVP_STATUS_COOKIE: &str = "rsvp_status";
/// Written by the page script once the guest has been through the dialog;
/// the server only reads it.
pub const RSVP_SEEN_COOKIE: &str = "rsvp_seen";

const MAX_AGE_DAYS: i64 = 365;

#[derive(Debug, Default, Clone)]
pub struct GuestIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub last_status: Option<String>,
    pub rsvp_seen: bool,
}

pub fn read(cookies: &CookieJar<'_>) -> GuestIdentity {
    GuestIdentity {
        name: decoded(cookies, GUEST_NAME_COOKIE),
        email: decoded(cookies, GUEST_EMAIL_COOKIE),
        phone: decoded(cookies, GUEST_PHONE_COOKIE),
        last_status: decoded(cookies, RSVP_STATUS_COOKIE),
        rsvp_seen: cookies
            .get(RSVP_SEEN_COOKIE)
            .map(|cookie| cookie.value() == "true")
            .unwrap_or(false),
    }
}

/// Persists whatever the identity knows; `None` fields leave any existing
/// cookie untouched. `rsvp_seen` stays client-owned.
pub fn remember(cookies: &CookieJar<'_>, identity: &GuestIdentity) {
    write(cookies, GUEST_NAME_COOKIE, identity.name.as_deref());
    write(cookies, GUEST_EMAIL_COOKIE, identity.email.as_deref());
    write(cookies, GUEST_PHONE_COOKIE, identity.phone.as_deref());
    write(cookies, RSVP_STATUS_COOKIE, identity.last_status.as_deref());
}

fn decoded(cookies: &CookieJar<'_>, name: &str) -> Option<String> {
    cookies
        .get(name)
        .map(|cookie| RawStr::new(cookie.value()).percent_decode_lossy().into_owned())
        .filter(|value| !value.is_empty())
}

fn write(cookies: &CookieJar<'_>, name: &'static str, value: Option<&str>) {
    let Some(value) = value else { return };
    let encoded = RawStr::new(value).percent_encode().to_string();
    cookies.add(
        Cookie::build((name, encoded))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(rocket::time::Duration::days(MAX_AGE_DAYS)),
    );
}
