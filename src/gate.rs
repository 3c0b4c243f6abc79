//! Request gate: path classification and first-visit locale bootstrap.
//!
//! The admin redirect itself is handled by low-ranked fallback routes (see
//! `pages` and `api`); this module owns the shared notion of which paths
//! are public and stamps a `locale` cookie onto first-time guest page hits.

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::{Data, Request};

use crate::geo::COUNTRY_HEADER;
use crate::locale;

pub const LOCALE_COOKIE: &str = "locale";
const LOCALE_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Paths that never require a session, checked before the admin rule.
const PUBLIC_PATHS: &[&str] = &[
    "/",
    "/wedding",
    "/invite",
    "/login",
    "/api/login",
    "/api/logout",
    "/api/session",
    "/static",
    "/favicon.ico",
];

/// Guest-facing pages that get the locale cookie on first visit.
const GUEST_PAGES: &[&str] = &["/", "/invite", "/wedding"];

fn matches_prefix(path: &str, roots: &[&str]) -> bool {
    roots
        .iter()
        .any(|root| path == *root || path.starts_with(&format!("{root}/")))
}

pub fn is_public_path(path: &str) -> bool {
    matches_prefix(path, PUBLIC_PATHS)
}

pub fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/") || path.starts_with("/api/admin")
}

/// The gate rule in one place: only admin paths that are not explicitly
/// public need a session. Everything else passes through.
pub fn requires_session(path: &str) -> bool {
    !is_public_path(path) && is_admin_path(path)
}

pub fn is_guest_page(path: &str) -> bool {
    matches_prefix(path, GUEST_PAGES)
}

/// Reads the effective locale for a request, preferring a cookie staged
/// earlier in this same request cycle. Unknown values fall back to the
/// default so templates always get a supported tag.
pub fn current_locale(cookies: &CookieJar<'_>) -> String {
    cookies
        .get_pending(LOCALE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| locale::is_supported(value))
        .unwrap_or_else(|| locale::DEFAULT_LOCALE.to_string())
}

/// Fairing that resolves and pins a visitor's locale the first time they
/// hit a guest page. Requests that already carry a `locale` cookie pass
/// through untouched, so an explicit choice from the language switcher
/// always wins over geolocation.
pub struct LocaleBootstrap;

#[rocket::async_trait]
impl Fairing for LocaleBootstrap {
    fn info(&self) -> Info {
        Info {
            name: "Guest locale bootstrap",
            kind: Kind::Request,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _data: &mut Data<'_>) {
        if !is_guest_page(request.uri().path().as_str()) {
            return;
        }
        if request.cookies().get(LOCALE_COOKIE).is_some() {
            return;
        }
        let country = request.headers().get_one(COUNTRY_HEADER);
        let accept_language = request.headers().get_one("accept-language");
        let resolved = locale::resolve_locale(country, accept_language);
        request.cookies().add(
            Cookie::build((LOCALE_COOKIE, resolved))
                .path("/")
                .same_site(SameSite::Lax)
                .max_age(rocket::time::Duration::days(LOCALE_COOKIE_MAX_AGE_DAYS)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths_cover_roots_and_children() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/wedding"));
        assert!(is_public_path("/invite/3663d23a-771b-44c8-b41a-a6ebea727427"));
        assert!(is_public_path("/static/style.css"));
        assert!(!is_public_path("/admin"));
        assert!(!is_public_path("/api/admin/rsvps"));
        // "/" only matches itself, not every path.
        assert!(!is_public_path("/anything-else"));
    }

    #[test]
    fn admin_paths_cover_page_and_api() {
        assert!(is_admin_path("/admin"));
        assert!(is_admin_path("/admin/visitors"));
        assert!(is_admin_path("/api/admin/rsvps"));
        assert!(!is_admin_path("/administrator"));
        assert!(!is_admin_path("/wedding"));
    }

    #[test]
    fn only_non_public_admin_paths_need_a_session() {
        assert!(requires_session("/admin"));
        assert!(requires_session("/admin/anything"));
        assert!(requires_session("/api/admin/rsvps"));
        assert!(!requires_session("/wedding"));
        assert!(!requires_session("/api/rsvp/check-email"));
        assert!(!requires_session("/api/geo"));
    }

    #[test]
    fn guest_pages_are_the_three_public_faces() {
        assert!(is_guest_page("/"));
        assert!(is_guest_page("/invite"));
        assert!(is_guest_page("/invite/abc"));
        assert!(is_guest_page("/wedding"));
        assert!(!is_guest_page("/login"));
        assert!(!is_guest_page("/api/geo"));
    }
}
