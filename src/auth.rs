//! Admin session tokens.
//!
//! A session is a signed HS256 token carried in an HttpOnly cookie. There
//! are no server-side sessions to store or revoke; expiry and the signature
//! are the whole story, and a failed check reads as "not logged in".

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::{Error, Result};

/// Tolerated clock skew between us and whoever minted the token.
const CLOCK_SKEW_LEEWAY_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(config: &AppConfig, sub: &str, role: &str) -> Result<String> {
    let secret = config.session_secret.as_deref().ok_or(Error::Misconfigured)?;
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + config.session_ttl_days * 24 * 60 * 60,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Checks signature and expiry. Any failure, including a missing secret,
/// yields `None` rather than an error.
pub fn verify_token(config: &AppConfig, token: &str) -> Option<Claims> {
    let secret = config.session_secret.as_deref()?;
    let mut validation = Validation::default();
    validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

pub fn session_from_jar(config: &AppConfig, cookies: &CookieJar<'_>) -> Option<Claims> {
    let cookie = cookies.get(&config.session_cookie_name)?;
    verify_token(config, cookie.value())
}

pub fn set_session_cookie(config: &AppConfig, cookies: &CookieJar<'_>, token: String) {
    cookies.add(
        Cookie::build((config.session_cookie_name.clone(), token))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(rocket::time::Duration::days(config.session_ttl_days)),
    );
}

pub fn clear_session_cookie(config: &AppConfig, cookies: &CookieJar<'_>) {
    cookies.remove(Cookie::build(config.session_cookie_name.clone()).path("/"));
}

/// Request guard for admin-only routes. Forwards instead of failing so a
/// lower-ranked route can turn the refusal into a redirect.
pub struct AdminSession(pub Claims);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = match request.rocket().state::<AppConfig>() {
            Some(config) => config,
            None => return Outcome::Forward(Status::InternalServerError),
        };
        match session_from_jar(config, request.cookies()) {
            Some(claims) => Outcome::Success(AdminSession(claims)),
            None => Outcome::Forward(Status::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret() -> AppConfig {
        AppConfig {
            session_secret: Some("unit-test-secret".to_string()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn tokens_round_trip() {
        let config = config_with_secret();
        let token = issue_token(&config, "admin", "admin").expect("token issues");
        let claims = verify_token(&config, &token).expect("token verifies");
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn issuing_without_secret_is_a_misconfiguration() {
        let config = AppConfig::default();
        assert!(matches!(
            issue_token(&config, "admin", "admin"),
            Err(Error::Misconfigured)
        ));
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let config = config_with_secret();
        let token = issue_token(&config, "admin", "admin").expect("token issues");
        let mut forged = token.clone();
        forged.pop();
        forged.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(verify_token(&config, &forged).is_none());
        assert!(verify_token(&config, "not-even-a-token").is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = config_with_secret();
        let token = issue_token(&config, "admin", "admin").expect("token issues");
        let other = AppConfig {
            session_secret: Some("a-different-secret".to_string()),
            ..AppConfig::default()
        };
        assert!(verify_token(&other, &token).is_none());
    }

    #[test]
    fn expired_tokens_are_rejected_past_the_leeway() {
        let mut config = config_with_secret();
        config.session_ttl_days = -1;
        let token = issue_token(&config, "admin", "admin").expect("token issues");
        assert!(verify_token(&config, &token).is_none());
    }

    #[test]
    fn missing_secret_reads_as_logged_out() {
        let config = config_with_secret();
        let token = issue_token(&config, "admin", "admin").expect("token issues");
        let unconfigured = AppConfig::default();
        assert!(verify_token(&unconfigured, &token).is_none());
    }
}
