use serde::Deserialize;

/// Application settings pulled from Rocket's figment, so every field can be
/// set in `Rocket.toml` or through `ROCKET_*` environment variables
/// (e.g. `ROCKET_ADMIN_PASSWORD`, `ROCKET_SESSION_SECRET`).
///
/// The credentials are deliberately `Option`: the site must boot without
/// them so the guest-facing pages keep working, and the admin login reports
/// a misconfiguration instead of panicking.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shared password for the admin dashboard. Unset means login is
    /// disabled and `/api/login` answers 500.
    pub admin_password: Option<String>,
    /// HMAC secret for signing session tokens. Unset disables sessions.
    pub session_secret: Option<String>,
    /// Name of the session cookie.
    pub session_cookie_name: String,
    /// Session lifetime, used both for the token `exp` claim and the
    /// cookie max-age.
    pub session_ttl_days: i64,
    /// SMTP relay host for RSVP confirmation emails. Unset means emails
    /// are skipped with a log line.
    pub smtp_relay: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// From mailbox for outgoing mail, `Display Name <addr@host>`.
    pub email_from: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_password: None,
            session_secret: None,
            session_cookie_name: "session".to_string(),
            session_ttl_days: 7,
            smtp_relay: None,
            smtp_username: None,
            smtp_password: None,
            email_from: "Chris & Scarlett <rsvp@hong.axell.no>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use rocket::figment::Figment;

    #[test]
    fn defaults_leave_credentials_unset() {
        let config = AppConfig::default();
        assert!(config.admin_password.is_none());
        assert!(config.session_secret.is_none());
        assert!(config.smtp_relay.is_none());
        assert_eq!(config.session_cookie_name, "session");
        assert_eq!(config.session_ttl_days, 7);
    }

    #[test]
    fn figment_overrides_fill_in_missing_fields() {
        let figment = Figment::new()
            .merge(("admin_password", "swordfish"))
            .merge(("session_ttl_days", 2));
        let config: AppConfig = figment.extract().expect("config extracts");
        assert_eq!(config.admin_password.as_deref(), Some("swordfish"));
        assert_eq!(config.session_ttl_days, 2);
        assert!(config.session_secret.is_none());
        assert_eq!(config.session_cookie_name, "session");
    }
}
