//! RSVP confirmation email, fire-and-forget.
//!
//! SMTP is synchronous in lettre's default transport, so the actual send
//! runs on a blocking task. Nothing here can fail a submission: every
//! error ends up in the log and nowhere else.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::{error, info, warn};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::event::WEDDING_EVENT;
use crate::models::RsvpStatus;

pub fn confirmation_subject(status: RsvpStatus) -> String {
    match status {
        RsvpStatus::Yes => "Thank you! We can't wait to celebrate with you".to_string(),
        RsvpStatus::No => "We're sorry you can't make it".to_string(),
        RsvpStatus::Maybe => format!(
            "Thanks for your RSVP, please decide by {}",
            WEDDING_EVENT.rsvp_deadline
        ),
    }
}

pub fn confirmation_body(name: &str, status: RsvpStatus) -> String {
    let middle = match status {
        RsvpStatus::Yes => {
            "Thank you for coming, we're so happy you'll be joining us!".to_string()
        }
        RsvpStatus::No => format!(
            "We're sorry you can't make it, you can always reconsider. \
             Please respond before {}.",
            WEDDING_EVENT.rsvp_deadline
        ),
        RsvpStatus::Maybe => format!(
            "Thank you for RSVPing. Please make a decision before {}, \
             we'll send a reminder before then.",
            WEDDING_EVENT.rsvp_deadline
        ),
    };
    format!(
        "Hi {name},\n\n{middle}\n\nLove,\n{} & {}\n",
        WEDDING_EVENT.couple_b_short, WEDDING_EVENT.couple_a_short
    )
}

pub fn build_message(
    config: &AppConfig,
    to: &str,
    name: &str,
    status: RsvpStatus,
) -> Result<Message> {
    let message = Message::builder()
        .from(config.email_from.parse()?)
        .to(to.parse()?)
        .subject(confirmation_subject(status))
        .header(ContentType::TEXT_PLAIN)
        .body(confirmation_body(name, status))?;
    Ok(message)
}

fn send(config: &AppConfig, relay: &str, to: &str, name: &str, status: RsvpStatus) -> Result<()> {
    let message = build_message(config, to, name, status)?;
    let mut builder = SmtpTransport::starttls_relay(relay)?;
    if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }
    builder.build().send(&message)?;
    Ok(())
}

/// Queues the confirmation email for a submitted RSVP. Returns immediately;
/// the caller never learns whether delivery worked.
pub fn dispatch_confirmation(config: &AppConfig, to: String, name: String, status: RsvpStatus) {
    let Some(relay) = config.smtp_relay.clone() else {
        warn!("smtp relay not configured, skipping confirmation email to {to}");
        return;
    };
    let config = config.clone();
    rocket::tokio::task::spawn_blocking(move || {
        match send(&config, &relay, &to, &name, status) {
            Ok(()) => info!("sent {} confirmation to {to}", status.as_str()),
            Err(err) => error!("failed to send RSVP confirmation to {to}: {err}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_tracks_status() {
        assert!(confirmation_subject(RsvpStatus::Yes).starts_with("Thank you!"));
        assert!(confirmation_subject(RsvpStatus::No).contains("sorry"));
        assert!(confirmation_subject(RsvpStatus::Maybe).contains("28 February"));
    }

    #[test]
    fn body_greets_by_name_and_signs_off() {
        let body = confirmation_body("Maria", RsvpStatus::Yes);
        assert!(body.starts_with("Hi Maria,"));
        assert!(body.ends_with("Love,\nChris & Scarlett\n"));
        let undecided = confirmation_body("Maria", RsvpStatus::Maybe);
        assert!(undecided.contains("before 28 February"));
    }

    #[test]
    fn message_builds_with_default_sender() {
        let config = AppConfig::default();
        let message = build_message(&config, "guest@example.com", "Maria", RsvpStatus::Yes);
        assert!(message.is_ok());
    }

    #[test]
    fn bad_recipient_is_an_error() {
        let config = AppConfig::default();
        assert!(build_message(&config, "not-an-address", "Maria", RsvpStatus::No).is_err());
    }
}
