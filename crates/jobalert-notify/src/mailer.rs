//! Email delivery over authenticated SMTP.

use async_trait::async_trait;
use jobalert_core::SmtpCredentials;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::digest::Digest;
use crate::error::NotifyError;

/// Delivers one digest to one recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, digest: &Digest) -> Result<(), NotifyError>;
}

/// Sends `digest` to `to`, reporting whether it was delivered.
///
/// Delivery failures are logged and reported as `false`; they never propagate.
pub async fn notify(mailer: &dyn Mailer, to: &str, digest: &Digest) -> bool {
    match mailer.send(to, digest).await {
        Ok(()) => {
            tracing::info!(to, subject = %digest.subject, "digest delivered");
            true
        }
        Err(e) => {
            tracing::warn!(to, error = %e, "digest delivery failed");
            false
        }
    }
}

/// [`Mailer`] that opens a fresh STARTTLS session, authenticated as the
/// sender, for every message.
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: SmtpCredentials,
}

impl SmtpMailer {
    #[must_use]
    pub fn new(host: &str, port: u16, credentials: SmtpCredentials) -> Self {
        Self {
            host: host.to_owned(),
            port,
            credentials,
        }
    }

    /// Builds the multipart (plain + HTML) message for `digest`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Address`] if either address does not parse, or
    /// [`NotifyError::Message`] if the message cannot be assembled.
    pub fn build_message(&self, to: &str, digest: &Digest) -> Result<Message, NotifyError> {
        let from: Mailbox = self.credentials.sender_email.parse()?;
        let to: Mailbox = to.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(digest.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                digest.text_body.clone(),
                digest.html_body.clone(),
            ))?;
        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, digest: &Digest) -> Result<(), NotifyError> {
        let message = self.build_message(to, digest)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(
                self.credentials.sender_email.clone(),
                self.credentials.password.clone(),
            ))
            .build();

        transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn digest() -> Digest {
        Digest {
            subject: "2 New Jobs Found".to_string(),
            html_body: "<div><b>Data Analyst</b></div>".to_string(),
            text_body: "Data Analyst\n".to_string(),
        }
    }

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(
            "smtp.example.com",
            587,
            SmtpCredentials {
                sender_email: "alerts@example.com".to_string(),
                password: "secret".to_string(),
            },
        )
    }

    struct CountingMailer {
        sends: AtomicU32,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for CountingMailer {
        async fn send(&self, _to: &str, _digest: &Digest) -> Result<(), NotifyError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NotifyError::Rejected("535 authentication failed".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn build_message_sets_headers_and_both_parts() {
        let message = mailer().build_message("a@x.com", &digest()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: alerts@example.com"));
        assert!(raw.contains("To: a@x.com"));
        assert!(raw.contains("Subject: 2 New Jobs Found"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn build_message_rejects_bad_recipient() {
        let err = mailer().build_message("not an address", &digest()).unwrap_err();
        assert!(matches!(err, NotifyError::Address(_)));
    }

    #[tokio::test]
    async fn notify_reports_delivery() {
        let mailer = CountingMailer {
            sends: AtomicU32::new(0),
            fail: false,
        };
        assert!(notify(&mailer, "a@x.com", &digest()).await);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn notify_swallows_delivery_failure() {
        let mailer = CountingMailer {
            sends: AtomicU32::new(0),
            fail: true,
        };
        assert!(!notify(&mailer, "a@x.com", &digest()).await);
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);
    }
}
