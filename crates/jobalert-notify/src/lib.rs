//! Digest composition and email delivery.

pub mod digest;
pub mod error;
pub mod mailer;

pub use digest::{compose_digest, Digest};
pub use error::NotifyError;
pub use mailer::{notify, Mailer, SmtpMailer};
