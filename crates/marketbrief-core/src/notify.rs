//! Outbound delivery boundary.
//!
//! Delivery is the one failure the pipeline never contains: a report
//! nobody receives has no value, so `NotifyError` propagates to the
//! binary and flips the exit code.

use std::future::Future;
use std::pin::Pin;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::debug;

use crate::config::MailSettings;

/// Message handed to the notifier: subject, plain text, optional HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

impl OutboundMessage {
    pub fn new(subject: impl Into<String>, text_body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: None,
        }
    }

    pub fn with_html(mut self, html_body: impl Into<String>) -> Self {
        self.html_body = Some(html_body.into());
        self
    }
}

/// Delivery failures. Fatal to the run; never swallowed.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build mail message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Delivery contract for assembled reports and alerts.
pub trait Notifier: Send + Sync {
    fn send<'a>(
        &'a self,
        message: &'a OutboundMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;
}

/// SMTP-backed notifier using the configured mail identity.
///
/// Port 465 speaks SMTPS; any other port negotiates STARTTLS.
pub struct SmtpNotifier {
    settings: MailSettings,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(settings: MailSettings) -> Result<Self, NotifyError> {
        let credentials =
            Credentials::new(settings.username.clone(), settings.password.clone());

        let builder = if settings.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        };
        let transport = builder
            .port(settings.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            settings,
            transport,
        })
    }

    fn build_message(&self, message: &OutboundMessage) -> Result<Message, NotifyError> {
        let from: Mailbox = self.settings.username.parse()?;
        let to: Mailbox = self.settings.recipient.parse()?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject);

        let built = match &message.html_body {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                html.clone(),
            ))?,
            None => builder.body(message.text_body.clone())?,
        };
        Ok(built)
    }
}

impl Notifier for SmtpNotifier {
    fn send<'a>(
        &'a self,
        message: &'a OutboundMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>> {
        Box::pin(async move {
            let mail = self.build_message(message)?;
            debug!(
                subject = %message.subject,
                to = %self.settings.recipient,
                "sending mail"
            );
            self.transport.send(mail).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> MailSettings {
        MailSettings {
            username: String::from("reports@example.com"),
            password: String::from("hunter2"),
            host: String::from("smtp.example.com"),
            port: 587,
            recipient: String::from("me@example.com"),
        }
    }

    #[tokio::test]
    async fn builds_multipart_when_html_is_present() {
        let notifier = SmtpNotifier::new(settings()).expect("notifier");
        let message = OutboundMessage::new("Daily Market Report", "plain text")
            .with_html("<html><body>hi</body></html>");

        let mail = notifier.build_message(&message).expect("message");
        let rendered = String::from_utf8(mail.formatted()).expect("utf-8");
        assert!(rendered.contains("multipart/alternative"));
        assert!(rendered.contains("Subject: Daily Market Report"));
    }

    #[tokio::test]
    async fn builds_plain_message_without_html() {
        let notifier = SmtpNotifier::new(settings()).expect("notifier");
        let message = OutboundMessage::new("Price alert", "AAPL moved -2.50%");

        let mail = notifier.build_message(&message).expect("message");
        let rendered = String::from_utf8(mail.formatted()).expect("utf-8");
        assert!(rendered.contains("AAPL moved -2.50%"));
        assert!(!rendered.contains("multipart/alternative"));
    }

    #[tokio::test]
    async fn rejects_unparseable_sender_address() {
        let mut bad = settings();
        bad.username = String::from("not an address");
        let notifier = SmtpNotifier::new(bad).expect("notifier");
        let message = OutboundMessage::new("subject", "body");

        let error = notifier.build_message(&message).expect_err("must fail");
        assert!(matches!(error, NotifyError::Address(_)));
    }
}
