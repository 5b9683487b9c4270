//! SMTP transport (STARTTLS relay with login credentials).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::NotifyError;
use crate::mailer::Mailer;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    /// Builds the relay transport. No connection is opened until the first
    /// send.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] if `sender` is not a valid
    /// address or the relay cannot be configured.
    pub fn new(server: &str, port: u16, sender: &str, password: &str) -> Result<Self, NotifyError> {
        let mailbox: Mailbox = sender
            .parse()
            .map_err(|e| NotifyError::Configuration(format!("invalid sender \"{sender}\": {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)
            .map_err(|e| NotifyError::Configuration(format!("smtp relay {server}: {e}")))?
            .port(port)
            .credentials(Credentials::new(sender.to_owned(), password.to_owned()))
            .build();

        Ok(Self {
            transport,
            sender: mailbox,
        })
    }
}

pub(crate) fn build_message(
    sender: &Mailbox,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<Message, NotifyError> {
    let recipient: Mailbox = to.parse().map_err(|e| NotifyError::delivery(to, e))?;
    Message::builder()
        .from(sender.clone())
        .to(recipient)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_owned())
        .map_err(|e| NotifyError::delivery(to, e))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = build_message(&self.sender, to, subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::delivery(to, e))?;
        Ok(())
    }
}
