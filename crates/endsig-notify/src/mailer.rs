use std::sync::Arc;

use async_trait::async_trait;
use endsig_core::{AppConfig, EmailProvider};

use crate::error::NotifyError;
use crate::sendgrid::SendGridMailer;
use crate::smtp::SmtpMailer;

/// Delivers one plain-text message to one address.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Builds the transport selected by `ENDSIG_EMAIL_PROVIDER`.
///
/// # Errors
///
/// Returns [`NotifyError::Configuration`] when the selected provider's
/// credentials are absent or the sender address does not parse.
pub fn mailer_from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>, NotifyError> {
    match config.email_provider {
        EmailProvider::Smtp => {
            let (Some(address), Some(password)) = (&config.email_address, &config.email_password)
            else {
                return Err(NotifyError::Configuration(
                    "smtp provider requires EMAIL_ADDRESS and EMAIL_PASSWORD".to_string(),
                ));
            };
            let mailer = SmtpMailer::new(&config.smtp_server, config.smtp_port, address, password)?;
            tracing::info!(server = %config.smtp_server, port = config.smtp_port, "using smtp mailer");
            Ok(Arc::new(mailer))
        }
        EmailProvider::SendGrid => {
            let (Some(api_key), Some(address)) = (&config.sendgrid_api_key, &config.email_address)
            else {
                return Err(NotifyError::Configuration(
                    "sendgrid provider requires SENDGRID_API_KEY and EMAIL_ADDRESS".to_string(),
                ));
            };
            let mailer = SendGridMailer::new(api_key, address)?;
            tracing::info!("using sendgrid mailer");
            Ok(Arc::new(mailer))
        }
    }
}
