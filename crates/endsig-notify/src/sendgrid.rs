//! SendGrid v3 mail-send transport.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::NotifyError;
use crate::mailer::Mailer;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridMailer {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    sender: String,
}

impl SendGridMailer {
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] if the HTTP client cannot be
    /// built or `sender` is not an address.
    pub fn new(api_key: &str, sender: &str) -> Result<Self, NotifyError> {
        Self::with_endpoint(SENDGRID_ENDPOINT, api_key, sender)
    }

    /// Same as [`SendGridMailer::new`] with a custom API endpoint.
    ///
    /// # Errors
    ///
    /// See [`SendGridMailer::new`].
    pub fn with_endpoint(endpoint: &str, api_key: &str, sender: &str) -> Result<Self, NotifyError> {
        if sender.parse::<lettre::Address>().is_err() {
            return Err(NotifyError::Configuration(format!(
                "invalid sender \"{sender}\""
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::Configuration(format!("sendgrid client: {e}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.to_owned(),
            api_key: api_key.to_owned(),
            sender: sender.to_owned(),
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let payload = json!({
            "personalizations": [{"to": [{"email": to}]}],
            "from": {"email": self.sender},
            "subject": subject,
            "content": [{"type": "text/plain", "value": body}],
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::delivery(to, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "sendgrid returned non-success");
            return Err(NotifyError::delivery(to, format!("sendgrid returned {status}")));
        }

        Ok(())
    }
}
