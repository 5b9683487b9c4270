//! Shared HTTP plumbing for the platform clients.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::ScraperError;
use crate::retry::RetryPolicy;

/// Transport settings shared by every source client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl ClientSettings {
    #[must_use]
    pub fn from_app_config(config: &endsig_core::AppConfig) -> Self {
        Self {
            timeout_secs: config.scraper_request_timeout_secs,
            user_agent: config.scraper_user_agent.clone(),
            retry: RetryPolicy {
                max_attempts: config.scraper_max_attempts,
                min_backoff: Duration::from_secs(config.scraper_backoff_min_secs),
                max_backoff: Duration::from_secs(config.scraper_backoff_max_secs),
            },
        }
    }

    /// Builds a `reqwest::Client` with the per-request timeout and UA.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed.
    pub fn build_http_client(&self) -> Result<Client, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&self.user_agent)
            .build()?;
        Ok(client)
    }
}

/// Maps non-2xx responses to typed errors and returns the body text.
pub(crate) async fn read_success_body(response: Response, url: &str) -> Result<String, ScraperError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ScraperError::RateLimited {
            url: url.to_owned(),
        });
    }

    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response.text().await?)
}

/// Splits a combined author credit such as `"글작가 / 그림작가"`.
pub(crate) fn split_authors(raw: &str) -> Vec<String> {
    raw.split(['/', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
