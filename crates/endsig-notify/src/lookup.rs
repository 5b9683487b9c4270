use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::NotifyError;

/// Resolves the subscribers of one `(content_id, source)`.
#[async_trait]
pub trait SubscriberLookup: Send + Sync {
    async fn subscribers(&self, content_id: &str, source: &str)
        -> Result<Vec<String>, NotifyError>;
}

#[async_trait]
impl SubscriberLookup for PgPool {
    async fn subscribers(
        &self,
        content_id: &str,
        source: &str,
    ) -> Result<Vec<String>, NotifyError> {
        Ok(endsig_db::list_subscribers(self, content_id, source).await?)
    }
}
