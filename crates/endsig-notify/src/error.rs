use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Delivery settings are missing or unusable. Raised before any send.
    #[error("mail delivery is not configured: {0}")]
    Configuration(String),

    /// One message could not be delivered.
    #[error("delivery to {to} failed: {reason}")]
    Delivery { to: String, reason: String },

    #[error(transparent)]
    Db(#[from] endsig_db::DbError),
}

impl NotifyError {
    pub(crate) fn delivery(to: &str, reason: impl ToString) -> Self {
        NotifyError::Delivery {
            to: to.to_owned(),
            reason: reason.to_string(),
        }
    }
}
