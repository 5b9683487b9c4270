//! Read access to `subscriptions`. Rows are created by the web layer.

use sqlx::PgPool;

use crate::DbError;

/// Email addresses subscribed to `(content_id, source)`, sorted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_subscribers(
    pool: &PgPool,
    content_id: &str,
    source: &str,
) -> Result<Vec<String>, DbError> {
    let emails = sqlx::query_scalar::<_, String>(
        "SELECT email FROM subscriptions \
         WHERE content_id = $1 AND source = $2 \
         ORDER BY email",
    )
    .bind(content_id)
    .bind(source)
    .fetch_all(pool)
    .await?;

    Ok(emails)
}
