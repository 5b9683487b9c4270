//! Database operations for `daily_crawler_reports`, the run-report sink.

use chrono::{DateTime, Utc};
use endsig_core::RunReport;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A pending report row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CrawlerReportRow {
    pub id: i64,
    pub run_id: Uuid,
    pub crawler_name: String,
    pub status: String,
    pub report_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl CrawlerReportRow {
    /// Decodes `report_data`.
    ///
    /// # Errors
    ///
    /// Returns the decode error for documents that are not a [`RunReport`].
    pub fn report(&self) -> Result<RunReport, serde_json::Error> {
        serde_json::from_value(self.report_data.clone())
    }
}

/// Appends one report. `run_id` groups the reports of one orchestrator
/// invocation. Returns the new row id.
///
/// # Errors
///
/// Returns [`DbError::Meta`] if the report cannot be encoded, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_run_report(
    pool: &PgPool,
    run_id: Uuid,
    report: &RunReport,
) -> Result<i64, DbError> {
    let report_data = serde_json::to_value(report)?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO daily_crawler_reports (run_id, crawler_name, status, report_data) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(run_id)
    .bind(&report.source)
    .bind(report.status.as_str())
    .bind(report_data)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// All reports not yet flushed, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pending_reports(pool: &PgPool) -> Result<Vec<CrawlerReportRow>, DbError> {
    let rows = sqlx::query_as::<_, CrawlerReportRow>(
        "SELECT id, run_id, crawler_name, status, report_data, created_at \
         FROM daily_crawler_reports \
         ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Deletes exactly the given report ids. Returns the number removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_reports(pool: &PgPool, ids: &[i64]) -> Result<u64, DbError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("DELETE FROM daily_crawler_reports WHERE id = ANY($1::bigint[])")
        .bind(ids)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
