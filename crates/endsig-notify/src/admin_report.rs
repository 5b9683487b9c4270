//! Consolidated admin report over the pending run reports.

use chrono::{NaiveDate, Utc};
use endsig_core::{RunReport, RunStatus};
use endsig_db::CrawlerReportRow;
use sqlx::PgPool;

use crate::error::NotifyError;
use crate::mailer::Mailer;

/// A rendered report email.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminReport {
    pub overall: RunStatus,
    pub subject: String,
    pub body: String,
}

/// What one `report send` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFlush {
    pub reports: usize,
    pub deleted: u64,
}

/// Renders one plain-text summary covering every row. Rows whose
/// `report_data` does not decode are listed with their stored name and
/// status.
#[must_use]
pub fn render_admin_report(rows: &[CrawlerReportRow], date: NaiveDate) -> AdminReport {
    let mut overall = RunStatus::Success;
    let mut body = format!(
        "Hello,\n\n\
         The daily content sync has finished.\n\
         {} run report(s) were collected.\n",
        rows.len()
    );

    for row in rows {
        if row.status != RunStatus::Success.as_str() {
            overall = RunStatus::Failure;
        }
        match row.report() {
            Ok(report) => body.push_str(&render_section(&report)),
            Err(e) => body.push_str(&format!(
                "\n--- {} ({}) ---\n  - Unreadable report document: {e}\n",
                row.crawler_name, row.status
            )),
        }
    }

    let label = match overall {
        RunStatus::Success => "SUCCESS",
        RunStatus::Failure => "FAILURE",
    };
    AdminReport {
        overall,
        subject: format!("[{label}] Daily crawl report ({date})"),
        body,
    }
}

fn render_section(report: &RunReport) -> String {
    let header = format!("\n--- {} ({}) ---\n", report.display_name(), report.status);
    match report.status {
        RunStatus::Success => {
            let details: String = report
                .completed_details
                .iter()
                .map(|line| format!("    {line}\n"))
                .collect();
            format!(
                "{header}  - Duration: {:.2}s\n  - New contents: {}\n  \
                 - Notified subscribers: {}\n  - Completed items: {}\n{details}",
                report.duration_secs,
                report.new_contents,
                report.total_notified,
                report.completed_count,
            )
        }
        RunStatus::Failure => format!(
            "{header}  - Error: {}\n",
            report.error_message.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Sends every pending report to `admin_email` as one message, then deletes
/// exactly the rows that were sent. Reports appended meanwhile stay queued.
///
/// # Errors
///
/// Returns [`NotifyError::Db`] on read/delete failure and
/// [`NotifyError::Delivery`] when the email cannot be sent (nothing is
/// deleted in that case).
pub async fn send_admin_report(
    pool: &PgPool,
    mailer: &dyn Mailer,
    admin_email: &str,
) -> Result<ReportFlush, NotifyError> {
    let rows = endsig_db::list_pending_reports(pool).await?;
    if rows.is_empty() {
        tracing::info!("no pending run reports");
        return Ok(ReportFlush::default());
    }

    let report = render_admin_report(&rows, Utc::now().date_naive());
    mailer
        .send(admin_email, &report.subject, &report.body)
        .await?;
    tracing::info!(reports = rows.len(), overall = %report.overall, "admin report sent");

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let deleted = endsig_db::delete_reports(pool, &ids).await?;

    Ok(ReportFlush {
        reports: rows.len(),
        deleted,
    })
}
