use endsig_core::AppConfig;
use sqlx::PgPool;

/// `report send` command handler. Without `ADMIN_EMAIL` this only warns.
///
/// # Errors
///
/// Returns an error if the mailer cannot be configured, the reports cannot be
/// read or deleted, or the email is not delivered.
pub(crate) async fn run_report_send(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let Some(admin_email) = config.admin_email.as_deref() else {
        tracing::warn!("ADMIN_EMAIL is not set; skipping admin report");
        return Ok(());
    };

    let mailer = endsig_notify::mailer_from_config(config)?;
    let flush = endsig_notify::send_admin_report(pool, mailer.as_ref(), admin_email).await?;

    if flush.reports == 0 {
        println!("no pending run reports");
    } else {
        println!(
            "sent admin report covering {} run report(s); cleared {}",
            flush.reports, flush.deleted
        );
    }
    Ok(())
}
