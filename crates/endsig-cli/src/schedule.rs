//! Long-running scheduler process.
//!
//! Registers the crawl and admin-report jobs on their configured cron
//! expressions and keeps them running until ctrl-c.

use std::sync::Arc;

use endsig_core::AppConfig;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::{crawl, report};

/// Builds and starts the scheduler with both jobs registered.
///
/// The returned handle must be kept alive; dropping it stops the jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if a cron expression does not parse or the
/// scheduler cannot start.
pub(crate) async fn build_scheduler(
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_crawl_job(&scheduler, pool.clone(), Arc::clone(&config)).await?;
    register_report_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_crawl_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let cron = config.crawl_cron.clone();
    let pool = Arc::new(pool);

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting crawl run");
            match crawl::run_crawl(&pool, &config, None).await {
                Ok(()) => tracing::info!("scheduler: crawl run complete"),
                Err(e) => tracing::error!(error = %format!("{e:#}"), "scheduler: crawl run failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: registered crawl job");
    Ok(())
}

async fn register_report_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let cron = config.report_cron.clone();
    let pool = Arc::new(pool);

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: sending admin report");
            if let Err(e) = report::run_report_send(&pool, &config).await {
                tracing::error!(error = %format!("{e:#}"), "scheduler: admin report failed");
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, "scheduler: registered report job");
    Ok(())
}

/// `schedule` command handler. Blocks until ctrl-c, then shuts the
/// scheduler down.
///
/// # Errors
///
/// Returns an error if the scheduler cannot be built, the signal handler
/// cannot be installed, or shutdown fails.
pub(crate) async fn run_scheduler(pool: PgPool, config: AppConfig) -> anyhow::Result<()> {
    let mut scheduler = build_scheduler(pool, Arc::new(config)).await?;
    tracing::info!("scheduler running; press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("received shutdown signal, stopping scheduler");
    scheduler.shutdown().await?;
    Ok(())
}
