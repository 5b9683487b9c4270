//! Run orchestrator.
//!
//! One crawl run walks every enabled source through fetch, reconcile,
//! notify and persist, and always records a run report per source. A
//! failing source is captured in its report and never stops the others.

use std::sync::Arc;
use std::time::{Duration, Instant};

use endsig_core::{AppConfig, RunReport, RunStatus};
use endsig_notify::{DispatchSummary, Mailer};
use endsig_scraper::{ClientSettings, KakaopageSource, ListingSource, NaverWebtoonSource};
use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use uuid::Uuid;

/// Builds the enabled sources, or only `filter` when given.
///
/// # Errors
///
/// Returns an error for an unknown source name, a `filter` that is not
/// enabled, or an HTTP client that cannot be built.
pub(crate) fn build_sources(
    config: &AppConfig,
    filter: Option<&str>,
) -> anyhow::Result<Vec<Arc<dyn ListingSource>>> {
    let settings = ClientSettings::from_app_config(config);

    let names: Vec<&str> = match filter {
        Some(name) => {
            if !config.sources.iter().any(|s| s == name) {
                anyhow::bail!(
                    "source '{name}' is not enabled; enabled sources: {}",
                    config.sources.join(", ")
                );
            }
            vec![name]
        }
        None => config.sources.iter().map(String::as_str).collect(),
    };

    names
        .into_iter()
        .map(|name| build_source(name, config, &settings))
        .collect()
}

fn build_source(
    name: &str,
    config: &AppConfig,
    settings: &ClientSettings,
) -> anyhow::Result<Arc<dyn ListingSource>> {
    let source: Arc<dyn ListingSource> = match name {
        endsig_scraper::naver::SOURCE_NAME => {
            Arc::new(NaverWebtoonSource::new(&config.naver_api_url, settings)?)
        }
        endsig_scraper::kakaopage::SOURCE_NAME => {
            Arc::new(KakaopageSource::new(&config.kakaopage_graphql_url, settings)?)
        }
        other => anyhow::bail!("unknown source '{other}'"),
    };
    Ok(source)
}

/// What one successful source pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SourceSync {
    pub new_contents: u64,
    pub completed: usize,
    pub dispatch: DispatchSummary,
}

/// Fetch, reconcile, notify, then persist one source.
///
/// Notices go out before the new statuses are written, so a run that fails
/// to notify leaves the stored state untouched and the next run sees the
/// same transitions again.
///
/// # Errors
///
/// Returns an error when the stored state cannot be read, there are
/// transitions but no mailer, or the sync writes fail.
pub(crate) async fn synchronize(
    pool: &PgPool,
    source: &dyn ListingSource,
    mailer: Option<&dyn Mailer>,
    inter_page_delay: Duration,
) -> anyhow::Result<SourceSync> {
    let name = source.name();
    let persisted = endsig_db::load_source_state(pool, name).await?;
    let snapshot = endsig_scraper::fetch_all(source, inter_page_delay).await;

    let newly_finished = endsig_core::diff_transitions(&persisted, &snapshot);
    tracing::info!(
        source = name,
        stored = persisted.len(),
        fetched = snapshot.all.len(),
        newly_finished = newly_finished.len(),
        "snapshot reconciled"
    );

    let dispatch =
        endsig_notify::dispatch_completions(&newly_finished, &snapshot.all, name, pool, mailer)
            .await?;

    let plan = endsig_core::plan_sync(name, &persisted, &snapshot);
    let outcome = if plan.is_empty() {
        endsig_db::SyncOutcome::default()
    } else {
        endsig_db::apply_sync_plan(pool, &plan).await?
    };
    tracing::info!(
        source = name,
        updated = outcome.updated,
        inserted = outcome.inserted,
        "contents synchronized"
    );

    Ok(SourceSync {
        new_contents: outcome.inserted,
        completed: newly_finished.len(),
        dispatch,
    })
}

/// Runs one source and records its report under `run_id`. Never fails: any
/// error becomes a failure report.
pub(crate) async fn run_daily_check(
    pool: &PgPool,
    source: &dyn ListingSource,
    mailer: Option<&dyn Mailer>,
    inter_page_delay: Duration,
    run_id: Uuid,
) -> RunReport {
    let name = source.name();
    let started = Instant::now();
    tracing::info!(source = name, %run_id, "source run started");

    let result = synchronize(pool, source, mailer, inter_page_delay).await;
    let elapsed = started.elapsed().as_secs_f64();

    let report = match result {
        Ok(sync) => RunReport::success(
            name,
            sync.new_contents,
            sync.dispatch.lines,
            sync.dispatch.total_notified,
            sync.completed,
            elapsed,
        ),
        Err(e) => {
            tracing::error!(source = name, error = %format!("{e:#}"), "source run failed");
            RunReport::failure(name, format!("{e:#}"), elapsed)
        }
    };

    if let Err(e) = endsig_db::insert_run_report(pool, run_id, &report).await {
        tracing::error!(source = name, error = %e, "failed to record run report");
    }
    report
}

/// Runs every source with at most `max_concurrent` in flight. Reports come
/// back in completion order.
pub(crate) async fn run_all(
    pool: &PgPool,
    sources: &[Arc<dyn ListingSource>],
    mailer: Option<&dyn Mailer>,
    inter_page_delay: Duration,
    max_concurrent: usize,
) -> Vec<RunReport> {
    let run_id = Uuid::new_v4();

    let checks: Vec<_> = sources
        .iter()
        .map(|source| run_daily_check(pool, source.as_ref(), mailer, inter_page_delay, run_id))
        .collect();

    stream::iter(checks)
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await
}

/// `crawl` command handler.
///
/// # Errors
///
/// Returns an error if the sources cannot be built or every source failed.
pub(crate) async fn run_crawl(
    pool: &PgPool,
    config: &AppConfig,
    filter: Option<&str>,
) -> anyhow::Result<()> {
    let sources = build_sources(config, filter)?;

    let mailer = match endsig_notify::mailer_from_config(config) {
        Ok(mailer) => Some(mailer),
        Err(e) => {
            tracing::warn!(error = %e, "mailer unavailable; runs with completions will fail");
            None
        }
    };

    let reports = run_all(
        pool,
        &sources,
        mailer.as_deref(),
        Duration::from_millis(config.scraper_inter_request_delay_ms),
        config.max_concurrent_sources,
    )
    .await;

    let failed = reports
        .iter()
        .filter(|r| r.status == RunStatus::Failure)
        .count();
    for report in &reports {
        match report.status {
            RunStatus::Success => println!(
                "{}: {} new, {} completed, {} notified ({:.1}s)",
                report.source,
                report.new_contents,
                report.completed_count,
                report.total_notified,
                report.duration_secs
            ),
            RunStatus::Failure => println!(
                "{}: failed: {}",
                report.source,
                report.error_message.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    if failed > 0 && failed == reports.len() {
        anyhow::bail!("all {failed} source run(s) failed");
    }
    Ok(())
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;
