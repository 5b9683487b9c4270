//! Fans a [`ListingSource`] out across its listing views and folds the pages
//! into one classified [`Snapshot`].
//!
//! Weekday views are scanned concurrently, each into its own accumulator;
//! the accumulators are merged afterwards in view order. The finished feed is
//! paginated sequentially alongside them. Candidates from the finished feed
//! never override a weekday classification.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Duration;

use endsig_core::{ContentItem, Snapshot};
use futures::future::join_all;

use crate::source::{ListingSource, ListingView};

/// Items one weekday view returned, in page order.
#[derive(Debug)]
struct WeekdayScan {
    tag: String,
    items: Vec<ContentItem>,
}

/// An item merged across weekday sightings.
#[derive(Debug)]
struct Sighting {
    item: ContentItem,
    days: BTreeSet<String>,
    resting: bool,
}

/// Runs one full aggregation pass for `source`.
///
/// Never fails: a weekday whose first page cannot be fetched is dropped, a
/// later page failure truncates that view, and a finished feed that fails
/// stops where it failed. Every such event is logged.
pub async fn fetch_all(source: &dyn ListingSource, inter_page_delay: Duration) -> Snapshot {
    let views = source.weekday_views();
    let limits = source.limits();

    let weekday_scans = join_all(
        views
            .iter()
            .map(|view| scan_weekday(source, view, limits.weekday_max_pages, inter_page_delay)),
    );
    let finished_scan = scan_finished(
        source,
        limits.finished_max_pages,
        limits.finished_max_items,
        inter_page_delay,
    );
    let (weekday_scans, candidates) = futures::future::join(weekday_scans, finished_scan).await;

    let snapshot = classify(weekday_scans.into_iter().flatten(), candidates);
    tracing::info!(
        source = source.name(),
        ongoing = snapshot.ongoing.len(),
        hiatus = snapshot.hiatus.len(),
        finished = snapshot.finished.len(),
        total = snapshot.all.len(),
        "listing aggregation complete"
    );
    snapshot
}

async fn scan_weekday(
    source: &dyn ListingSource,
    view: &ListingView,
    max_pages: u32,
    inter_page_delay: Duration,
) -> Option<WeekdayScan> {
    let ListingView::Weekday { tag, .. } = view else {
        return None;
    };
    let mut items = Vec::new();

    for page in 1..=max_pages.max(1) {
        if page > 1 {
            tokio::time::sleep(inter_page_delay).await;
        }

        match source.fetch_page(view, page).await {
            Ok(listing) => {
                if listing.items.is_empty() {
                    break;
                }
                items.extend(listing.items);
                if !listing.has_more {
                    break;
                }
                if page == max_pages {
                    tracing::warn!(
                        source = source.name(),
                        view = %view,
                        max_pages,
                        "weekday listing hit page ceiling"
                    );
                }
            }
            Err(e) if page == 1 => {
                tracing::error!(
                    source = source.name(),
                    view = %view,
                    error = %e,
                    "weekday listing failed, dropping it from this run"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    source = source.name(),
                    view = %view,
                    page,
                    error = %e,
                    "weekday listing truncated"
                );
                break;
            }
        }
    }

    tracing::debug!(source = source.name(), view = %view, items = items.len(), "weekday listing scanned");
    Some(WeekdayScan {
        tag: tag.clone(),
        items,
    })
}

/// Unique finished candidates in first-seen order.
async fn scan_finished(
    source: &dyn ListingSource,
    max_pages: u32,
    max_items: usize,
    inter_page_delay: Duration,
) -> Vec<ContentItem> {
    let view = ListingView::Finished;
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    'pages: for page in 1..=max_pages {
        if page > 1 {
            tokio::time::sleep(inter_page_delay).await;
        }

        let listing = match source.fetch_page(&view, page).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(
                    source = source.name(),
                    page,
                    collected = candidates.len(),
                    error = %e,
                    "finished listing stopped early"
                );
                break;
            }
        };

        if listing.items.is_empty() {
            break;
        }

        for item in listing.items {
            if candidates.len() >= max_items {
                tracing::info!(
                    source = source.name(),
                    max_items,
                    "finished listing reached item ceiling"
                );
                break 'pages;
            }
            if seen.insert(item.external_id.clone()) {
                candidates.push(item);
            }
        }

        if !listing.has_more {
            break;
        }
    }

    tracing::debug!(source = source.name(), candidates = candidates.len(), "finished listing scanned");
    candidates
}

fn classify(
    scans: impl IntoIterator<Item = WeekdayScan>,
    candidates: Vec<ContentItem>,
) -> Snapshot {
    let mut sightings: BTreeMap<String, Sighting> = BTreeMap::new();

    for scan in scans {
        for item in scan.items {
            let resting = item.raw_status.is_resting();
            let sighting = sightings
                .entry(item.external_id.clone())
                .or_insert_with(|| Sighting {
                    item,
                    days: BTreeSet::new(),
                    resting: false,
                });
            sighting.days.insert(scan.tag.clone());
            sighting.resting |= resting;
        }
    }

    let mut snapshot = Snapshot::default();

    for (id, sighting) in sightings {
        let mut item = sighting.item;
        item.weekdays = sighting.days.into_iter().collect();
        if sighting.resting {
            snapshot.hiatus.insert(id, item);
        } else {
            snapshot.ongoing.insert(id, item);
        }
    }

    for mut item in candidates {
        let id = item.external_id.clone();
        if snapshot.ongoing.contains_key(&id) || snapshot.hiatus.contains_key(&id) {
            continue;
        }
        item.weekdays.clear();
        if item.raw_status.is_resting() {
            snapshot.hiatus.insert(id, item);
        } else {
            snapshot.finished.insert(id, item);
        }
    }

    snapshot.all = snapshot
        .finished
        .iter()
        .chain(&snapshot.hiatus)
        .chain(&snapshot.ongoing)
        .map(|(id, item)| (id.clone(), item.clone()))
        .collect();

    snapshot
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
