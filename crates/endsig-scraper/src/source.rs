//! The per-platform listing capability.

use std::fmt;

use async_trait::async_trait;
use endsig_core::ContentItem;

use crate::error::ScraperError;

/// One queryable dimension of a source catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    /// A per-day feed. `key` is what the platform API expects, `tag` is the
    /// normalized weekday recorded in item membership.
    Weekday { key: String, tag: String },
    /// The "finished candidates" feed.
    Finished,
}

impl ListingView {
    #[must_use]
    pub fn weekday(key: &str, tag: &str) -> Self {
        ListingView::Weekday {
            key: key.to_owned(),
            tag: tag.to_owned(),
        }
    }
}

impl fmt::Display for ListingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingView::Weekday { key, tag } if key == tag => write!(f, "weekday:{tag}"),
            ListingView::Weekday { key, tag } => write!(f, "weekday:{tag}({key})"),
            ListingView::Finished => write!(f, "finished"),
        }
    }
}

/// One page of one listing view. Items carry no weekday membership yet; the
/// aggregator assigns it.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub items: Vec<ContentItem>,
    pub has_more: bool,
}

/// Ceilings that bound a run against a misbehaving upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLimits {
    pub weekday_max_pages: u32,
    pub finished_max_pages: u32,
    /// Stop the finished pass once this many unique candidates are collected.
    pub finished_max_items: usize,
}

/// An external platform that can be crawled page by page.
///
/// `fetch_page` applies the retry policy itself; an `Err` means the page is
/// lost and the caller should treat the view as truncated there.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Stable source identifier, used as the `source` column.
    fn name(&self) -> &str;

    /// Per-day views to scan, in merge order.
    fn weekday_views(&self) -> Vec<ListingView>;

    fn limits(&self) -> ListingLimits;

    /// Fetches page `page` (1-based) of `view`.
    async fn fetch_page(&self, view: &ListingView, page: u32)
        -> Result<ListingPage, ScraperError>;
}
