//! Listing client for Naver Webtoon's public title-list API.

pub mod types;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::client::{read_success_body, ClientSettings};
use crate::error::ScraperError;
use crate::retry::{retry_with_backoff, PageContext, RetryPolicy};
use crate::source::{ListingLimits, ListingPage, ListingSource, ListingView};
use types::{NaverListResponse, NaverTitle};

pub const SOURCE_NAME: &str = "naver_webtoon";

/// `(week query value, normalized tag)`. `dailyPlus` titles are recorded
/// under `daily`.
const WEEKDAY_KEYS: [(&str, &str); 9] = [
    ("mon", "mon"),
    ("tue", "tue"),
    ("wed", "wed"),
    ("thu", "thu"),
    ("fri", "fri"),
    ("sat", "sat"),
    ("sun", "sun"),
    ("daily", "daily"),
    ("dailyPlus", "daily"),
];

const FINISHED_PAGE_SIZE: u32 = 100;

const LIMITS: ListingLimits = ListingLimits {
    weekday_max_pages: 1,
    finished_max_pages: 20,
    finished_max_items: 2000,
};

pub struct NaverWebtoonSource {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl NaverWebtoonSource {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, settings: &ClientSettings) -> Result<Self, ScraperError> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: settings.build_http_client()?,
            base_url,
            retry: settings.retry,
        })
    }

    fn view_url(&self, view: &ListingView, page: u32) -> Url {
        let mut url = self.base_url.clone();
        match view {
            ListingView::Weekday { key, .. } => {
                url.set_path(&format!("{}/weekday", url.path().trim_end_matches('/')));
                url.query_pairs_mut().append_pair("week", key);
            }
            ListingView::Finished => {
                url.set_path(&format!("{}/finished", url.path().trim_end_matches('/')));
                url.query_pairs_mut()
                    .append_pair("order", "UPDATE")
                    .append_pair("page", &page.to_string())
                    .append_pair("pageSize", &FINISHED_PAGE_SIZE.to_string());
            }
        }
        url
    }
}

#[async_trait]
impl ListingSource for NaverWebtoonSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn weekday_views(&self) -> Vec<ListingView> {
        WEEKDAY_KEYS
            .iter()
            .map(|(key, tag)| ListingView::weekday(key, tag))
            .collect()
    }

    fn limits(&self) -> ListingLimits {
        LIMITS
    }

    async fn fetch_page(
        &self,
        view: &ListingView,
        page: u32,
    ) -> Result<ListingPage, ScraperError> {
        let url = self.view_url(view, page);
        let label = view.to_string();
        let ctx = PageContext {
            source_name: SOURCE_NAME,
            view: &label,
            page,
        };

        let titles = retry_with_backoff(self.retry, ctx, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let body = read_success_body(response, url.as_str()).await?;
                let parsed = serde_json::from_str::<NaverListResponse>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!("naver title list from {url}"),
                        source: e,
                    }
                })?;
                Ok(parsed.into_titles())
            }
        })
        .await?;

        let items: Vec<_> = titles.into_iter().map(NaverTitle::into_item).collect();
        // The weekday endpoint is unpaginated; the finished feed ends on an
        // empty page.
        let has_more = matches!(view, ListingView::Finished) && !items.is_empty();
        Ok(ListingPage { items, has_more })
    }
}
