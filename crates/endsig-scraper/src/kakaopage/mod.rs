//! Listing client for KakaoPage's GraphQL landing endpoints.
//!
//! Per-day series come from the day-of-week layout (day tabs `1..=7` are
//! Monday to Sunday, tab `8` lists resting series). Completed series come from the genre section with
//! `isComplete = true`. Both are paginated by `page`/`size` and signal the
//! last page with `isEnd`.

pub mod types;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::client::{read_success_body, ClientSettings};
use crate::error::ScraperError;
use crate::retry::{retry_with_backoff, PageContext, RetryPolicy};
use crate::source::{ListingLimits, ListingPage, ListingSource, ListingView};
use types::{DayOfWeekData, GenreData, GraphQlResponse, KakaoSection, KakaoSeries};

pub const SOURCE_NAME: &str = "kakaopage";

const REFERER: &str = "https://page.kakao.com/";
const ACCEPT: &str = "application/graphql+json, application/json";

const PAGE_SIZE: u32 = 100;
const WEBTOON_CATEGORY_UID: u32 = 10;
const DAY_OF_WEEK_SCREEN_UID: u32 = 52;
const FINISHED_SECTION_ID: &str = "static-landing-Genre-section-Layout-10-0-view";

/// `(day tab uid, weekday tag)`. Series on the rest tab are classified by
/// their own status badge like any other tab.
const DAY_TABS: [(&str, &str); 8] = [
    ("1", "mon"),
    ("2", "tue"),
    ("3", "wed"),
    ("4", "thu"),
    ("5", "fri"),
    ("6", "sat"),
    ("7", "sun"),
    ("8", "hiatus"),
];

const LIMITS: ListingLimits = ListingLimits {
    weekday_max_pages: 50,
    finished_max_pages: 250,
    finished_max_items: 2000,
};

const DAY_OF_WEEK_QUERY: &str = r"
query staticLandingDayOfWeekLayout($queryInput: StaticLandingDayOfWeekParamInput!) {
  staticLandingDayOfWeekLayout(input: $queryInput) {
    ...Layout
  }
}
fragment Layout on Layout {
  id, type, sections { ...Section }, screenUid
}
fragment Section on Section {
  id, uid, type, title
  ... on StaticLandingDayOfWeekSection {
    isEnd, totalCount
    items: groups {
      items {
        id, title, thumbnail, badgeList, statusBadge, ageGrade, seriesId
        authors { name, type }
      }
    }
  }
}
";

const FINISHED_QUERY: &str = r"
query staticLandingGenreSection($sectionId: ID!, $param: StaticLandingGenreParamInput!) {
  staticLandingGenreSection(sectionId: $sectionId, param: $param) {
    ... on StaticLandingGenreSection {
      isEnd, totalCount
      items: groups {
        items {
          id, title, thumbnail, badgeList, statusBadge, ageGrade, seriesId
          authors { name, type }
        }
      }
    }
  }
}
";

pub struct KakaopageSource {
    client: Client,
    graphql_url: Url,
    retry: RetryPolicy,
}

impl KakaopageSource {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `graphql_url` does not parse,
    /// or [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(graphql_url: &str, settings: &ClientSettings) -> Result<Self, ScraperError> {
        let parsed = Url::parse(graphql_url).map_err(|e| ScraperError::InvalidUrl {
            url: graphql_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client: settings.build_http_client()?,
            graphql_url: parsed,
            retry: settings.retry,
        })
    }

    async fn post_query<T: DeserializeOwned>(
        &self,
        context: &str,
        payload: &serde_json::Value,
    ) -> Result<Option<T>, ScraperError> {
        let url = self.graphql_url.as_str();
        let response = self
            .client
            .post(self.graphql_url.clone())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::REFERER, REFERER)
            .json(payload)
            .send()
            .await?;
        let body = read_success_body(response, url).await?;
        let parsed = serde_json::from_str::<GraphQlResponse<T>>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: context.to_owned(),
                source: e,
            }
        })?;

        if !parsed.errors.is_empty() {
            let message = parsed
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ScraperError::GraphQl {
                context: context.to_owned(),
                message,
            });
        }

        Ok(parsed.data)
    }

    async fn fetch_section(
        &self,
        view: &ListingView,
        page: u32,
    ) -> Result<KakaoSection, ScraperError> {
        let context = format!("{SOURCE_NAME} {view} page {page}");
        match view {
            ListingView::Weekday { key, .. } => {
                let payload = day_of_week_payload(key, page);
                let data: Option<DayOfWeekData> = self.post_query(&context, &payload).await?;
                Ok(data
                    .and_then(|d| d.layout)
                    .and_then(|layout| layout.sections.into_iter().next())
                    .unwrap_or_default())
            }
            ListingView::Finished => {
                let payload = finished_payload(page);
                let data: Option<GenreData> = self.post_query(&context, &payload).await?;
                Ok(data.and_then(|d| d.section).unwrap_or_default())
            }
        }
    }
}

fn day_of_week_payload(day_tab_uid: &str, page: u32) -> serde_json::Value {
    json!({
        "query": DAY_OF_WEEK_QUERY,
        "variables": {
            "queryInput": {
                "categoryUid": WEBTOON_CATEGORY_UID,
                "dayTabUid": day_tab_uid,
                "type": "Layout",
                "screenUid": DAY_OF_WEEK_SCREEN_UID,
                "page": page,
                "size": PAGE_SIZE,
            }
        }
    })
}

fn finished_payload(page: u32) -> serde_json::Value {
    json!({
        "query": FINISHED_QUERY,
        "variables": {
            "sectionId": FINISHED_SECTION_ID,
            "param": {
                "categoryUid": WEBTOON_CATEGORY_UID,
                "page": page,
                "size": PAGE_SIZE,
                "sortType": "view",
                "isComplete": true,
            }
        }
    })
}

#[async_trait]
impl ListingSource for KakaopageSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn weekday_views(&self) -> Vec<ListingView> {
        DAY_TABS
            .iter()
            .map(|(uid, tag)| ListingView::weekday(uid, tag))
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
        let label = view.to_string();
        let ctx = PageContext {
            source_name: SOURCE_NAME,
            view: &label,
            page,
        };

        let section = retry_with_backoff(self.retry, ctx, || self.fetch_section(view, page)).await?;
        let (series, has_more) = section.into_page();
        Ok(ListingPage {
            items: series.into_iter().map(KakaoSeries::into_item).collect(),
            has_more,
        })
    }
}
