//! KakaoPage GraphQL response types.
//!
//! The day-of-week landing nests series under
//! `staticLandingDayOfWeekLayout.sections[0].items[0].items`; the genre
//! landing used for completed series nests them under
//! `staticLandingGenreSection.items[0].items`. Both sections report `isEnd`
//! on the last page. Missing levels are treated as an empty page.

use endsig_core::{ContentItem, RawStatus};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DayOfWeekData {
    #[serde(rename = "staticLandingDayOfWeekLayout", default)]
    pub layout: Option<DayOfWeekLayout>,
}

#[derive(Debug, Deserialize)]
pub struct DayOfWeekLayout {
    #[serde(default)]
    pub sections: Vec<KakaoSection>,
}

#[derive(Debug, Deserialize)]
pub struct GenreData {
    #[serde(rename = "staticLandingGenreSection", default)]
    pub section: Option<KakaoSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KakaoSection {
    #[serde(rename = "isEnd", default)]
    pub is_end: Option<bool>,
    #[serde(default)]
    pub items: Vec<KakaoGroup>,
}

#[derive(Debug, Deserialize)]
pub struct KakaoGroup {
    #[serde(default)]
    pub items: Vec<KakaoSeries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoSeries {
    pub series_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub status_badge: Option<String>,
    #[serde(default)]
    pub authors: Vec<KakaoAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct KakaoAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl KakaoSection {
    /// Series of the first group plus whether another page follows.
    #[must_use]
    pub fn into_page(self) -> (Vec<KakaoSeries>, bool) {
        let series = self
            .items
            .into_iter()
            .next()
            .map(|group| group.items)
            .unwrap_or_default();
        let has_more = match self.is_end {
            Some(is_end) => !is_end,
            None => !series.is_empty(),
        };
        (series, has_more)
    }
}

impl KakaoSeries {
    #[must_use]
    pub fn into_item(self) -> ContentItem {
        ContentItem {
            external_id: self.series_id.to_string(),
            title: self.title,
            raw_status: RawStatus::Badge(self.status_badge),
            weekdays: Vec::new(),
            authors: self
                .authors
                .into_iter()
                .filter_map(|a| a.name)
                .map(|name| name.trim().to_owned())
                .filter(|name| !name.is_empty())
                .collect(),
            thumbnail_url: self.thumbnail.filter(|t| !t.is_empty()),
        }
    }
}
