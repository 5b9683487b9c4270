//! Naver Webtoon title-list response types.
//!
//! ## Observed shape
//!
//! Both `/weekday` and `/finished` return an object whose title array sits
//! under `titleList`. Some older responses use `list` instead, so both keys
//! are accepted and `titleList` wins when both are present.
//!
//! `author` is a single display string; collaborations are joined with `/`
//! (`"글작가 / 그림작가"`). `rest` is `true` while the series is on a break.

use endsig_core::{ContentItem, RawStatus};
use serde::Deserialize;

use crate::client::split_authors;

#[derive(Debug, Deserialize)]
pub struct NaverListResponse {
    #[serde(rename = "titleList", default)]
    pub title_list: Option<Vec<NaverTitle>>,
    #[serde(default)]
    pub list: Option<Vec<NaverTitle>>,
}

impl NaverListResponse {
    #[must_use]
    pub fn into_titles(self) -> Vec<NaverTitle> {
        self.title_list.or(self.list).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaverTitle {
    pub title_id: i64,
    pub title_name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub rest: bool,
}

impl NaverTitle {
    #[must_use]
    pub fn into_item(self) -> ContentItem {
        ContentItem {
            external_id: self.title_id.to_string(),
            title: self.title_name,
            raw_status: RawStatus::RestFlag(self.rest),
            weekdays: Vec::new(),
            authors: self.author.as_deref().map(split_authors).unwrap_or_default(),
            thumbnail_url: self.thumbnail_url.filter(|u| !u.is_empty()),
        }
    }
}
