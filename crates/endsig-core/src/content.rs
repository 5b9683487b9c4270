//! Content domain types shared by the scraper, the reconciler and the
//! persistence layer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Badge text a source uses to mark a series as resting this week.
pub const HIATUS_BADGE_MARKER: &str = "휴재";

/// Publication state of one tracked series. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Ongoing,
    Hiatus,
    Finished,
}

impl ContentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Ongoing => "ongoing",
            ContentStatus::Hiatus => "hiatus",
            ContentStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = String;

    /// Accepts the canonical English labels as well as the Korean labels
    /// written by earlier deployments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ongoing" | "연재중" => Ok(ContentStatus::Ongoing),
            "hiatus" | "휴재" => Ok(ContentStatus::Hiatus),
            "finished" | "완결" => Ok(ContentStatus::Finished),
            other => Err(format!("unknown content status \"{other}\"")),
        }
    }
}

/// Source-specific signal describing whether a series is resting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus {
    /// Explicit boolean resting flag.
    RestFlag(bool),
    /// Free-form status badge; resting when it contains [`HIATUS_BADGE_MARKER`].
    Badge(Option<String>),
}

impl RawStatus {
    #[must_use]
    pub fn is_resting(&self) -> bool {
        match self {
            RawStatus::RestFlag(rest) => *rest,
            RawStatus::Badge(badge) => badge
                .as_deref()
                .is_some_and(|b| b.contains(HIATUS_BADGE_MARKER)),
        }
    }
}

/// One listing entry as seen in a source snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    /// Source-assigned identifier; unique only within its source.
    pub external_id: String,
    pub title: String,
    pub raw_status: RawStatus,
    /// Weekday tags this item was listed under, sorted and unique. Empty for
    /// items only seen in the finished feed.
    pub weekdays: Vec<String>,
    pub authors: Vec<String>,
    pub thumbnail_url: Option<String>,
}

/// Result of one aggregation pass for one source.
///
/// `ongoing`, `hiatus` and `finished` are disjoint; `all` is their union.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub ongoing: BTreeMap<String, ContentItem>,
    pub hiatus: BTreeMap<String, ContentItem>,
    pub finished: BTreeMap<String, ContentItem>,
    pub all: BTreeMap<String, ContentItem>,
}

impl Snapshot {
    /// Classification with priority finished > hiatus > ongoing.
    #[must_use]
    pub fn status_of(&self, id: &str) -> ContentStatus {
        if self.finished.contains_key(id) {
            ContentStatus::Finished
        } else if self.hiatus.contains_key(id) {
            ContentStatus::Hiatus
        } else {
            ContentStatus::Ongoing
        }
    }
}

/// The `meta` document stored per content row. Its JSON shape is read by
/// the web layer and must stay stable:
/// `{"common": {"authors": [...], "thumbnail_url": ...}, "attributes": {"weekdays": [...]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMeta {
    pub common: CommonMeta,
    pub attributes: MetaAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonMeta {
    pub authors: Vec<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAttributes {
    pub weekdays: Vec<String>,
}

impl ContentMeta {
    #[must_use]
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            common: CommonMeta {
                authors: item.authors.clone(),
                thumbnail_url: item.thumbnail_url.clone(),
            },
            attributes: MetaAttributes {
                weekdays: item.weekdays.clone(),
            },
        }
    }
}
