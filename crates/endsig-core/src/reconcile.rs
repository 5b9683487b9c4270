//! Snapshot-versus-persisted reconciliation.
//!
//! Everything here is pure: callers read the persisted rows for one source,
//! compute transitions and a [`SyncPlan`] from them, and hand the plan to the
//! persistence layer. Transitions must be computed from rows read before any
//! write of the current run.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::content::{ContentItem, ContentMeta, ContentStatus, Snapshot};

/// Fixed `content_type` tag for every row this crawler writes.
pub const CONTENT_TYPE_WEBTOON: &str = "webtoon";

/// A stored `contents` row for one source, keyed by `content_id` in
/// [`PersistedState`].
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedContent {
    pub title: String,
    /// `None` when the stored label is not a recognised status.
    pub status: Option<ContentStatus>,
    pub meta: serde_json::Value,
}

pub type PersistedState = HashMap<String, PersistedContent>;

/// One row to write: the fully recomputed state of a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWrite {
    pub content_id: String,
    pub title: String,
    pub status: ContentStatus,
    pub meta: ContentMeta,
}

/// Minimal write set for one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub source: String,
    pub updates: Vec<ContentWrite>,
    pub inserts: Vec<ContentWrite>,
}

impl SyncPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.inserts.is_empty()
    }
}

/// Ids whose persisted status was not `finished` and that are now in the
/// snapshot's finished set. Ids with no persisted row are never transitions.
#[must_use]
pub fn diff_transitions(persisted: &PersistedState, snapshot: &Snapshot) -> BTreeSet<String> {
    persisted
        .iter()
        .filter(|(id, row)| {
            row.status != Some(ContentStatus::Finished) && snapshot.finished.contains_key(*id)
        })
        .map(|(id, _)| id.clone())
        .collect()
}

/// Computes the inserts and the changed-row updates that bring `persisted`
/// in line with `snapshot`.
///
/// Existing rows are updated only when title, status or meta differ. Inserts
/// are deduplicated by `(content_id, source)` so the insert count reflects
/// genuinely new rows.
#[must_use]
pub fn plan_sync(source: &str, persisted: &PersistedState, snapshot: &Snapshot) -> SyncPlan {
    let mut plan = SyncPlan {
        source: source.to_string(),
        ..SyncPlan::default()
    };
    let mut queued: HashSet<(&str, &str)> = HashSet::new();

    for (id, item) in &snapshot.all {
        let write = build_write(id, item, snapshot.status_of(id));

        match persisted.get(id) {
            Some(existing) => {
                if row_differs(existing, &write) {
                    plan.updates.push(write);
                }
            }
            None => {
                if queued.insert((id.as_str(), source)) {
                    plan.inserts.push(write);
                }
            }
        }
    }

    plan
}

fn build_write(id: &str, item: &ContentItem, status: ContentStatus) -> ContentWrite {
    ContentWrite {
        content_id: id.to_string(),
        title: item.title.clone(),
        status,
        meta: ContentMeta::from_item(item),
    }
}

/// Stored meta that does not decode into the current shape (for example a
/// legacy flat document) always counts as different.
fn row_differs(existing: &PersistedContent, write: &ContentWrite) -> bool {
    if existing.title != write.title || existing.status != Some(write.status) {
        return true;
    }
    serde_json::from_value::<ContentMeta>(existing.meta.clone())
        .map_or(true, |stored| stored != write.meta)
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
