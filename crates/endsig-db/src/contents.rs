//! Database operations for the `contents` table.

use endsig_core::{PersistedContent, PersistedState, SyncPlan, CONTENT_TYPE_WEBTOON};
use sqlx::PgPool;

use crate::DbError;

/// A row from `contents`, as read for reconciliation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentRow {
    pub content_id: String,
    pub source: String,
    pub content_type: String,
    pub title: String,
    pub status: String,
    pub meta: Option<serde_json::Value>,
}

impl ContentRow {
    /// Converts to the reconciler's view. Unrecognised status labels become
    /// `None` so the row is rewritten on the next sync.
    #[must_use]
    pub fn into_persisted(self) -> (String, PersistedContent) {
        let status = self.status.parse().ok();
        (
            self.content_id,
            PersistedContent {
                title: self.title,
                status,
                meta: self.meta.unwrap_or(serde_json::Value::Null),
            },
        )
    }
}

/// Rows written by [`apply_sync_plan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub updated: u64,
    pub inserted: u64,
}

/// Reads every stored row for `source`, keyed by `content_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn load_source_state(pool: &PgPool, source: &str) -> Result<PersistedState, DbError> {
    let rows = sqlx::query_as::<_, ContentRow>(
        "SELECT content_id, source, content_type, title, status, meta \
         FROM contents \
         WHERE source = $1",
    )
    .bind(source)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ContentRow::into_persisted).collect())
}

/// Writes a [`SyncPlan`]: one batched update, then one batched insert, in a
/// single transaction.
///
/// Inserts that collide with an existing `(content_id, source)` are skipped,
/// so `inserted` counts only rows that did not exist.
///
/// # Errors
///
/// Returns [`DbError::Meta`] if a meta document cannot be encoded, or
/// [`DbError::Sqlx`] if either statement fails (the transaction is rolled
/// back).
pub async fn apply_sync_plan(pool: &PgPool, plan: &SyncPlan) -> Result<SyncOutcome, DbError> {
    if plan.is_empty() {
        return Ok(SyncOutcome::default());
    }

    let updates = ColumnBatch::from_writes(&plan.updates)?;
    let inserts = ColumnBatch::from_writes(&plan.inserts)?;

    let mut tx = pool.begin().await?;
    let mut outcome = SyncOutcome::default();

    if !updates.is_empty() {
        outcome.updated = sqlx::query(
            "UPDATE contents AS c \
             SET content_type = $1, title = u.title, status = u.status, meta = u.meta, \
                 updated_at = NOW() \
             FROM UNNEST($2::text[], $3::text[], $4::text[], $5::jsonb[]) \
                  AS u(content_id, title, status, meta) \
             WHERE c.content_id = u.content_id AND c.source = $6",
        )
        .bind(CONTENT_TYPE_WEBTOON)
        .bind(&updates.content_ids)
        .bind(&updates.titles)
        .bind(&updates.statuses)
        .bind(&updates.metas)
        .bind(&plan.source)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    if !inserts.is_empty() {
        outcome.inserted = sqlx::query(
            "INSERT INTO contents (content_id, source, content_type, title, status, meta) \
             SELECT u.content_id, $1, $2, u.title, u.status, u.meta \
             FROM UNNEST($3::text[], $4::text[], $5::text[], $6::jsonb[]) \
                  AS u(content_id, title, status, meta) \
             ON CONFLICT (content_id, source) DO NOTHING",
        )
        .bind(&plan.source)
        .bind(CONTENT_TYPE_WEBTOON)
        .bind(&inserts.content_ids)
        .bind(&inserts.titles)
        .bind(&inserts.statuses)
        .bind(&inserts.metas)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    tracing::debug!(
        source = %plan.source,
        updated = outcome.updated,
        inserted = outcome.inserted,
        "sync plan applied"
    );
    Ok(outcome)
}

/// Parallel column vectors for `UNNEST` binding.
struct ColumnBatch {
    content_ids: Vec<String>,
    titles: Vec<String>,
    statuses: Vec<String>,
    metas: Vec<serde_json::Value>,
}

impl ColumnBatch {
    fn from_writes(writes: &[endsig_core::ContentWrite]) -> Result<Self, DbError> {
        let mut batch = Self {
            content_ids: Vec::with_capacity(writes.len()),
            titles: Vec::with_capacity(writes.len()),
            statuses: Vec::with_capacity(writes.len()),
            metas: Vec::with_capacity(writes.len()),
        };
        for write in writes {
            batch.content_ids.push(write.content_id.clone());
            batch.titles.push(write.title.clone());
            batch.statuses.push(write.status.as_str().to_string());
            batch.metas.push(serde_json::to_value(&write.meta)?);
        }
        Ok(batch)
    }

    fn is_empty(&self) -> bool {
        self.content_ids.is_empty()
    }
}
