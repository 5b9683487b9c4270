use serde_json::json;

use super::*;
use crate::content::RawStatus;

fn item(id: &str, title: &str, weekdays: &[&str]) -> ContentItem {
    ContentItem {
        external_id: id.to_string(),
        title: title.to_string(),
        raw_status: RawStatus::RestFlag(false),
        weekdays: weekdays.iter().map(|d| (*d).to_string()).collect(),
        authors: vec!["Author".to_string()],
        thumbnail_url: Some(format!("https://img.example/{id}.jpg")),
    }
}

fn persisted_from(write: &ContentWrite) -> PersistedContent {
    PersistedContent {
        title: write.title.clone(),
        status: Some(write.status),
        meta: serde_json::to_value(&write.meta).unwrap(),
    }
}

/// Applies a plan the way the store would, for idempotence checks.
fn apply(state: &mut PersistedState, plan: &SyncPlan) {
    for write in plan.updates.iter().chain(&plan.inserts) {
        state.insert(write.content_id.clone(), persisted_from(write));
    }
}

fn snapshot_with(
    ongoing: &[ContentItem],
    hiatus: &[ContentItem],
    finished: &[ContentItem],
) -> Snapshot {
    let mut snapshot = Snapshot::default();
    for i in ongoing {
        snapshot.ongoing.insert(i.external_id.clone(), i.clone());
    }
    for i in hiatus {
        snapshot.hiatus.insert(i.external_id.clone(), i.clone());
    }
    for i in finished {
        snapshot.finished.insert(i.external_id.clone(), i.clone());
    }
    for i in finished.iter().chain(hiatus).chain(ongoing) {
        snapshot.all.insert(i.external_id.clone(), i.clone());
    }
    snapshot
}

fn row(title: &str, status: ContentStatus) -> PersistedContent {
    PersistedContent {
        title: title.to_string(),
        status: Some(status),
        meta: json!({}),
    }
}

#[test]
fn ongoing_to_finished_is_a_transition() {
    let mut persisted = PersistedState::new();
    persisted.insert("X".into(), row("X", ContentStatus::Ongoing));
    let snapshot = snapshot_with(&[], &[], &[item("X", "X", &[])]);

    let newly = diff_transitions(&persisted, &snapshot);
    assert!(newly.contains("X"));
}

#[test]
fn hiatus_to_finished_is_a_transition() {
    let mut persisted = PersistedState::new();
    persisted.insert("H".into(), row("H", ContentStatus::Hiatus));
    let snapshot = snapshot_with(&[], &[], &[item("H", "H", &[])]);

    assert_eq!(
        diff_transitions(&persisted, &snapshot),
        BTreeSet::from(["H".to_string()])
    );
}

#[test]
fn already_finished_is_not_a_transition() {
    let mut persisted = PersistedState::new();
    persisted.insert("X".into(), row("X", ContentStatus::Finished));
    let snapshot = snapshot_with(&[], &[], &[item("X", "X", &[])]);

    assert!(diff_transitions(&persisted, &snapshot).is_empty());
}

#[test]
fn unpersisted_finished_item_is_not_a_transition() {
    let persisted = PersistedState::new();
    let snapshot = snapshot_with(&[], &[], &[item("new", "New", &[])]);

    assert!(diff_transitions(&persisted, &snapshot).is_empty());
}

#[test]
fn first_sync_inserts_every_item_with_its_status() {
    let snapshot = snapshot_with(
        &[item("1", "A", &["mon"])],
        &[item("2", "B", &["tue"])],
        &[item("3", "C", &[])],
    );

    let plan = plan_sync("naver_webtoon", &PersistedState::new(), &snapshot);

    assert!(plan.updates.is_empty());
    assert_eq!(plan.inserts.len(), 3);
    let status_of = |id: &str| {
        plan.inserts
            .iter()
            .find(|w| w.content_id == id)
            .map(|w| w.status)
    };
    assert_eq!(status_of("1"), Some(ContentStatus::Ongoing));
    assert_eq!(status_of("2"), Some(ContentStatus::Hiatus));
    assert_eq!(status_of("3"), Some(ContentStatus::Finished));
}

#[test]
fn second_sync_over_unchanged_snapshot_writes_nothing() {
    let snapshot = snapshot_with(
        &[item("1", "A", &["mon", "thu"])],
        &[item("2", "B", &["tue"])],
        &[item("3", "C", &[])],
    );
    let mut state = PersistedState::new();

    let first = plan_sync("kakaopage", &state, &snapshot);
    assert_eq!(first.inserts.len(), 3);
    apply(&mut state, &first);

    let second = plan_sync("kakaopage", &state, &snapshot);
    assert!(second.is_empty(), "expected no writes, got: {second:?}");
}

#[test]
fn status_change_produces_single_update() {
    let snapshot = snapshot_with(&[item("2", "B", &["wed"])], &[], &[]);
    let mut state = PersistedState::new();
    let plan = plan_sync("s", &state, &snapshot);
    apply(&mut state, &plan);

    let finished = snapshot_with(&[], &[], &[item("2", "B", &[])]);
    let plan = plan_sync("s", &state, &finished);

    assert!(plan.inserts.is_empty());
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].status, ContentStatus::Finished);
    assert!(plan.updates[0].meta.attributes.weekdays.is_empty());
}

#[test]
fn title_change_produces_update() {
    let snapshot = snapshot_with(&[item("1", "Old", &["mon"])], &[], &[]);
    let mut state = PersistedState::new();
    let plan = plan_sync("s", &state, &snapshot);
    apply(&mut state, &plan);

    let renamed = snapshot_with(&[item("1", "New", &["mon"])], &[], &[]);
    let plan = plan_sync("s", &state, &renamed);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].title, "New");
}

#[test]
fn weekday_change_produces_update() {
    let snapshot = snapshot_with(&[item("1", "A", &["mon"])], &[], &[]);
    let mut state = PersistedState::new();
    let plan = plan_sync("s", &state, &snapshot);
    apply(&mut state, &plan);

    let moved = snapshot_with(&[item("1", "A", &["fri", "mon"])], &[], &[]);
    let plan = plan_sync("s", &state, &moved);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(
        plan.updates[0].meta.attributes.weekdays,
        vec!["fri".to_string(), "mon".to_string()]
    );
}

#[test]
fn legacy_flat_meta_is_rewritten() {
    let snapshot = snapshot_with(&[item("1", "A", &["mon"])], &[], &[]);
    let mut state = PersistedState::new();
    state.insert(
        "1".into(),
        PersistedContent {
            title: "A".into(),
            status: Some(ContentStatus::Ongoing),
            meta: json!({"author": "Author", "weekday": "mon"}),
        },
    );

    let plan = plan_sync("s", &state, &snapshot);
    assert_eq!(plan.updates.len(), 1);
}

#[test]
fn unrecognised_stored_status_is_rewritten() {
    let snapshot = snapshot_with(&[item("1", "A", &["mon"])], &[], &[]);
    let mut state = PersistedState::new();
    let plan = plan_sync("s", &state, &snapshot);
    apply(&mut state, &plan);
    if let Some(existing) = state.get_mut("1") {
        existing.status = None;
    }

    let plan = plan_sync("s", &state, &snapshot);
    assert_eq!(plan.updates.len(), 1);
}

#[test]
fn rows_missing_from_snapshot_are_left_alone() {
    let mut state = PersistedState::new();
    state.insert("gone".into(), row("Gone", ContentStatus::Ongoing));
    let snapshot = snapshot_with(&[item("1", "A", &["mon"])], &[], &[]);

    let plan = plan_sync("s", &state, &snapshot);
    assert!(plan.updates.is_empty());
    assert_eq!(plan.inserts.len(), 1);
    assert_eq!(plan.inserts[0].content_id, "1");
}
