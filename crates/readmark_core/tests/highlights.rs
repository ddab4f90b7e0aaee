use readmark_core::{HighlightManager, ManualClock, MemorySlotStore, RecordId, SlotStore};
use std::rc::Rc;

fn manager(store: &MemorySlotStore) -> HighlightManager<&MemorySlotStore> {
    HighlightManager::load(store, "reader_highlights", Rc::new(ManualClock::new(1_000)))
}

#[test]
fn for_chapter_returns_matching_records_in_insertion_order() {
    let store = MemorySlotStore::new();
    let mut highlights = manager(&store);

    let a = highlights.add(1, "first in one");
    let _b = highlights.add(2, "first in two");
    let c = highlights.add_with_color(1, "second in one", "blue");
    let _d = highlights.add(3, "only in three");
    let e = highlights.add(1, "third in one");

    let chapter_one = highlights.for_chapter(1);
    let ids: Vec<&RecordId> = chapter_one.iter().map(|highlight| &highlight.id).collect();
    assert_eq!(ids, vec![&a.id, &c.id, &e.id]);
    assert!(chapter_one.iter().all(|highlight| highlight.chapter_index == 1));
    assert!(highlights.for_chapter(4).is_empty());
}

#[test]
fn add_then_remove_restores_previous_collection() {
    let store = MemorySlotStore::new();
    let mut highlights = manager(&store);
    highlights.add(0, "keep me");
    let before = highlights.all();
    let persisted_before = store.read("reader_highlights").unwrap();

    let added = highlights.add(0, "temporary");
    assert!(highlights.remove(&added.id));

    assert_eq!(highlights.all(), before);
    assert_eq!(store.read("reader_highlights").unwrap(), persisted_before);
}

#[test]
fn removing_unknown_id_is_a_silent_no_op_that_still_persists() {
    let store = MemorySlotStore::new();
    let mut highlights = manager(&store);
    highlights.add(0, "stay");
    let revision = store.revision("reader_highlights").unwrap();

    assert!(!highlights.remove(&RecordId::from("does-not-exist")));
    assert_eq!(highlights.len(), 1);
    assert_eq!(store.revision("reader_highlights").unwrap(), revision + 1);
}

#[test]
fn chapter_snapshot_is_unaffected_by_later_mutations() {
    let store = MemorySlotStore::new();
    let mut highlights = manager(&store);
    let first = highlights.add(2, "snapshot me");

    let snapshot = highlights.for_chapter(2);
    highlights.remove(&first.id);
    highlights.add(2, "new one");

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].text, "snapshot me");
}

#[test]
fn persisted_records_use_camel_case_fields() {
    let store = MemorySlotStore::new();
    let mut highlights = manager(&store);
    let created = highlights.add(6, "sleep regression");

    let raw = store.read("reader_highlights").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["id"], created.id.as_str());
    assert_eq!(json[0]["chapterIndex"], 6);
    assert_eq!(json[0]["text"], "sleep regression");
    assert_eq!(json[0]["color"], "yellow");
    assert_eq!(json[0]["createdAt"], 1_000);
}

#[test]
fn loads_records_written_by_older_clients() {
    let store = MemorySlotStore::new();
    store.seed(
        "reader_highlights",
        r#"[{"id":"lq2x8k1abc","chapterIndex":0,"text":"hi","color":"green","createdAt":5}]"#,
    );

    let mut highlights = manager(&store);
    assert_eq!(highlights.len(), 1);
    assert!(highlights.remove(&RecordId::from("lq2x8k1abc")));
    assert!(highlights.is_empty());
}

#[test]
fn ids_stay_unique_under_a_frozen_clock() {
    let store = MemorySlotStore::new();
    let mut highlights = manager(&store);
    for idx in 0..200 {
        highlights.add(0, format!("span {idx}"));
    }

    let mut ids: Vec<String> = highlights
        .all()
        .into_iter()
        .map(|highlight| highlight.id.to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);
}
