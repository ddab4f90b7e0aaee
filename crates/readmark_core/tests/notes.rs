use readmark_core::{ManualClock, MemorySlotStore, Note, NoteManager, RecordId};
use std::rc::Rc;

#[test]
fn add_then_edit_note_scenario() {
    let store = MemorySlotStore::new();
    let clock = Rc::new(ManualClock::new(1_700_000_000_000));
    let mut notes = NoteManager::load(&store, "reader_notes", clock.clone());

    let created = notes.add(3, "remember this");
    let chapter_three = notes.for_chapter(3);
    assert_eq!(chapter_three.len(), 1);
    assert_eq!(chapter_three[0].content, "remember this");
    assert_eq!(chapter_three[0].created_at, chapter_three[0].updated_at);

    clock.advance(1_500);
    notes.update(&created.id, "edited").unwrap();
    let chapter_three = notes.for_chapter(3);
    assert_eq!(chapter_three.len(), 1);
    assert_eq!(chapter_three[0].content, "edited");
    assert!(chapter_three[0].updated_at > chapter_three[0].created_at);
}

#[test]
fn update_touches_only_the_target_note() {
    let store = MemorySlotStore::new();
    let clock = Rc::new(ManualClock::new(10));
    let mut notes = NoteManager::load(&store, "reader_notes", clock.clone());
    notes.add(0, "zero");
    let target = notes.add(1, "one");
    notes.add(1, "one again");
    let before: Vec<Note> = notes.all();

    clock.advance(90);
    let updated = notes.update(&target.id, "one, revised").unwrap();
    assert_eq!(updated.content, "one, revised");
    assert_eq!(updated.updated_at, 100);

    let after = notes.all();
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == target.id {
            assert_eq!(new.id, old.id);
            assert_eq!(new.chapter_index, old.chapter_index);
            assert_eq!(new.created_at, old.created_at);
        } else {
            assert_eq!(new, old);
        }
    }
}

#[test]
fn add_then_remove_restores_previous_collection() {
    let store = MemorySlotStore::new();
    let mut notes = NoteManager::load(&store, "reader_notes", Rc::new(ManualClock::new(0)));
    notes.add(2, "existing");
    let before = notes.all();

    let added = notes.add(2, "short lived");
    assert!(notes.remove(&added.id));
    assert_eq!(notes.all(), before);
    assert!(!notes.remove(&RecordId::from("gone")));
    assert_eq!(notes.all(), before);
}

#[test]
fn interleaved_adds_filter_by_chapter() {
    let store = MemorySlotStore::new();
    let mut notes = NoteManager::load(&store, "reader_notes", Rc::new(ManualClock::new(0)));
    let chapters = [4, 1, 4, 2, 1, 4];
    let created: Vec<Note> = chapters
        .iter()
        .enumerate()
        .map(|(idx, chapter)| notes.add(*chapter, format!("note {idx}")))
        .collect();

    for chapter in [1, 2, 4, 5] {
        let expected: Vec<Note> = created
            .iter()
            .filter(|note| note.chapter_index == chapter)
            .cloned()
            .collect();
        assert_eq!(notes.for_chapter(chapter), expected);
    }
}

#[test]
fn notes_reload_from_slot_and_corrupt_slot_starts_empty() {
    let store = MemorySlotStore::new();
    let clock = Rc::new(ManualClock::new(0));
    let note = {
        let mut notes = NoteManager::load(&store, "reader_notes", clock.clone());
        notes.add(7, "persist me")
    };

    let reloaded = NoteManager::load(&store, "reader_notes", clock.clone());
    assert_eq!(reloaded.get(&note.id), Some(note));

    store.seed("reader_notes", r#"[{"id":"x","chapterIndex":"seven"}]"#);
    let corrupt = NoteManager::load(&store, "reader_notes", clock);
    assert!(corrupt.is_empty());
}
