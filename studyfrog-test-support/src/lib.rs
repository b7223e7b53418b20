//! Shared builders for tests across the StudyFrog workspace: a
//! throwaway-directory-backed [`studyfrog_storage::Storage`], a
//! [`studyfrog_dispatcher::Dispatcher`] that records every event it
//! sees, plus small helpers for wiring up flashcards and stacks without
//! repeating the factory/storage boilerplate in every crate's test
//! module.

use std::sync::{Arc, Mutex};

use studyfrog_dispatcher::{Dispatcher, Payload, GLOBAL};
use studyfrog_model::entity::{Entity, EntityKind};
use studyfrog_model::factory;
use studyfrog_storage::{Storage, StorageConfig};

/// A [`Storage`] backed by a temporary directory that is removed when
/// the returned [`tempfile::TempDir`] guard drops. Seeded exactly like a
/// fresh application install (default difficulties, priorities, user).
pub fn temp_storage() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = StorageConfig { data_dir: dir.path().to_path_buf() };
    let storage = Storage::open(&config).expect("open seeded storage");
    (dir, storage)
}

/// The canonical key of a seeded difficulty level (`"easy"`, `"medium"`,
/// or `"hard"`). Panics if the name is not one of the seeded levels,
/// since every test calling this expects the seed to have run.
pub fn difficulty_key(storage: &Storage, name: &str) -> String {
    let predicate = vec![("name".to_string(), serde_json::Value::String(name.to_string()))];
    storage
        .filter(EntityKind::Difficulty, &predicate)
        .first()
        .and_then(|entity| entity.key())
        .unwrap_or_else(|| panic!("no seeded difficulty named {name:?}"))
        .to_string()
}

/// Adds a flashcard with the given front/back, optionally pre-assigned
/// to a seeded difficulty level by name, and returns its canonical key.
pub fn add_flashcard(storage: &mut Storage, front: &str, back: &str, difficulty_name: Option<&str>) -> String {
    let difficulty = difficulty_name.map(|name| difficulty_key(storage, name));
    let entity = factory::flashcard(front, back, difficulty, None, None, None, vec![], vec![]);
    let id = storage.add(entity).expect("add flashcard");
    studyfrog_model::key::make_key(EntityKind::Flashcard, id)
}

/// Adds a stack containing the given item keys and returns its key.
pub fn add_stack(storage: &mut Storage, name: &str, items: Vec<String>) -> String {
    let entity = factory::stack(name, items, vec![], None, None, None, None, None, None, vec![]);
    let id = storage.add(entity).expect("add stack");
    studyfrog_model::key::make_key(EntityKind::Stack, id)
}

/// Fetches a flashcard's current `difficulty` key, or `None` if absent
/// or the key does not resolve to a flashcard.
pub fn flashcard_difficulty(storage: &Storage, key: &str) -> Option<String> {
    match storage.get_by_key(key) {
        Some(Entity::Flashcard(card)) => card.difficulty.clone(),
        _ => None,
    }
}

/// A fresh [`Dispatcher`] with a single `GLOBAL`-namespace handler
/// bound to every event name in `events`, recording each firing's event
/// name and payload in registration order. Callers assert against the
/// returned log instead of re-registering a capturing closure in every
/// test that only wants to know whether and with what an event fired.
pub fn recording_dispatcher(events: &[&str]) -> (Dispatcher, Arc<Mutex<Vec<(String, Payload)>>>) {
    let dispatcher = Dispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    for event in events {
        let log = log.clone();
        let event_name = event.to_string();
        dispatcher.subscribe(
            event_name.clone(),
            GLOBAL,
            format!("record_{event_name}"),
            0,
            true,
            Arc::new(move |payload| {
                log.lock().unwrap().push((event_name.clone(), payload.clone()));
                Ok(serde_json::Value::Null)
            }),
        );
    }
    (dispatcher, log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_storage_is_seeded_with_three_difficulties() {
        let (_guard, storage) = temp_storage();
        assert_eq!(storage.get_all(EntityKind::Difficulty).len(), 3);
    }

    #[test]
    fn add_flashcard_assigns_the_named_difficulty() {
        let (_guard, mut storage) = temp_storage();
        let key = add_flashcard(&mut storage, "Q", "A", Some("easy"));
        let expected = difficulty_key(&storage, "easy");
        assert_eq!(flashcard_difficulty(&storage, &key), Some(expected));
    }

    #[test]
    fn add_stack_carries_its_item_keys_in_order() {
        let (_guard, mut storage) = temp_storage();
        let a = add_flashcard(&mut storage, "Q1", "A1", None);
        let b = add_flashcard(&mut storage, "Q2", "A2", None);
        let stack_key = add_stack(&mut storage, "Biology", vec![a.clone(), b.clone()]);
        match storage.get_by_key(&stack_key) {
            Some(Entity::Stack(stack)) => assert_eq!(stack.items, vec![a, b]),
            _ => panic!("expected a stack"),
        }
    }

    #[test]
    fn recording_dispatcher_captures_only_the_events_it_was_bound_to() {
        let (dispatcher, log) = recording_dispatcher(&["load-item", "finish"]);

        dispatcher.dispatch("load-item", GLOBAL, &Payload::new());
        dispatcher.dispatch("ignored-event", GLOBAL, &Payload::new());
        dispatcher.dispatch("finish", GLOBAL, &Payload::new());

        let fired: Vec<String> = log.lock().unwrap().iter().map(|(event, _)| event.clone()).collect();
        assert_eq!(fired, vec!["load-item", "finish"]);
    }
}
