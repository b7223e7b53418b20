//! Wires [`Storage`]'s verbs onto the [`Dispatcher`] (§4.3, §4.4): the
//! engine never calls `Storage` directly, it dispatches the named
//! events this module registers handlers for, and these handlers are
//! the only code in the crate holding the storage lock.
//!
//! Mirrors the source's handler-name convention
//! (`rehearsal_run_view_logic.py`'s `dispatch(...).get("get_entry", [{}])`
//! / `"filter_entries"` / `"update_entry"`): each handler is registered
//! under a generic bucket name regardless of which event fired it, so
//! `get-flashcard-from-db` and `get-stack-from-db` both land in the
//! `"get_entry"` bucket. One event per (verb, type) pair covers the six
//! kinds the rehearsal flow reads or filters by name directly (§6); a
//! single generic `get-entry`/`add-entry`/`update-entry`/`delete-entry`
//! event covers every other kind, disambiguated by a `"kind"` payload
//! field the same way the source disambiguates its generic handlers by
//! a `table_name` argument.

use std::sync::Arc;

use parking_lot::Mutex;
use studyfrog_dispatcher::{Dispatcher, Payload, GLOBAL};
use studyfrog_model::entity::{Entity, EntityKind};
use studyfrog_model::key;
use studyfrog_storage::Storage;

use crate::events;

/// Subscribes every storage-backed handler the engine needs, all bound
/// in the `GLOBAL` namespace since these serve the whole process, not
/// one caller.
pub fn register(dispatcher: &Dispatcher, storage: Arc<Mutex<Storage>>) {
    for (event, kind) in [
        (events::GET_FLASHCARD_FROM_DB, EntityKind::Flashcard),
        (events::GET_NOTE_FROM_DB, EntityKind::Note),
        (events::GET_QUESTION_FROM_DB, EntityKind::Question),
        (events::GET_STACK_FROM_DB, EntityKind::Stack),
        (events::GET_DIFFICULTY_FROM_DB, EntityKind::Difficulty),
        (events::GET_PRIORITY_FROM_DB, EntityKind::Priority),
    ] {
        let storage = storage.clone();
        dispatcher.subscribe(event, GLOBAL, "get_entry", 0, true, Arc::new(move |payload| get_entry(&storage, kind, payload)));
    }

    {
        let storage = storage.clone();
        dispatcher.subscribe(events::GET_ENTRY, GLOBAL, "get_entry", 0, true, Arc::new(move |payload| {
            let kind = payload_kind(payload)?;
            get_entry(&storage, kind, payload)
        }));
    }

    for (event, kind) in [
        (events::FILTER_DIFFICULTIES_FROM_DB, EntityKind::Difficulty),
        (events::FILTER_PRIORITIES_FROM_DB, EntityKind::Priority),
    ] {
        let storage = storage.clone();
        dispatcher.subscribe(event, GLOBAL, "filter_entries", 0, true, Arc::new(move |payload| filter_entries(&storage, kind, payload)));
    }

    {
        let storage = storage.clone();
        dispatcher.subscribe(events::ADD_ENTRY, GLOBAL, "add_entry", 0, true, Arc::new(move |payload| add_entry(&storage, payload)));
    }
    {
        let storage = storage.clone();
        dispatcher.subscribe(events::UPDATE_ENTRY, GLOBAL, "update_entry", 0, true, Arc::new(move |payload| update_entry(&storage, payload)));
    }
    {
        let storage = storage.clone();
        dispatcher.subscribe(events::DELETE_ENTRY, GLOBAL, "delete_entry", 0, true, Arc::new(move |payload| delete_entry(&storage, payload)));
    }
    {
        let storage = storage.clone();
        dispatcher.subscribe(events::ADD_FLASHCARD, GLOBAL, "add_flashcard", 0, true, Arc::new(move |payload| add_flashcard(&storage, payload)));
    }
}

fn payload_kind(payload: &Payload) -> Result<EntityKind, String> {
    let tag = payload.get("kind").and_then(|v| v.as_str()).ok_or("this event requires a \"kind\" field")?;
    EntityKind::from_tag_str(tag).ok_or_else(|| format!("unknown entity kind {tag:?}"))
}

fn get_entry(storage: &Mutex<Storage>, kind: EntityKind, payload: &Payload) -> Result<serde_json::Value, String> {
    let id = payload.get("id").and_then(|v| v.as_u64()).ok_or("get-entry requires a numeric \"id\"")?;
    let storage = storage.lock();
    match storage.get(kind, id) {
        Some(entity) => serde_json::to_value(entity).map_err(|err| err.to_string()),
        None => Ok(serde_json::Value::Null),
    }
}

fn filter_entries(storage: &Mutex<Storage>, kind: EntityKind, payload: &Payload) -> Result<serde_json::Value, String> {
    let predicate: Vec<(String, serde_json::Value)> =
        payload.iter().filter(|(key, _)| key.as_str() != "table_name").map(|(key, value)| (key.clone(), value.clone())).collect();
    let storage = storage.lock();
    let matches = storage.filter(kind, &predicate);
    serde_json::to_value(matches).map_err(|err| err.to_string())
}

fn add_entry(storage: &Mutex<Storage>, payload: &Payload) -> Result<serde_json::Value, String> {
    let record = payload.get("record").ok_or("add-entry requires a \"record\"")?;
    let entity: Entity = serde_json::from_value(record.clone()).map_err(|err| err.to_string())?;
    let kind = entity.kind();
    let mut storage = storage.lock();
    let id = storage.add(entity).map_err(|err| err.to_string())?;
    Ok(serde_json::Value::String(key::make_key(kind, id)))
}

fn update_entry(storage: &Mutex<Storage>, payload: &Payload) -> Result<serde_json::Value, String> {
    let record = payload.get("record").ok_or("update-entry requires a \"record\"")?;
    let entity: Entity = serde_json::from_value(record.clone()).map_err(|err| err.to_string())?;
    let mut storage = storage.lock();
    let updated = storage.update(entity).map_err(|err| err.to_string())?;
    serde_json::to_value(updated).map_err(|err| err.to_string())
}

fn delete_entry(storage: &Mutex<Storage>, payload: &Payload) -> Result<serde_json::Value, String> {
    let kind = payload_kind(payload)?;
    let id = payload.get("id").and_then(|v| v.as_u64()).ok_or("delete-entry requires a numeric \"id\"")?;
    let mut storage = storage.lock();
    let count = storage.delete(kind, id).map_err(|err| err.to_string())?;
    Ok(serde_json::Value::from(count))
}

/// Handles *add-flashcard*: builds a flashcard via the Model Factory,
/// persists it, and — when the payload names an existing stack — appends
/// the new flashcard's key to that stack's `items` (§8 scenario 2:
/// *create-stack-then-flashcard*). A stack key that doesn't resolve is
/// logged and skipped, matching invariant 3's dangling-reference
/// tolerance rather than failing the whole operation.
fn add_flashcard(storage: &Mutex<Storage>, payload: &Payload) -> Result<serde_json::Value, String> {
    let front = string_field(payload, "front").ok_or("add-flashcard requires \"front\"")?;
    let back = string_field(payload, "back").ok_or("add-flashcard requires \"back\"")?;
    let difficulty = string_field(payload, "difficulty");
    let priority = string_field(payload, "priority");
    let subject = string_field(payload, "subject");
    let teacher = string_field(payload, "teacher");
    let tags = string_list(payload, "tags");
    let customfields = string_list(payload, "customfields");
    let stack_key = string_field(payload, "stack");

    let entity = studyfrog_model::factory::flashcard(front, back, difficulty, priority, subject, teacher, tags, customfields);
    let mut storage = storage.lock();
    let id = storage.add(entity).map_err(|err| err.to_string())?;
    let flashcard_key = key::make_key(EntityKind::Flashcard, id);

    if let Some(stack_key) = stack_key {
        match storage.get_by_key(&stack_key).cloned() {
            Some(Entity::Stack(mut stack)) => {
                stack.items.push(flashcard_key.clone());
                storage.update(Entity::Stack(stack)).map_err(|err| err.to_string())?;
            }
            Some(_) => tracing::warn!(stack_key, "add-flashcard: key did not resolve to a stack"),
            None => tracing::warn!(stack_key, "add-flashcard: stack not found"),
        }
    }

    Ok(serde_json::Value::String(flashcard_key))
}

fn string_field(payload: &Payload, field: &str) -> Option<String> {
    payload.get(field).and_then(|v| v.as_str()).map(str::to_string)
}

fn string_list(payload: &Payload, field: &str) -> Vec<String> {
    payload
        .get(field)
        .and_then(|v| v.as_array())
        .map(|values| values.iter().filter_map(|v| v.as_str()).map(str::to_string).collect())
        .unwrap_or_default()
}
