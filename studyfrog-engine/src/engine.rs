//! The rehearsal run engine: setup, cursor state machine, and
//! termination (§4.5). One engine owns the single process-wide active
//! run, per §5's single-threaded cooperative model.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use studyfrog_dispatcher::{Dispatcher, Payload, GLOBAL};
use studyfrog_model::entity::{Action, ActionKind, Duration, Entity, EntityKind, RunConfiguration};
use studyfrog_model::{factory, key, Error, Result};
use studyfrog_storage::Storage;

use crate::cursor::Cursor;
use crate::events;
use crate::item;
use crate::setup::SetupForm;

struct ItemRecord {
    item_key: String,
    actions: Vec<Action>,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

struct ActiveRun {
    run_key: String,
    start: DateTime<Utc>,
    items: Vec<String>,
    cursor: Cursor,
    records: HashMap<usize, ItemRecord>,
    time_limit: Option<chrono::Duration>,
}

/// Coordinates one rehearsal run at a time. Every storage access is
/// routed through the shared [`Dispatcher`] (§4.4: "the dispatcher is
/// the only allowed cross-layer call path in the core") rather than
/// calling [`Storage`] directly; see `storage_bridge.rs` for the
/// handlers this engine dispatches against.
pub struct Engine {
    storage: Arc<Mutex<Storage>>,
    dispatcher: Arc<Dispatcher>,
    active: Mutex<Option<ActiveRun>>,
    recovery_dir: PathBuf,
}

impl Engine {
    pub fn new(storage: Storage, dispatcher: Arc<Dispatcher>, recovery_dir: impl Into<PathBuf>) -> Self {
        let storage = Arc::new(Mutex::new(storage));
        crate::storage_bridge::register(&dispatcher, storage.clone());
        Self {
            storage,
            dispatcher,
            active: Mutex::new(None),
            recovery_dir: recovery_dir.into(),
        }
    }

    /// Whether a run is currently in progress.
    pub fn has_active_run(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Checks whether the active run's configured time limit has
    /// elapsed and, if so, terminates it (§4.5.1, §5: the time limit is
    /// "the first-to-occur of (cursor exhaustion, time-limit reached)",
    /// polled by the UI between user interactions rather than
    /// preempted — this engine never starts a timer of its own).
    ///
    /// Returns `Ok(true)` if the poll found the limit exceeded and
    /// terminated the run, `Ok(false)` if no run is active, no time
    /// limit was configured, or the limit has not yet elapsed.
    pub fn check_time_limit(&self) -> Result<bool> {
        let exceeded = {
            let active_guard = self.active.lock();
            match active_guard.as_ref() {
                Some(active) => match active.time_limit {
                    Some(limit) => Utc::now() - active.start >= limit,
                    None => false,
                },
                None => false,
            }
        };
        if exceeded {
            self.finish()?;
        }
        Ok(exceeded)
    }

    /// Starts a new rehearsal run (§4.5.1). Rejects a concurrent start
    /// while a run is already active, per the resolved open question in
    /// §9: the source overwrites silently, which this implementation
    /// treats as a bug.
    pub fn start(&self, form: SetupForm) -> Result<String> {
        form.validate()?;

        let mut active_guard = self.active.lock();
        if active_guard.is_some() {
            return Err(Error::validation("a rehearsal run is already active; finish or cancel it first"));
        }

        let configuration = RunConfiguration {
            difficulty: form.difficulty.clone(),
            priority: form.priority.clone(),
            item_order_randomization_enabled: form.item_order_randomization_enabled,
            time_counter_enabled: form.time_counter_enabled,
            time_limit_enabled: form.time_limit_enabled,
            time_limit_minutes: form.time_limit_minutes,
        };

        let run_entity = factory::rehearsal_run(form.stacks.clone(), configuration);
        let run_key = self.persist_add(run_entity).map_err(|err| {
            tracing::error!(error = %err, "storage fault during rehearsal run setup");
            err
        })?;
        let (_, run_id) = key::parse_key(&run_key).ok_or_else(|| Error::programmer("add-entry returned a malformed key"))?;

        let mut items = self.expand_stacks(&form.stacks);
        if let Some(difficulty) = &form.difficulty {
            items.retain(|item_key| {
                self.fetch_by_key(item_key).as_ref().and_then(item::difficulty_key).map(|k| k == difficulty).unwrap_or(false)
            });
        }
        if let Some(priority) = &form.priority {
            items.retain(|item_key| {
                self.fetch_by_key(item_key).as_ref().and_then(item::priority_key).map(|k| k == priority).unwrap_or(false)
            });
        }
        if form.item_order_randomization_enabled {
            key::shuffle(&mut items);
        }

        if items.is_empty() {
            self.persist_delete(EntityKind::RehearsalRun, run_id)?;
            self.dispatch(events::VALIDATION_TOAST, payload([("message", "no items matched the selected filters")]));
            return Err(Error::validation("the selected stacks and filters produced an empty item list"));
        }

        if let Some(Entity::RehearsalRun(mut run)) = self.fetch_by_key(&run_key) {
            run.items = items.clone();
            self.persist_update(Entity::RehearsalRun(run))?;
        }

        let start = Utc::now();
        let time_limit = form
            .time_limit_enabled
            .then(|| chrono::Duration::minutes(form.time_limit_minutes as i64));
        *active_guard = Some(ActiveRun {
            run_key: run_key.clone(),
            start,
            items: items.clone(),
            cursor: Cursor::Loaded(0),
            records: HashMap::new(),
            time_limit,
        });

        self.load_current(&mut active_guard);
        drop(active_guard);
        Ok(run_key)
    }

    fn expand_stacks(&self, stack_keys: &[String]) -> Vec<String> {
        let mut items = Vec::new();
        for stack_key in stack_keys {
            match self.fetch_by_key(stack_key) {
                Some(Entity::Stack(stack)) => items.extend(stack.items.iter().cloned()),
                Some(_) => tracing::warn!(stack_key, "key did not resolve to a stack during setup"),
                None => tracing::warn!(stack_key, "stack not found during setup expansion"),
            }
        }
        items
    }

    fn load_current(&self, active_guard: &mut Option<ActiveRun>) {
        let Some(active) = active_guard.as_mut() else { return };
        let Cursor::Loaded(index) = active.cursor else { return };
        let item_key = active.items[index].clone();
        active.records.entry(index).or_insert_with(|| ItemRecord {
            item_key: item_key.clone(),
            actions: Vec::new(),
            start: Utc::now(),
            end: None,
        });
        let resolved = self.resolve_for_display(&item_key);
        self.dispatch(events::LOAD_ITEM, payload_value([("item", resolved.unwrap_or(serde_json::Value::Null))]));
    }

    /// Resolves `key` to its full display payload: the item itself, plus
    /// (for a question) every answer it references, mirroring the
    /// source's *load-rehearsal-view-form* payload.
    fn resolve_for_display(&self, key: &str) -> Option<serde_json::Value> {
        let entity = self.fetch_by_key(key)?;
        let mut value = serde_json::to_value(&entity).ok()?;
        if let Entity::Question(question) = &entity {
            let answers: Vec<serde_json::Value> = question
                .answers
                .iter()
                .filter_map(|answer_key| self.fetch_by_key(answer_key))
                .filter_map(|answer| serde_json::to_value(&answer).ok())
                .collect();
            if let Some(object) = value.as_object_mut() {
                object.insert("resolved_answers".to_string(), serde_json::Value::Array(answers));
            }
        }
        Some(value)
    }

    /// Looks up an entity by kind and id via the matching `get-*-from-db`
    /// event (or the generic `get-entry` event for kinds §6 does not
    /// name one for), reading the result back out of the `"get_entry"`
    /// response bucket.
    fn fetch(&self, kind: EntityKind, id: u64) -> Option<Entity> {
        let event = match kind {
            EntityKind::Flashcard => events::GET_FLASHCARD_FROM_DB,
            EntityKind::Note => events::GET_NOTE_FROM_DB,
            EntityKind::Question => events::GET_QUESTION_FROM_DB,
            EntityKind::Stack => events::GET_STACK_FROM_DB,
            EntityKind::Difficulty => events::GET_DIFFICULTY_FROM_DB,
            EntityKind::Priority => events::GET_PRIORITY_FROM_DB,
            _ => events::GET_ENTRY,
        };
        let mut pairs = payload_value([("id", serde_json::Value::from(id))]);
        if event == events::GET_ENTRY {
            pairs.insert("kind".to_string(), serde_json::Value::String(kind.tag_str().to_string()));
        }
        let response = self.dispatch(event, pairs);
        let value = response.first_result("get_entry")?;
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    fn fetch_by_key(&self, key: &str) -> Option<Entity> {
        let (kind, id) = key::parse_key(key)?;
        self.fetch(kind, id)
    }

    fn filter(&self, event: &str, predicate: Vec<(String, serde_json::Value)>) -> Vec<Entity> {
        let payload: Payload = predicate.into_iter().collect();
        let response = self.dispatch(event, payload);
        response.first_result("filter_entries").and_then(|value| serde_json::from_value::<Vec<Entity>>(value.clone()).ok()).unwrap_or_default()
    }

    /// Persists a freshly built entity via *add-entry*, returning its
    /// canonical key.
    fn persist_add(&self, entity: Entity) -> Result<String> {
        let record = serde_json::to_value(&entity)?;
        let response = self.dispatch(events::ADD_ENTRY, payload_value([("record", record)]));
        match response.first_result("add_entry") {
            Some(value) => value.as_str().map(str::to_string).ok_or_else(|| Error::programmer("add-entry handler returned a non-string key")),
            None => {
                Err(Error::DispatchHandler { handler: "add_entry".to_string(), message: "no storage handler registered for add-entry".to_string() })
            }
        }
    }

    /// Persists a changed entity via *update-entry*.
    fn persist_update(&self, entity: Entity) -> Result<Entity> {
        let record = serde_json::to_value(&entity)?;
        let response = self.dispatch(events::UPDATE_ENTRY, payload_value([("record", record)]));
        match response.first_result("update_entry") {
            Some(value) => serde_json::from_value(value.clone()).map_err(Error::from),
            None => Err(Error::DispatchHandler {
                handler: "update_entry".to_string(),
                message: "no storage handler registered for update-entry".to_string(),
            }),
        }
    }

    fn persist_delete(&self, kind: EntityKind, id: u64) -> Result<u64> {
        let payload =
            payload_value([("kind", serde_json::Value::String(kind.tag_str().to_string())), ("id", serde_json::Value::from(id))]);
        let response = self.dispatch(events::DELETE_ENTRY, payload);
        match response.first_result("delete_entry") {
            Some(value) => value.as_u64().ok_or_else(|| Error::programmer("delete-entry handler returned a non-numeric count")),
            None => Err(Error::DispatchHandler {
                handler: "delete_entry".to_string(),
                message: "no storage handler registered for delete-entry".to_string(),
            }),
        }
    }

    /// Creates a flashcard via the *add-flashcard* dispatcher event and,
    /// when `stack` names an existing one, appends the new flashcard's
    /// key to that stack's `items` (§8 scenario 2:
    /// *create-stack-then-flashcard*).
    #[allow(clippy::too_many_arguments)]
    pub fn add_flashcard(
        &self,
        front: impl Into<String>,
        back: impl Into<String>,
        difficulty: Option<String>,
        priority: Option<String>,
        subject: Option<String>,
        teacher: Option<String>,
        tags: Vec<String>,
        customfields: Vec<String>,
        stack: Option<String>,
    ) -> Result<String> {
        let mut pairs: Payload = Payload::new();
        pairs.insert("front".to_string(), serde_json::Value::String(front.into()));
        pairs.insert("back".to_string(), serde_json::Value::String(back.into()));
        insert_opt_string(&mut pairs, "difficulty", difficulty);
        insert_opt_string(&mut pairs, "priority", priority);
        insert_opt_string(&mut pairs, "subject", subject);
        insert_opt_string(&mut pairs, "teacher", teacher);
        pairs.insert("tags".to_string(), serde_json::Value::Array(tags.into_iter().map(serde_json::Value::String).collect()));
        pairs.insert(
            "customfields".to_string(),
            serde_json::Value::Array(customfields.into_iter().map(serde_json::Value::String).collect()),
        );
        insert_opt_string(&mut pairs, "stack", stack);

        let response = self.dispatch(events::ADD_FLASHCARD, pairs);
        match response.first_result("add_flashcard") {
            Some(value) => {
                value.as_str().map(str::to_string).ok_or_else(|| Error::programmer("add-flashcard handler returned a non-string key"))
            }
            None => Err(Error::DispatchHandler {
                handler: "add_flashcard".to_string(),
                message: "no storage handler registered for add-flashcard".to_string(),
            }),
        }
    }

    /// Advances the cursor, or emits *index-max-reached* if already at
    /// the last item.
    pub fn next(&self) -> Result<()> {
        let mut active_guard = self.active.lock();
        let next_index = {
            let Some(active) = active_guard.as_mut() else {
                return Err(Error::validation("no rehearsal run is active"));
            };
            let Cursor::Loaded(index) = active.cursor else {
                return Err(Error::programmer("cursor advanced while exhausted"));
            };
            if index + 1 >= active.items.len() {
                None
            } else {
                self.close_item_record(active, index);
                Some(index + 1)
            }
        };
        match next_index {
            None => self.dispatch(events::INDEX_MAX_REACHED, Payload::new()),
            Some(index) => {
                active_guard.as_mut().unwrap().cursor = Cursor::Loaded(index);
                self.load_current(&mut active_guard);
                self.dispatch(events::INDEX_INCREMENTED, Payload::new())
            }
        };
        Ok(())
    }

    /// Retreats the cursor, or emits *index-min-reached* at index 0.
    ///
    /// This corrects the source's `on_previous_button_click` bug, which
    /// checked `CURRENT_INDEX == -1` instead of `== 0`, decremented
    /// first, and wrapped to the last item via `list[-1]` at the
    /// boundary. Here index 0 is a true floor: no wraparound.
    pub fn previous(&self) -> Result<()> {
        let mut active_guard = self.active.lock();
        let Some(active) = active_guard.as_mut() else {
            return Err(Error::validation("no rehearsal run is active"));
        };
        let Cursor::Loaded(index) = active.cursor else {
            return Err(Error::programmer("cursor advanced while exhausted"));
        };
        if index == 0 {
            self.dispatch(events::INDEX_MIN_REACHED, Payload::new());
            return Ok(());
        }
        self.close_item_record(active, index);
        active.cursor = Cursor::Loaded(index - 1);
        drop(active_guard);
        let mut active_guard = self.active.lock();
        self.load_current(&mut active_guard);
        self.dispatch(events::INDEX_DECREMENTED, Payload::new());
        Ok(())
    }

    fn close_item_record(&self, active: &mut ActiveRun, index: usize) {
        if let Some(record) = active.records.get_mut(&index) {
            record.end = Some(Utc::now());
        }
    }

    /// Applies a difficulty verdict to the current item (§4.5.2). If the
    /// named difficulty does not exist, the grade is ignored with a
    /// warning; re-grading before advancing is allowed and the last
    /// grade wins.
    pub fn grade(&self, action_kind: ActionKind) -> Result<()> {
        let grade_name = match action_kind {
            ActionKind::Easy => "easy",
            ActionKind::Medium => "medium",
            ActionKind::Hard => "hard",
            ActionKind::Edit => return self.edit(),
        };

        let mut active_guard = self.active.lock();
        let Some(active) = active_guard.as_mut() else {
            return Err(Error::validation("no rehearsal run is active"));
        };
        let Cursor::Loaded(index) = active.cursor else {
            return Err(Error::programmer("grade received while exhausted"));
        };
        let item_key = active.items[index].clone();

        let predicate = vec![("name".to_string(), serde_json::Value::String(grade_name.to_string()))];
        let difficulty_key =
            self.filter(events::FILTER_DIFFICULTIES_FROM_DB, predicate).first().and_then(|entity| entity.key()).map(str::to_string);

        let Some(difficulty_key) = difficulty_key else {
            tracing::warn!(grade_name, "no difficulty named this grade; ignoring");
            return Ok(());
        };

        match self.fetch_by_key(&item_key) {
            Some(mut entity) => {
                item::set_difficulty(&mut entity, difficulty_key);
                if let Err(err) = self.persist_update(entity) {
                    tracing::warn!(error = %err, item_key, "storage fault while grading; recorded in-memory only");
                }
            }
            None => tracing::warn!(item_key, "current item vanished from storage during grading"),
        }

        if let Some(record) = active.records.get_mut(&index) {
            record.actions.push(Action { kind: action_kind, at: Utc::now() });
        }

        let event = match action_kind {
            ActionKind::Easy => events::CLICKED_EASY_BUTTON,
            ActionKind::Medium => events::CLICKED_MEDIUM_BUTTON,
            ActionKind::Hard => events::CLICKED_HARD_BUTTON,
            ActionKind::Edit => unreachable!(),
        };
        self.dispatch(event, Payload::new());
        Ok(())
    }

    /// Emits *clicked-edit-button* for the UI to open an editor on the
    /// current item; the cursor and item state are unchanged.
    pub fn edit(&self) -> Result<()> {
        let mut active_guard = self.active.lock();
        let Some(active) = active_guard.as_mut() else {
            return Err(Error::validation("no rehearsal run is active"));
        };
        let Cursor::Loaded(index) = active.cursor else {
            return Err(Error::programmer("edit received while exhausted"));
        };
        if let Some(record) = active.records.get_mut(&index) {
            record.actions.push(Action { kind: ActionKind::Edit, at: Utc::now() });
        }
        drop(active_guard);
        self.dispatch(events::CLICKED_EDIT_BUTTON, Payload::new());
        Ok(())
    }

    /// Cancels the active run immediately, skipping to termination
    /// without finalizing the in-progress item's per-item record.
    pub fn cancel(&self) -> Result<()> {
        self.terminate(false)
    }

    /// Finishes the active run, terminating normally.
    pub fn finish(&self) -> Result<()> {
        self.terminate(true)
    }

    fn terminate(&self, close_current_item: bool) -> Result<()> {
        let mut active_guard = self.active.lock();
        let Some(mut active) = active_guard.take() else {
            return Err(Error::validation("no rehearsal run is active"));
        };

        if close_current_item {
            if let Cursor::Loaded(index) = active.cursor {
                self.close_item_record(&mut active, index);
            }
        }
        active.cursor = Cursor::Exhausted;

        let end = Utc::now();
        let elapsed = (end - active.start).num_seconds().max(0) as u64;
        let duration = Duration::from_seconds(elapsed);

        let run_entity = self.fetch_by_key(&active.run_key);
        if let Some(Entity::RehearsalRun(mut run)) = run_entity {
            run.end = Some(end);
            run.duration = Some(duration);
            match self.persist_update(Entity::RehearsalRun(run.clone())).or_else(|_| {
                tracing::warn!(run_key = %active.run_key, "storage fault on termination; retrying once");
                self.persist_update(Entity::RehearsalRun(run.clone()))
            }) {
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(error = %err, run_key = %active.run_key, "termination persist failed twice; writing recovery file");
                    self.write_recovery_file(&Entity::RehearsalRun(run))?;
                }
            }
        }

        for (index, record) in active.records.into_iter() {
            let item_entity = factory::rehearsal_run_item(active.run_key.clone(), record.item_key);
            if let Entity::RehearsalRunItem(mut item_record) = item_entity {
                item_record.actions = record.actions;
                item_record.start = record.start;
                item_record.end = record.end;
                item_record.duration = record
                    .end
                    .map(|end| Duration::from_seconds((end - record.start).num_seconds().max(0) as u64));
                if let Err(err) = self.persist_add(Entity::RehearsalRunItem(item_record)) {
                    tracing::warn!(error = %err, index, "failed to persist per-item rehearsal record");
                }
            }
        }

        let run_key = active.run_key.clone();
        let resolved_run = self.fetch_by_key(&run_key).and_then(|entity| serde_json::to_value(entity).ok());
        self.dispatch(events::GET_RESULT_VIEW, payload_value([("run", resolved_run.unwrap_or(serde_json::Value::Null))]));
        Ok(())
    }

    fn write_recovery_file(&self, run: &Entity) -> Result<()> {
        std::fs::create_dir_all(&self.recovery_dir)?;
        let key = run.key().unwrap_or("UNKNOWN").to_string();
        let path = self.recovery_dir.join(format!("{key}.json"));
        let json = serde_json::to_string_pretty(run)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn dispatch(&self, event: &str, payload: Payload) -> studyfrog_dispatcher::Response {
        self.dispatcher.dispatch(event, GLOBAL, &payload)
    }

    /// Read-only access to the underlying storage, for inspection by
    /// tests that need to look at a record the engine does not
    /// otherwise expose an event for. Not used by any `Engine` method
    /// itself — every engine operation dispatches through
    /// `storage_bridge.rs`'s handlers instead (§4.4).
    pub fn storage(&self) -> &Mutex<Storage> {
        self.storage.as_ref()
    }
}

fn payload<const N: usize>(pairs: [(&str, &str); N]) -> Payload {
    pairs.into_iter().map(|(key, value)| (key.to_string(), serde_json::Value::String(value.to_string()))).collect()
}

fn payload_value<const N: usize>(pairs: [(&str, serde_json::Value); N]) -> Payload {
    pairs.into_iter().map(|(key, value)| (key.to_string(), value)).collect()
}

fn insert_opt_string(payload: &mut Payload, key: &str, value: Option<String>) {
    if let Some(value) = value {
        payload.insert(key.to_string(), serde_json::Value::String(value));
    }
}
