//! The fixed event-name vocabulary the engine dispatches, per §6.

pub const START_REHEARSAL_RUN: &str = "start-rehearsal-run";
pub const LOAD_ITEM: &str = "load-rehearsal-view-form";
pub const GET_RESULT_VIEW: &str = "get-rehearsal-run-result-view";

pub const INDEX_INCREMENTED: &str = "rehearsal-run-index-incremented";
pub const INDEX_DECREMENTED: &str = "rehearsal-run-index-decremented";
pub const INDEX_MAX_REACHED: &str = "rehearsal-run-index-max-reached";
pub const INDEX_MIN_REACHED: &str = "rehearsal-run-index-min-reached";

pub const CLICKED_EASY_BUTTON: &str = "clicked-easy-button";
pub const CLICKED_MEDIUM_BUTTON: &str = "clicked-medium-button";
pub const CLICKED_HARD_BUTTON: &str = "clicked-hard-button";
pub const CLICKED_EDIT_BUTTON: &str = "clicked-edit-button";

pub const VALIDATION_TOAST: &str = "get-validation-toast";
pub const STORAGE_FAULT_TOAST: &str = "get-storage-fault-toast";

// Storage verbs (§4.3, §4.4), exposed as dispatcher handlers rather than
// called directly (see `storage_bridge.rs`). One event per (verb, type)
// pair for the six kinds the rehearsal flow reads or filters by name;
// `*_ENTRY`/`GET_ENTRY` cover every other kind generically, matching
// §6's own unqualified "add/update/delete-entry" naming.
pub const GET_FLASHCARD_FROM_DB: &str = "get-flashcard-from-db";
pub const GET_NOTE_FROM_DB: &str = "get-note-from-db";
pub const GET_QUESTION_FROM_DB: &str = "get-question-from-db";
pub const GET_STACK_FROM_DB: &str = "get-stack-from-db";
pub const GET_DIFFICULTY_FROM_DB: &str = "get-difficulty-from-db";
pub const GET_PRIORITY_FROM_DB: &str = "get-priority-from-db";
pub const GET_ENTRY: &str = "get-entry";

pub const FILTER_DIFFICULTIES_FROM_DB: &str = "filter-difficulties-from-db";
pub const FILTER_PRIORITIES_FROM_DB: &str = "filter-priorities-from-db";

pub const ADD_ENTRY: &str = "add-entry";
pub const UPDATE_ENTRY: &str = "update-entry";
pub const DELETE_ENTRY: &str = "delete-entry";

/// Creates a flashcard and, when given a `stack` key, appends it to
/// that stack's `items` (§8 scenario 2: *create-stack-then-flashcard*).
pub const ADD_FLASHCARD: &str = "add-flashcard";
