//! Helpers for reading and re-grading the three study-item kinds a
//! rehearsal run can hold (`FLASHCARD`, `NOTE`, `QUESTION`); everything
//! else in a stack's `items` list is a dangling reference the engine
//! logs and skips (invariant 3, §3).

use studyfrog_model::entity::Entity;

/// The `difficulty` key currently assigned to a study item, if any.
pub fn difficulty_key(entity: &Entity) -> Option<&str> {
    match entity {
        Entity::Flashcard(card) => card.difficulty.as_deref(),
        Entity::Note(note) => note.difficulty.as_deref(),
        Entity::Question(question) => question.difficulty.as_deref(),
        _ => None,
    }
}

/// The `priority` key currently assigned to a study item, if any.
pub fn priority_key(entity: &Entity) -> Option<&str> {
    match entity {
        Entity::Flashcard(card) => card.priority.as_deref(),
        Entity::Note(note) => note.priority.as_deref(),
        Entity::Question(question) => question.priority.as_deref(),
        _ => None,
    }
}

/// Overwrites a study item's `difficulty` reference in place. No-op for
/// any other entity kind.
pub fn set_difficulty(entity: &mut Entity, difficulty_key: String) {
    match entity {
        Entity::Flashcard(card) => card.difficulty = Some(difficulty_key),
        Entity::Note(note) => note.difficulty = Some(difficulty_key),
        Entity::Question(question) => question.difficulty = Some(difficulty_key),
        _ => {}
    }
}
