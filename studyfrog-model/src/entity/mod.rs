//! The tagged-union entity model.
//!
//! Every persisted record is one [`Entity`] variant: a flat, internally
//! tagged struct carrying a [`Metadata`](crate::metadata::Metadata)
//! prefix plus its type-specific fields. The `#[serde(tag = "type")]`
//! representation keeps the on-disk shape flat (`type`, `metadata`, and
//! the fields as JSON siblings) to match the source application's
//! record layout (see the design notes on the polymorphic entity model).

pub mod kind;
pub mod rehearsal;
pub mod structure;
pub mod study_items;

pub use kind::EntityKind;
pub use rehearsal::{Action, ActionKind, Duration, RehearsalRun, RehearsalRunItem, RunConfiguration};
pub use structure::{
    Association, CustomField, CustomFieldOption, Difficulty, Image, Label, Priority, Stack,
    Subject, Teacher, User,
};
pub use study_items::{Answer, AnswerKind, Flashcard, Note, Question};

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// The full set of persisted record shapes, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Entity {
    #[serde(rename = "FLASHCARD")]
    Flashcard(Flashcard),
    #[serde(rename = "NOTE")]
    Note(Note),
    #[serde(rename = "QUESTION")]
    Question(Question),
    #[serde(rename = "ANSWER")]
    Answer(Answer),
    #[serde(rename = "STACK")]
    Stack(Stack),
    #[serde(rename = "DIFFICULTY")]
    Difficulty(Difficulty),
    #[serde(rename = "PRIORITY")]
    Priority(Priority),
    #[serde(rename = "SUBJECT")]
    Subject(Subject),
    #[serde(rename = "TAG")]
    Label(Label),
    #[serde(rename = "TEACHER")]
    Teacher(Teacher),
    #[serde(rename = "USER")]
    User(User),
    #[serde(rename = "CUSTOMFIELD")]
    CustomField(CustomField),
    #[serde(rename = "OPTION")]
    CustomFieldOption(CustomFieldOption),
    #[serde(rename = "ASSOCIATION")]
    Association(Association),
    #[serde(rename = "IMAGE")]
    Image(Image),
    #[serde(rename = "REHEARSAL_RUN")]
    RehearsalRun(RehearsalRun),
    #[serde(rename = "REHEARSAL_RUN_ITEM")]
    RehearsalRunItem(RehearsalRunItem),
}

/// Expands to a `match self { Entity::V(r) => &(mut) r.metadata, ... }`
/// arm list; keeps [`Entity::metadata`] and [`Entity::metadata_mut`] in
/// lockstep without repeating all seventeen variants twice by hand.
macro_rules! for_each_variant {
    ($self:expr, $binding:ident => $body:expr) => {
        match $self {
            Entity::Flashcard($binding) => $body,
            Entity::Note($binding) => $body,
            Entity::Question($binding) => $body,
            Entity::Answer($binding) => $body,
            Entity::Stack($binding) => $body,
            Entity::Difficulty($binding) => $body,
            Entity::Priority($binding) => $body,
            Entity::Subject($binding) => $body,
            Entity::Label($binding) => $body,
            Entity::Teacher($binding) => $body,
            Entity::User($binding) => $body,
            Entity::CustomField($binding) => $body,
            Entity::CustomFieldOption($binding) => $body,
            Entity::Association($binding) => $body,
            Entity::Image($binding) => $body,
            Entity::RehearsalRun($binding) => $body,
            Entity::RehearsalRunItem($binding) => $body,
        }
    };
}

impl Entity {
    /// Borrows the shared metadata sub-record.
    pub fn metadata(&self) -> &Metadata {
        for_each_variant!(self, r => &r.metadata)
    }

    /// Mutably borrows the shared metadata sub-record.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        for_each_variant!(self, r => &mut r.metadata)
    }

    /// The entity's tag.
    pub fn kind(&self) -> EntityKind {
        self.metadata().kind
    }

    /// The entity's canonical key, if it has been assigned one.
    pub fn key(&self) -> Option<&str> {
        self.metadata().key.as_deref()
    }

    /// The entity's table-local id, if it has been assigned one.
    pub fn id(&self) -> Option<u64> {
        self.metadata().id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn sample_flashcard() -> Entity {
        Entity::Flashcard(Flashcard {
            metadata: Metadata::fresh(EntityKind::Flashcard, Flashcard::FIELDS.iter().map(|s| s.to_string()).collect()),
            front: "Mitochondrion?".to_string(),
            back: "Powerhouse of the cell".to_string(),
            difficulty: None,
            priority: None,
            subject: None,
            teacher: None,
            tags: vec![],
            customfields: vec![],
            last_viewed_at: None,
            next_view_at: None,
        })
    }

    #[test]
    fn metadata_accessors_agree_with_kind() {
        let entity = sample_flashcard();
        assert_eq!(entity.kind(), EntityKind::Flashcard);
        assert!(entity.key().is_none());
        assert!(entity.id().is_none());
    }

    #[test]
    fn serialization_is_flat_with_a_type_tag() {
        let entity = sample_flashcard();
        let value = serde_json::to_value(&entity).expect("serializes");
        assert_eq!(value["type"], "FLASHCARD");
        assert_eq!(value["front"], "Mitochondrion?");
        assert!(value["metadata"].is_object());
    }

    #[test]
    fn round_trips_through_json() {
        let entity = sample_flashcard();
        let json = serde_json::to_string(&entity).expect("serializes");
        let back: Entity = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(entity, back);
    }
}
