//! The `type` discriminator shared by every entity, and its canonical
//! string forms (`"FLASHCARD"`, singular table word `"flashcard"`).

use serde::{Deserialize, Serialize};

/// Tag identifying which entity variant a record belongs to.
///
/// The `TAG` entity itself (a free-form label applied to study items) is
/// named [`EntityKind::Label`] here to avoid colliding with this enum's
/// own name; it still serializes to the string `"TAG"`. Likewise the
/// `OPTION` entity (a value belonging to a [`EntityKind::CustomField`])
/// is named [`EntityKind::CustomFieldOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "FLASHCARD")]
    Flashcard,
    #[serde(rename = "NOTE")]
    Note,
    #[serde(rename = "QUESTION")]
    Question,
    #[serde(rename = "ANSWER")]
    Answer,
    #[serde(rename = "STACK")]
    Stack,
    #[serde(rename = "DIFFICULTY")]
    Difficulty,
    #[serde(rename = "PRIORITY")]
    Priority,
    #[serde(rename = "SUBJECT")]
    Subject,
    #[serde(rename = "TAG")]
    Label,
    #[serde(rename = "TEACHER")]
    Teacher,
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "CUSTOMFIELD")]
    CustomField,
    #[serde(rename = "OPTION")]
    CustomFieldOption,
    #[serde(rename = "ASSOCIATION")]
    Association,
    #[serde(rename = "IMAGE")]
    Image,
    #[serde(rename = "REHEARSAL_RUN")]
    RehearsalRun,
    #[serde(rename = "REHEARSAL_RUN_ITEM")]
    RehearsalRunItem,
}

impl EntityKind {
    /// All known entity kinds, in table-definition order.
    pub const ALL: [EntityKind; 17] = [
        EntityKind::Flashcard,
        EntityKind::Note,
        EntityKind::Question,
        EntityKind::Answer,
        EntityKind::Stack,
        EntityKind::Difficulty,
        EntityKind::Priority,
        EntityKind::Subject,
        EntityKind::Label,
        EntityKind::Teacher,
        EntityKind::User,
        EntityKind::CustomField,
        EntityKind::CustomFieldOption,
        EntityKind::Association,
        EntityKind::Image,
        EntityKind::RehearsalRun,
        EntityKind::RehearsalRunItem,
    ];

    /// The upper-case tag string used in keys and `metadata.type`
    /// (e.g. `"FLASHCARD"`, `"REHEARSAL_RUN_ITEM"`).
    pub fn tag_str(self) -> &'static str {
        match self {
            EntityKind::Flashcard => "FLASHCARD",
            EntityKind::Note => "NOTE",
            EntityKind::Question => "QUESTION",
            EntityKind::Answer => "ANSWER",
            EntityKind::Stack => "STACK",
            EntityKind::Difficulty => "DIFFICULTY",
            EntityKind::Priority => "PRIORITY",
            EntityKind::Subject => "SUBJECT",
            EntityKind::Label => "TAG",
            EntityKind::Teacher => "TEACHER",
            EntityKind::User => "USER",
            EntityKind::CustomField => "CUSTOMFIELD",
            EntityKind::CustomFieldOption => "OPTION",
            EntityKind::Association => "ASSOCIATION",
            EntityKind::Image => "IMAGE",
            EntityKind::RehearsalRun => "REHEARSAL_RUN",
            EntityKind::RehearsalRunItem => "REHEARSAL_RUN_ITEM",
        }
    }

    /// The lower-case singular word used to derive the table name via
    /// [`crate::key::pluralize`] (e.g. `"flashcard"`, `"rehearsal_run_item"`).
    pub fn singular(self) -> &'static str {
        match self {
            EntityKind::Flashcard => "flashcard",
            EntityKind::Note => "note",
            EntityKind::Question => "question",
            EntityKind::Answer => "answer",
            EntityKind::Stack => "stack",
            EntityKind::Difficulty => "difficulty",
            EntityKind::Priority => "priority",
            EntityKind::Subject => "subject",
            EntityKind::Label => "tag",
            EntityKind::Teacher => "teacher",
            EntityKind::User => "user",
            EntityKind::CustomField => "customfield",
            EntityKind::CustomFieldOption => "option",
            EntityKind::Association => "association",
            EntityKind::Image => "image",
            EntityKind::RehearsalRun => "rehearsal_run",
            EntityKind::RehearsalRunItem => "rehearsal_run_item",
        }
    }

    /// The plural table/file name for this kind (e.g. `"flashcards"`,
    /// `"difficulties"`).
    pub fn table_name(self) -> String {
        crate::key::pluralize(self.singular())
    }

    /// Parses an upper-case tag string (as found in a canonical key or
    /// `metadata.type`) back into an [`EntityKind`].
    pub fn from_tag_str(tag: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|kind| kind.tag_str() == tag)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_tag_string() {
        for kind in EntityKind::ALL {
            let parsed = EntityKind::from_tag_str(kind.tag_str());
            assert_eq!(parsed, Some(kind));
        }
    }

    #[test]
    fn table_names_match_the_source_inventory() {
        assert_eq!(EntityKind::Difficulty.table_name(), "difficulties");
        assert_eq!(EntityKind::Priority.table_name(), "priorities");
        assert_eq!(EntityKind::RehearsalRunItem.table_name(), "rehearsal_run_items");
        assert_eq!(EntityKind::RehearsalRun.table_name(), "rehearsal_runs");
        assert_eq!(EntityKind::Label.table_name(), "tags");
        assert_eq!(EntityKind::CustomFieldOption.table_name(), "options");
        assert_eq!(EntityKind::Flashcard.table_name(), "flashcards");
    }
}
