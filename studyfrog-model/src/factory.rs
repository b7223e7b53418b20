//! The Model Factory: assembles a fresh [`Entity`] record for a given
//! tag from caller-supplied fields.
//!
//! One constructor-style function per entity kind, each stamping its own
//! `metadata` — rather than a single untyped `make(tag, **fields)` call,
//! since Rust's type system gives each entity its own parameter list for
//! free. Every function here discards any caller-supplied `id` or `key`
//! (there is no parameter to provide one) and normalizes omitted list
//! fields to empty vectors, matching the factory contract in full.

use crate::entity::{
    Answer, AnswerKind, Association, CustomField, CustomFieldOption, Difficulty, Entity,
    EntityKind, Flashcard, Image, Label, Note, Priority, Question, RehearsalRun, RehearsalRunItem,
    RunConfiguration, Stack, Subject, Teacher, User,
};
use crate::metadata::Metadata;

fn fields(names: &[&'static str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Builds a flashcard record. `tags` and `customfields` default to empty
/// when the caller has none to attach.
pub fn flashcard(
    front: impl Into<String>,
    back: impl Into<String>,
    difficulty: Option<String>,
    priority: Option<String>,
    subject: Option<String>,
    teacher: Option<String>,
    tags: Vec<String>,
    customfields: Vec<String>,
) -> Entity {
    Entity::Flashcard(Flashcard {
        metadata: Metadata::fresh(EntityKind::Flashcard, fields(Flashcard::FIELDS)),
        front: front.into(),
        back: back.into(),
        difficulty,
        priority,
        subject,
        teacher,
        tags,
        customfields,
        last_viewed_at: None,
        next_view_at: None,
    })
}

/// Builds a note record.
pub fn note(
    title: impl Into<String>,
    text: impl Into<String>,
    difficulty: Option<String>,
    priority: Option<String>,
    subject: Option<String>,
    teacher: Option<String>,
    tags: Vec<String>,
    customfields: Vec<String>,
) -> Entity {
    Entity::Note(Note {
        metadata: Metadata::fresh(EntityKind::Note, fields(Note::FIELDS)),
        title: title.into(),
        text: text.into(),
        difficulty,
        priority,
        subject,
        teacher,
        tags,
        customfields,
        last_viewed_at: None,
        next_view_at: None,
    })
}

/// Builds a question record. `answers` is normalized to empty when the
/// caller passes none; answers are usually created and assigned after
/// the question itself, since each needs the question's key.
pub fn question(
    text: impl Into<String>,
    answers: Vec<String>,
    difficulty: Option<String>,
    priority: Option<String>,
    subject: Option<String>,
    teacher: Option<String>,
    tags: Vec<String>,
) -> Entity {
    Entity::Question(Question {
        metadata: Metadata::fresh(EntityKind::Question, fields(Question::FIELDS)),
        text: text.into(),
        answers,
        difficulty,
        priority,
        subject,
        teacher,
        tags,
    })
}

/// Builds an answer record.
pub fn answer(
    text: impl Into<String>,
    is_correct: bool,
    answer_kind: AnswerKind,
    is_assigned_to_question: Option<String>,
    subject: Option<String>,
    teacher: Option<String>,
    tags: Vec<String>,
) -> Entity {
    Entity::Answer(Answer {
        metadata: Metadata::fresh(EntityKind::Answer, fields(Answer::FIELDS)),
        text: text.into(),
        is_correct,
        answer_kind,
        is_assigned_to_question,
        subject,
        teacher,
        tags,
    })
}

/// Builds a stack record. `items` and `children` are normalized to empty
/// when the caller passes none.
pub fn stack(
    name: impl Into<String>,
    items: Vec<String>,
    children: Vec<String>,
    parent: Option<String>,
    description: Option<String>,
    difficulty: Option<String>,
    priority: Option<String>,
    subject: Option<String>,
    teacher: Option<String>,
    tags: Vec<String>,
) -> Entity {
    Entity::Stack(Stack {
        metadata: Metadata::fresh(EntityKind::Stack, fields(Stack::FIELDS)),
        name: name.into(),
        items,
        children,
        parent,
        description,
        difficulty,
        priority,
        subject,
        teacher,
        tags,
    })
}

/// Builds a difficulty level record.
pub fn difficulty(name: impl Into<String>, display_name: impl Into<String>, value: f64) -> Entity {
    Entity::Difficulty(Difficulty {
        metadata: Metadata::fresh(EntityKind::Difficulty, fields(Difficulty::FIELDS)),
        name: name.into(),
        display_name: display_name.into(),
        value,
    })
}

/// Builds a priority level record.
pub fn priority(name: impl Into<String>, display_name: impl Into<String>, value: f64) -> Entity {
    Entity::Priority(Priority {
        metadata: Metadata::fresh(EntityKind::Priority, fields(Priority::FIELDS)),
        name: name.into(),
        display_name: display_name.into(),
        value,
    })
}

/// Builds a subject record.
pub fn subject(
    name: impl Into<String>,
    difficulty: Option<String>,
    priority: Option<String>,
    tags: Vec<String>,
) -> Entity {
    Entity::Subject(Subject {
        metadata: Metadata::fresh(EntityKind::Subject, fields(Subject::FIELDS)),
        name: name.into(),
        difficulty,
        priority,
        tags,
    })
}

/// Builds a tag ("label") record.
pub fn label(name: impl Into<String>) -> Entity {
    Entity::Label(Label {
        metadata: Metadata::fresh(EntityKind::Label, fields(Label::FIELDS)),
        name: name.into(),
    })
}

/// Builds a teacher record.
pub fn teacher(
    name: impl Into<String>,
    difficulty: Option<String>,
    priority: Option<String>,
    tags: Vec<String>,
) -> Entity {
    Entity::Teacher(Teacher {
        metadata: Metadata::fresh(EntityKind::Teacher, fields(Teacher::FIELDS)),
        name: name.into(),
        difficulty,
        priority,
        tags,
    })
}

/// Builds a user record.
pub fn user(
    name: impl Into<String>,
    difficulty: Option<String>,
    priority: Option<String>,
    tags: Vec<String>,
) -> Entity {
    Entity::User(User {
        metadata: Metadata::fresh(EntityKind::User, fields(User::FIELDS)),
        name: name.into(),
        difficulty,
        priority,
        tags,
    })
}

/// Builds a custom-field record. `options` is normalized to empty when
/// the caller passes none; options are typically created afterward and
/// appended, since each needs the field's key.
pub fn custom_field(name: impl Into<String>, options: Vec<String>) -> Entity {
    Entity::CustomField(CustomField {
        metadata: Metadata::fresh(EntityKind::CustomField, fields(CustomField::FIELDS)),
        name: name.into(),
        options,
    })
}

/// Builds a custom-field option record.
pub fn custom_field_option(customfield: impl Into<String>, value: impl Into<String>) -> Entity {
    Entity::CustomFieldOption(CustomFieldOption {
        metadata: Metadata::fresh(EntityKind::CustomFieldOption, fields(CustomFieldOption::FIELDS)),
        customfield: customfield.into(),
        value: value.into(),
    })
}

/// Builds a free-form association between entities.
pub fn association(references: Vec<(String, String)>) -> Entity {
    Entity::Association(Association {
        metadata: Metadata::fresh(EntityKind::Association, fields(Association::FIELDS)),
        references,
    })
}

/// Builds an opaque image placeholder record.
pub fn image(data: Option<serde_json::Value>) -> Entity {
    Entity::Image(Image {
        metadata: Metadata::fresh(EntityKind::Image, fields(Image::FIELDS)),
        data,
    })
}

/// Builds a rehearsal run record at session start. `items` is normally
/// empty at construction time; the engine fills it in during setup
/// (step 7 of §4.5.1) and re-persists the record via Storage's `update`.
pub fn rehearsal_run(stacks: Vec<String>, configuration: RunConfiguration) -> Entity {
    Entity::RehearsalRun(RehearsalRun {
        metadata: Metadata::fresh(EntityKind::RehearsalRun, fields(RehearsalRun::FIELDS)),
        stacks,
        items: Vec::new(),
        configuration,
        start: crate::key::now(),
        end: None,
        duration: None,
    })
}

/// Builds a rehearsal run item record, stamped at first load of its item.
pub fn rehearsal_run_item(run: impl Into<String>, item: impl Into<String>) -> Entity {
    Entity::RehearsalRunItem(RehearsalRunItem {
        metadata: Metadata::fresh(EntityKind::RehearsalRunItem, fields(RehearsalRunItem::FIELDS)),
        run: run.into(),
        item: item.into(),
        actions: Vec::new(),
        start: crate::key::now(),
        end: None,
        duration: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_discards_id_and_key_and_stamps_fresh_metadata() {
        let entity = flashcard("front", "back", None, None, None, None, vec![], vec![]);
        assert!(entity.id().is_none());
        assert!(entity.key().is_none());
        assert_eq!(entity.kind(), EntityKind::Flashcard);
        assert_eq!(entity.metadata().created_at, entity.metadata().updated_at);
    }

    #[test]
    fn fields_manifest_includes_metadata_and_every_declared_field() {
        let entity = difficulty("easy", "Easy", 0.33);
        let manifest = &entity.metadata().fields;
        assert_eq!(manifest.fields[0], "metadata");
        assert_eq!(manifest.total, Difficulty::FIELDS.len() + 1);
    }

    #[test]
    fn rehearsal_run_starts_with_empty_items_for_the_engine_to_fill() {
        let config = RunConfiguration {
            difficulty: None,
            priority: None,
            item_order_randomization_enabled: false,
            time_counter_enabled: true,
            time_limit_enabled: false,
            time_limit_minutes: 60,
        };
        let entity = rehearsal_run(vec!["STACK_1".to_string()], config);
        if let Entity::RehearsalRun(run) = entity {
            assert!(run.items.is_empty());
            assert!(run.end.is_none());
        } else {
            panic!("expected a rehearsal run entity");
        }
    }
}
