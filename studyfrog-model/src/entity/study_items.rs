//! The study-item entities: flashcards, notes, questions, and answers.

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// A front/back flashcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub metadata: Metadata,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    pub tags: Vec<String>,
    pub customfields: Vec<String>,
    /// Present in the source model but never written by the engine; see
    /// the open question on scheduling in the design notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_viewed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_view_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Flashcard {
    pub const FIELDS: &'static [&'static str] = &[
        "front",
        "back",
        "difficulty",
        "priority",
        "subject",
        "teacher",
        "tags",
        "customfields",
        "last_viewed_at",
        "next_view_at",
    ];
}

/// A free-text note, structurally identical to a flashcard save for the
/// `title`/`text` fields in place of `front`/`back`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub metadata: Metadata,
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    pub tags: Vec<String>,
    pub customfields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_viewed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_view_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Note {
    pub const FIELDS: &'static [&'static str] = &[
        "title",
        "text",
        "difficulty",
        "priority",
        "subject",
        "teacher",
        "tags",
        "customfields",
        "last_viewed_at",
        "next_view_at",
    ];
}

/// A multiple-choice or open-ended question. `answers` holds the keys of
/// its associated `ANSWER` records; the engine resolves them lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub metadata: Metadata,
    pub text: String,
    pub answers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    pub tags: Vec<String>,
}

impl Question {
    pub const FIELDS: &'static [&'static str] =
        &["text", "answers", "difficulty", "priority", "subject", "teacher", "tags"];
}

/// Discriminates the three answer shapes a question can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Choice,
    OpenEnded,
    TrueFalse,
}

/// A single answer, optionally assigned to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub metadata: Metadata,
    pub text: String,
    pub is_correct: bool,
    pub answer_kind: AnswerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_assigned_to_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    pub tags: Vec<String>,
}

impl Answer {
    pub const FIELDS: &'static [&'static str] = &[
        "text",
        "is_correct",
        "answer_kind",
        "is_assigned_to_question",
        "subject",
        "teacher",
        "tags",
    ];
}
