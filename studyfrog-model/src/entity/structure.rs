//! Structural and organizational entities: stacks, taxonomy records
//! (difficulty, priority, subject, tag, teacher, user), custom fields,
//! associations, and the opaque image placeholder.

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// An ordered collection of study items, optionally nested under a
/// parent and with child stacks of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub metadata: Metadata,
    pub name: String,
    pub items: Vec<String>,
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
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

impl Stack {
    pub const FIELDS: &'static [&'static str] = &[
        "name",
        "items",
        "children",
        "parent",
        "description",
        "difficulty",
        "priority",
        "subject",
        "teacher",
        "tags",
    ];
}

/// A named difficulty level with a float weight (`easy`/`medium`/`hard`
/// are seeded by default, see [`crate::seed`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub metadata: Metadata,
    pub name: String,
    pub display_name: String,
    pub value: f64,
}

impl Difficulty {
    pub const FIELDS: &'static [&'static str] = &["name", "display_name", "value"];
}

/// A named priority level with a float weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Priority {
    pub metadata: Metadata,
    pub name: String,
    pub display_name: String,
    pub value: f64,
}

impl Priority {
    pub const FIELDS: &'static [&'static str] = &["name", "display_name", "value"];
}

/// A subject (e.g. "Biology"), optionally carrying its own default
/// difficulty/priority and tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub metadata: Metadata,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub tags: Vec<String>,
}

impl Subject {
    pub const FIELDS: &'static [&'static str] = &["name", "difficulty", "priority", "tags"];
}

/// A free-form label applicable to any study item. Named `Label` in Rust
/// to avoid colliding with [`crate::entity::kind::EntityKind`]; the wire
/// tag remains `"TAG"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub metadata: Metadata,
    pub name: String,
}

impl Label {
    pub const FIELDS: &'static [&'static str] = &["name"];
}

/// A teacher record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub metadata: Metadata,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub tags: Vec<String>,
}

impl Teacher {
    pub const FIELDS: &'static [&'static str] = &["name", "difficulty", "priority", "tags"];
}

/// The application user. A single default user is seeded on first
/// startup (see [`crate::seed`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub metadata: Metadata,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub tags: Vec<String>,
}

impl User {
    pub const FIELDS: &'static [&'static str] = &["name", "difficulty", "priority", "tags"];
}

/// A named custom field with an ordered list of option keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub metadata: Metadata,
    pub name: String,
    pub options: Vec<String>,
}

impl CustomField {
    pub const FIELDS: &'static [&'static str] = &["name", "options"];
}

/// A single value belonging to a [`CustomField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldOption {
    pub metadata: Metadata,
    pub customfield: String,
    pub value: String,
}

impl CustomFieldOption {
    pub const FIELDS: &'static [&'static str] = &["customfield", "value"];
}

/// A free-form relation across entity kinds: an ordered list of
/// `(field name, referenced key)` pairs. Modeled as pairs rather than a
/// map so field order survives the round trip into `metadata.fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub metadata: Metadata,
    pub references: Vec<(String, String)>,
}

impl Association {
    pub const FIELDS: &'static [&'static str] = &["references"];
}

/// Opaque placeholder entity; image handling proper is out of core
/// scope (§1). Carries whatever payload the collaborator attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Image {
    pub const FIELDS: &'static [&'static str] = &["data"];
}
