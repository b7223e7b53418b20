//! The uniform `metadata` sub-record carried by every entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::EntityKind;

/// The ordered manifest of top-level keys present on a record at
/// creation time, including `"metadata"` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsManifest {
    pub fields: Vec<String>,
    pub total: usize,
}

impl FieldsManifest {
    /// Builds a manifest from an ordered list of top-level field names.
    pub fn new(fields: Vec<String>) -> Self {
        let total = fields.len();
        Self { fields, total }
    }
}

/// Metadata carried by every persisted entity.
///
/// `key` and `id` are `None` until [`studyfrog_storage`]'s `add`
/// operation assigns them; the Model Factory never fills them in
/// (§4.1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_on: NaiveDate,
    pub updated_on: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub uuid: Uuid,
    pub fields: FieldsManifest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Metadata {
    /// Builds fresh metadata for a newly factory-minted record. `fields`
    /// is the manifest of top-level keys the caller's record will have,
    /// in declaration order, *excluding* `"metadata"` itself (which this
    /// constructor prepends).
    pub fn fresh(kind: EntityKind, mut fields: Vec<String>) -> Self {
        let now = crate::key::now();
        let today = crate::key::today();
        fields.insert(0, "metadata".to_string());
        Self {
            created_at: now,
            updated_at: now,
            created_on: today,
            updated_on: today,
            kind,
            uuid: crate::key::uuid4(),
            fields: FieldsManifest::new(fields),
            key: None,
            id: None,
        }
    }

    /// Refreshes `updated_at`/`updated_on` to the current instant. Called
    /// by Storage on every `update`.
    pub fn touch(&mut self) {
        self.updated_at = crate::key::now();
        self.updated_on = crate::key::today();
    }

    /// Assigns the table-local id and canonical key. Called exactly once,
    /// by Storage's `add` operation.
    pub fn assign_id(&mut self, id: u64) {
        self.id = Some(id);
        self.key = Some(crate::key::make_key(self.kind, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_metadata_has_equal_created_and_updated_timestamps() {
        let meta = Metadata::fresh(EntityKind::Flashcard, vec!["front".to_string(), "back".to_string()]);
        assert_eq!(meta.created_at, meta.updated_at);
        assert_eq!(meta.created_on, meta.updated_on);
        assert!(meta.key.is_none());
        assert!(meta.id.is_none());
        assert_eq!(meta.fields.fields, vec!["metadata", "front", "back"]);
        assert_eq!(meta.fields.total, 3);
    }

    #[test]
    fn touch_advances_updated_at_without_moving_created_at() {
        let mut meta = Metadata::fresh(EntityKind::Note, vec![]);
        let created = meta.created_at;
        std::thread::sleep(std::time::Duration::from_millis(1100));
        meta.touch();
        assert_eq!(meta.created_at, created);
        assert!(meta.updated_at >= created);
    }

    #[test]
    fn assign_id_produces_canonical_key() {
        let mut meta = Metadata::fresh(EntityKind::Stack, vec![]);
        meta.assign_id(5);
        assert_eq!(meta.id, Some(5));
        assert_eq!(meta.key.as_deref(), Some("STACK_5"));
    }
}
