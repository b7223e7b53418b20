//! A single per-type table: a file-backed map from `id` to record, plus
//! a monotonically increasing `next_id` counter.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use studyfrog_model::{Entity, EntityKind, Error, Result};

/// The on-disk shape of one table file: an ordered sequence of records
/// plus the counter that hands out the next `id`.
#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    next_id: u64,
    records: Vec<Entity>,
}

/// A single entity table, kept wholly in memory between explicit saves
/// and persisted synchronously on every mutating call.
pub struct Table {
    kind: EntityKind,
    path: PathBuf,
    next_id: u64,
    records: BTreeMap<u64, Entity>,
}

impl Table {
    /// Loads a table from `path`, creating an empty one in memory if the
    /// file does not yet exist. Records whose `metadata` is missing or
    /// whose `type` does not match `kind` are dropped with a warning
    /// (the corrupt-record policy of §4.3).
    pub fn load(kind: EntityKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self { kind, path, next_id: 0, records: BTreeMap::new() });
        }
        let contents = std::fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(Self { kind, path, next_id: 0, records: BTreeMap::new() });
        }
        let file: TableFile = serde_json::from_str(&contents)?;
        let mut records = BTreeMap::new();
        for record in file.records {
            if record.kind() != kind {
                tracing::warn!(table = %kind, found = %record.kind(), "dropping record with mismatched type tag");
                continue;
            }
            let Some(id) = record.id() else {
                tracing::warn!(table = %kind, "dropping record with no assigned id");
                continue;
            };
            records.insert(id, record);
        }
        Ok(Self { kind, path, next_id: file.next_id, records })
    }

    /// Writes the table back to its backing file in full.
    fn persist(&self) -> Result<()> {
        let file = TableFile {
            next_id: self.next_id,
            records: self.records.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Inserts `record`, assigning it a fresh id and canonical key.
    /// Persists synchronously before returning.
    pub fn add(&mut self, mut record: Entity) -> Result<u64> {
        if record.kind() != self.kind {
            return Err(Error::programmer(format!(
                "attempted to add a {} record into the {} table",
                record.kind(),
                self.kind
            )));
        }
        let id = self.next_id;
        self.next_id += 1;
        record.metadata_mut().assign_id(id);
        self.records.insert(id, record);
        self.persist()?;
        Ok(id)
    }

    /// Inserts `record` unless a record already matches it on every
    /// non-metadata top-level field; returns the id of the match, or of
    /// the newly-inserted record.
    pub fn add_if_not_exist(&mut self, record: Entity) -> Result<u64> {
        if let Some(existing) = self.find_matching(&record) {
            return Ok(existing);
        }
        self.add(record)
    }

    fn find_matching(&self, candidate: &Entity) -> Option<u64> {
        let candidate_value = non_metadata_fields(candidate);
        self.records.iter().find_map(|(id, record)| {
            (non_metadata_fields(record) == candidate_value).then_some(*id)
        })
    }

    /// Looks up a single record by id.
    pub fn get(&self, id: u64) -> Option<&Entity> {
        self.records.get(&id)
    }

    /// Returns every record, ordered by ascending id.
    pub fn get_all(&self) -> Vec<&Entity> {
        self.records.values().collect()
    }

    /// Returns every record matching every entry of `predicate`. Scalar
    /// fields compare by case-sensitive equality; `"metadata.<key>"`
    /// addresses a nested metadata field (e.g. `"metadata.key"`).
    pub fn filter(&self, predicate: &[(String, serde_json::Value)]) -> Vec<&Entity> {
        self.records
            .values()
            .filter(|record| predicate.iter().all(|(field, expected)| field_matches(record, field, expected)))
            .collect()
    }

    /// Replaces the record sharing `record`'s key, refreshing
    /// `updated_at`/`updated_on`. Fails if the key is absent.
    pub fn update(&mut self, mut record: Entity) -> Result<Entity> {
        let id = record
            .metadata()
            .id
            .ok_or_else(|| Error::validation("update requires a record carrying metadata.id"))?;
        if !self.records.contains_key(&id) {
            return Err(Error::not_found(record.key().unwrap_or_default().to_string()));
        }
        record.metadata_mut().touch();
        self.records.insert(id, record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Removes a single record by id. Missing ids are silently ignored;
    /// returns the number removed (0 or 1).
    pub fn delete(&mut self, id: u64) -> Result<u64> {
        let removed = if self.records.remove(&id).is_some() { 1 } else { 0 };
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Removes several records by id, ignoring any that are missing.
    pub fn delete_many(&mut self, ids: &[u64]) -> Result<u64> {
        let mut removed = 0;
        for id in ids {
            if self.records.remove(id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Empties the table and resets `next_id` to zero.
    pub fn delete_all(&mut self) -> Result<u64> {
        let removed = self.records.len() as u64;
        self.records.clear();
        self.next_id = 0;
        self.persist()?;
        Ok(removed)
    }

    /// Number of records currently in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn non_metadata_fields(entity: &Entity) -> serde_json::Value {
    let mut value = serde_json::to_value(entity).unwrap_or(serde_json::Value::Null);
    if let Some(obj) = value.as_object_mut() {
        obj.remove("metadata");
    }
    value
}

fn field_matches(record: &Entity, field: &str, expected: &serde_json::Value) -> bool {
    let value = serde_json::to_value(record).unwrap_or(serde_json::Value::Null);
    match field.split_once('.') {
        Some((head, tail)) => value.get(head).and_then(|v| v.get(tail)) == Some(expected),
        None => value.get(field) == Some(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyfrog_model::factory;

    fn temp_path() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("difficulties.json");
        (dir, path)
    }

    #[test]
    fn add_assigns_sequential_ids_and_keys() {
        let (_guard, path) = temp_path();
        let mut table = Table::load(EntityKind::Difficulty, path).unwrap();
        let id_a = table.add(factory::difficulty("easy", "Easy", 0.33)).unwrap();
        let id_b = table.add(factory::difficulty("medium", "Medium", 0.66)).unwrap();
        assert_eq!(id_a, 0);
        assert_eq!(id_b, 1);
        assert_eq!(table.get(id_a).unwrap().key(), Some("DIFFICULTY_0"));
    }

    #[test]
    fn add_if_not_exist_is_idempotent() {
        let (_guard, path) = temp_path();
        let mut table = Table::load(EntityKind::Difficulty, path).unwrap();
        let first = table.add_if_not_exist(factory::difficulty("easy", "Easy", 0.33)).unwrap();
        let second = table.add_if_not_exist(factory::difficulty("easy", "Easy", 0.33)).unwrap();
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn filter_matches_on_nested_metadata_field() {
        let (_guard, path) = temp_path();
        let mut table = Table::load(EntityKind::Difficulty, path).unwrap();
        let id = table.add(factory::difficulty("easy", "Easy", 0.33)).unwrap();
        let key = table.get(id).unwrap().key().unwrap().to_string();
        let predicate = vec![("metadata.key".to_string(), serde_json::Value::String(key))];
        let results = table.filter(&predicate);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn delete_on_missing_id_is_a_no_op() {
        let (_guard, path) = temp_path();
        let mut table = Table::load(EntityKind::Difficulty, path).unwrap();
        let removed = table.delete(999).unwrap();
        assert_eq!(removed, 0);
        assert!(table.is_empty());
    }

    #[test]
    fn delete_all_resets_next_id() {
        let (_guard, path) = temp_path();
        let mut table = Table::load(EntityKind::Difficulty, path).unwrap();
        table.add(factory::difficulty("easy", "Easy", 0.33)).unwrap();
        table.add(factory::difficulty("hard", "Hard", 1.0)).unwrap();
        let removed = table.delete_all().unwrap();
        assert_eq!(removed, 2);
        let id = table.add(factory::difficulty("medium", "Medium", 0.66)).unwrap();
        assert_eq!(id, 0);
    }

    #[test]
    fn persisted_table_round_trips_through_reload() {
        let (_guard, path) = temp_path();
        {
            let mut table = Table::load(EntityKind::Difficulty, &path).unwrap();
            table.add(factory::difficulty("easy", "Easy", 0.33)).unwrap();
        }
        let reloaded = Table::load(EntityKind::Difficulty, &path).unwrap();
        assert_eq!(reloaded.len(), 1);
    }
}
