//! The full set of per-type tables, with the seed-data bootstrap.

use std::collections::HashMap;

use studyfrog_model::{seed, Entity, EntityKind, Result};

use crate::config::StorageConfig;
use crate::table::Table;

/// Owns one [`Table`] per entity kind. This is the only handle the rest
/// of the core holds onto storage; the dispatcher routes every verb in
/// §4.3 to a method here.
pub struct Storage {
    tables: HashMap<EntityKind, Table>,
}

impl Storage {
    /// Loads every per-type table from `config.data_dir`, creating
    /// missing files lazily on first write, then inserts any seed
    /// records (§6) absent by `name`.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let mut tables = HashMap::new();
        for kind in EntityKind::ALL {
            let path = config.data_dir.join(format!("{}.json", kind.table_name()));
            tables.insert(kind, Table::load(kind, path)?);
        }
        let mut storage = Self { tables };
        storage.seed()?;
        Ok(storage)
    }

    fn seed(&mut self) -> Result<()> {
        for record in seed::difficulties() {
            self.add_if_not_exist_by_name(record)?;
        }
        for record in seed::priorities() {
            self.add_if_not_exist_by_name(record)?;
        }
        self.add_if_not_exist_by_name(seed::default_user())?;
        Ok(())
    }

    fn add_if_not_exist_by_name(&mut self, record: Entity) -> Result<u64> {
        let name = record_name(&record);
        let kind = record.kind();
        let table = self.table_mut(kind);
        if let Some(name) = name {
            if let Some(existing) = table
                .get_all()
                .into_iter()
                .find(|existing| record_name(existing).as_deref() == Some(name.as_str()))
            {
                return Ok(existing.id().expect("persisted record carries an id"));
            }
        }
        table.add(record)
    }

    fn table(&self, kind: EntityKind) -> &Table {
        self.tables.get(&kind).expect("every EntityKind has a table")
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut Table {
        self.tables.get_mut(&kind).expect("every EntityKind has a table")
    }

    /// Inserts `record` into its kind's table, assigning an id and key.
    pub fn add(&mut self, record: Entity) -> Result<u64> {
        self.table_mut(record.kind()).add(record)
    }

    /// Inserts `record` unless a structurally identical one (every
    /// non-metadata field equal) already exists in its table.
    pub fn add_if_not_exist(&mut self, record: Entity) -> Result<u64> {
        self.table_mut(record.kind()).add_if_not_exist(record)
    }

    /// Looks up a record by kind and id.
    pub fn get(&self, kind: EntityKind, id: u64) -> Option<&Entity> {
        self.table(kind).get(id)
    }

    /// Looks up a record by its canonical key, e.g. `"FLASHCARD_3"`.
    pub fn get_by_key(&self, key: &str) -> Option<&Entity> {
        let (kind, id) = studyfrog_model::key::parse_key(key)?;
        self.get(kind, id)
    }

    /// Every record of a kind, ordered by ascending id.
    pub fn get_all(&self, kind: EntityKind) -> Vec<&Entity> {
        self.table(kind).get_all()
    }

    /// Every record of a kind matching `predicate` (see [`Table::filter`]).
    pub fn filter(&self, kind: EntityKind, predicate: &[(String, serde_json::Value)]) -> Vec<&Entity> {
        self.table(kind).filter(predicate)
    }

    /// Replaces a record, refreshing its `updated_at`/`updated_on`.
    pub fn update(&mut self, record: Entity) -> Result<Entity> {
        self.table_mut(record.kind()).update(record)
    }

    /// Deletes a single record by kind and id.
    pub fn delete(&mut self, kind: EntityKind, id: u64) -> Result<u64> {
        self.table_mut(kind).delete(id)
    }

    /// Deletes several records of the same kind.
    pub fn delete_many(&mut self, kind: EntityKind, ids: &[u64]) -> Result<u64> {
        self.table_mut(kind).delete_many(ids)
    }

    /// Empties a single kind's table.
    pub fn delete_all(&mut self, kind: EntityKind) -> Result<u64> {
        self.table_mut(kind).delete_all()
    }
}

fn record_name(entity: &Entity) -> Option<String> {
    let value = serde_json::to_value(entity).ok()?;
    value.get("name")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, StorageConfig) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = StorageConfig { data_dir: dir.path().to_path_buf() };
        (dir, config)
    }

    #[test]
    fn open_seeds_default_difficulties_exactly_once() {
        let (_guard, config) = temp_config();
        let mut storage = Storage::open(&config).unwrap();
        assert_eq!(storage.get_all(EntityKind::Difficulty).len(), 3);
        // Reopening (simulating a restart) must not duplicate seeds.
        storage = Storage::open(&config).unwrap();
        assert_eq!(storage.get_all(EntityKind::Difficulty).len(), 3);
    }

    #[test]
    fn seeded_easy_difficulty_is_filterable_by_name() {
        let (_guard, config) = temp_config();
        let storage = Storage::open(&config).unwrap();
        let predicate = vec![("name".to_string(), serde_json::Value::String("easy".to_string()))];
        let matches = storage.filter(EntityKind::Difficulty, &predicate);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn get_by_key_resolves_across_kinds() {
        let (_guard, config) = temp_config();
        let mut storage = Storage::open(&config).unwrap();
        let id = storage
            .add(studyfrog_model::factory::stack("Biology", vec![], vec![], None, None, None, None, None, None, vec![]))
            .unwrap();
        let key = format!("STACK_{id}");
        assert!(storage.get_by_key(&key).is_some());
    }

    #[test]
    fn add_if_not_exist_is_idempotent_through_the_storage_facade() {
        let (_guard, config) = temp_config();
        let mut storage = Storage::open(&config).unwrap();
        let build = || studyfrog_model::factory::stack("Biology", vec![], vec![], None, None, None, None, None, None, vec![]);

        let first_id = storage.add_if_not_exist(build()).unwrap();
        let second_id = storage.add_if_not_exist(build()).unwrap();

        assert_eq!(first_id, second_id);
        assert_eq!(storage.get_all(EntityKind::Stack).len(), 1);
    }

    #[test]
    fn delete_many_removes_only_the_given_ids() {
        let (_guard, config) = temp_config();
        let mut storage = Storage::open(&config).unwrap();
        let a = storage
            .add(studyfrog_model::factory::stack("A", vec![], vec![], None, None, None, None, None, None, vec![]))
            .unwrap();
        let b = storage
            .add(studyfrog_model::factory::stack("B", vec![], vec![], None, None, None, None, None, None, vec![]))
            .unwrap();
        let c = storage
            .add(studyfrog_model::factory::stack("C", vec![], vec![], None, None, None, None, None, None, vec![]))
            .unwrap();

        storage.delete_many(EntityKind::Stack, &[a, c]).unwrap();

        assert!(storage.get(EntityKind::Stack, a).is_none());
        assert!(storage.get(EntityKind::Stack, b).is_some());
        assert!(storage.get(EntityKind::Stack, c).is_none());
    }
}
