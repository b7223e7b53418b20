//! Per-type table storage for StudyFrog entities: file-backed CRUD,
//! predicate filtering, and the seed-data bootstrap.
//!
//! Every table is a simple in-memory map persisted synchronously to a
//! JSON file on each mutation: a small, specialized store for StudyFrog's
//! tagged [`studyfrog_model::Entity`] records rather than a generic
//! async trait object, since the core runs single-threaded (§5).

pub mod config;
pub mod storage;
pub mod table;

pub use config::StorageConfig;
pub use storage::Storage;
pub use table::Table;
