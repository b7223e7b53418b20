//! Tagged entity model, uniform metadata, the Model Factory, and the
//! key/id utilities shared by every other StudyFrog crate.
//!
//! This crate has no knowledge of storage, dispatch, or the rehearsal
//! engine; it defines the shape of a record and how one is minted.
//! `studyfrog-storage` persists [`Entity`] values, `studyfrog-dispatcher`
//! routes events carrying them, and `studyfrog-engine` drives rehearsal
//! runs on top of both.

pub mod entity;
pub mod error;
pub mod factory;
pub mod key;
pub mod metadata;
pub mod seed;

pub use entity::{Entity, EntityKind};
pub use error::{Error, Result};
pub use metadata::{FieldsManifest, Metadata};
