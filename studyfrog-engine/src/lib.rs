//! The rehearsal run orchestrator (§4.5): setup, the cursor state
//! machine, termination, and per-item record bookkeeping.
//!
//! This crate is the only one in the workspace that touches both
//! `studyfrog-storage` and `studyfrog-dispatcher` at once — it is the
//! "leaf consumer" the other four crates exist to serve. It owns the
//! single process-wide active run described in §5; a second concurrent
//! [`engine::Engine::start`] is rejected rather than silently
//! overwriting the cursor, per the resolved open question in §9.

pub mod cursor;
pub mod engine;
pub mod events;
pub mod item;
pub mod logging;
pub mod setup;
mod storage_bridge;

pub use cursor::Cursor;
pub use engine::Engine;
pub use logging::init_tracing;
pub use setup::SetupForm;
