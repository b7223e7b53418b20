//! The named-event dispatcher: the sole cross-layer call path in the
//! StudyFrog core (§4.4). Components never import each other's
//! functions; they subscribe handlers to `(event, namespace)` pairs and
//! dispatch payloads through this registry.
//!
//! The dispatch contract is synchronous, single-threaded, priority
//! ordered, and re-entrant, built on a `parking_lot::RwLock`-guarded
//! `HashMap` registry keyed by `(event, namespace)` with multi-handler
//! fan-out.

pub mod dispatcher;
pub mod types;

pub use dispatcher::{Dispatcher, Handler};
pub use types::{HandlerRecord, Payload, Response, GLOBAL};
