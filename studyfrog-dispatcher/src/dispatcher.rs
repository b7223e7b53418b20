//! The event registry and dispatch loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::types::{record_firing, HandlerOutcome, Payload, Response, GLOBAL};

/// A boxed handler: given the dispatch payload, returns a value or an
/// error message. Cloneable via `Arc` so the same binding can be looked
/// up, invoked, and removed without holding the registry lock across
/// the call (re-entrant `dispatch` calls need this, see §4.4.4).
pub type Handler = Arc<dyn Fn(&Payload) -> HandlerOutcome + Send + Sync>;

struct Binding {
    id: Uuid,
    function_name: String,
    priority: i32,
    persistent: bool,
    sequence: u64,
    handler: Handler,
}

/// Binds named events within a namespace to an ordered list of
/// handlers, and drives synchronous, priority-ordered, multi-subscriber
/// delivery. This is the only permitted cross-layer call path in the
/// core (§4.4); components never call each other directly.
pub struct Dispatcher {
    registry: RwLock<HashMap<(String, String), Vec<Binding>>>,
    sequence: AtomicU64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { registry: RwLock::new(HashMap::new()), sequence: AtomicU64::new(0) }
    }

    /// Binds `handler` to `(event, namespace)`. Higher `priority` runs
    /// first; ties break by registration order. `persistent = false`
    /// marks the binding one-shot: it is removed after its first firing,
    /// successful or not.
    pub fn subscribe(
        &self,
        event: impl Into<String>,
        namespace: impl Into<String>,
        function_name: impl Into<String>,
        priority: i32,
        persistent: bool,
        handler: Handler,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let binding = Binding {
            id,
            function_name: function_name.into(),
            priority,
            persistent,
            sequence,
            handler,
        };
        let key = (event.into(), namespace.into());
        let mut registry = self.registry.write();
        let bucket = registry.entry(key).or_default();
        bucket.push(binding);
        bucket.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.sequence.cmp(&b.sequence)));
        tracing::debug!(%id, priority, persistent, "subscribed handler");
        id
    }

    /// Removes a binding by id, from whichever `(event, namespace)`
    /// bucket holds it. Idempotent: unsubscribing an unknown or
    /// already-removed id is a no-op.
    pub fn unsubscribe(&self, id: Uuid) {
        let mut registry = self.registry.write();
        for bucket in registry.values_mut() {
            let before = bucket.len();
            bucket.retain(|binding| binding.id != id);
            if bucket.len() != before {
                tracing::debug!(%id, "unsubscribed handler");
                return;
            }
        }
    }

    /// Dispatches `event` in `namespace`, invoking every bound handler
    /// synchronously in priority-then-insertion order. If `namespace` is
    /// not [`GLOBAL`], handlers bound to `(event, GLOBAL)` are appended
    /// after the namespaced ones. Returns once every handler has either
    /// completed or errored; this call may itself be invoked reentrantly
    /// from within a handler (see §4.4.4).
    pub fn dispatch(&self, event: &str, namespace: &str, payload: &Payload) -> Response {
        let ordered = self.collect_bindings(event, namespace);
        let mut response = Response::default();
        let mut fired_one_shot = Vec::new();

        for (id, function_name, persistent, handler) in ordered {
            let outcome = handler(payload);
            if outcome.is_err() {
                tracing::warn!(event, namespace, function_name = %function_name, "handler raised during dispatch");
            }
            record_firing(&mut response, &function_name, outcome);
            if !persistent {
                fired_one_shot.push(id);
            }
        }

        for id in fired_one_shot {
            self.unsubscribe(id);
        }

        response
    }

    /// Fires each `(event, namespace)` pair in order against a shared
    /// payload map (or per-event payloads when `payloads` has an entry
    /// for that index). No cross-event atomicity: a failure in one
    /// event's handlers does not prevent the next event from firing.
    pub fn bulk_dispatch(
        &self,
        events: &[&str],
        namespaces: &[&str],
        payloads: &[Payload],
    ) -> Vec<Response> {
        events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let namespace = namespaces.get(index).copied().unwrap_or(GLOBAL);
                let empty = Payload::new();
                let payload = payloads.get(index).unwrap_or(&empty);
                self.dispatch(event, namespace, payload)
            })
            .collect()
    }

    fn collect_bindings(&self, event: &str, namespace: &str) -> Vec<(Uuid, String, bool, Handler)> {
        let registry = self.registry.read();
        let mut ordered = Vec::new();
        if let Some(bucket) = registry.get(&(event.to_string(), namespace.to_string())) {
            ordered.extend(bucket.iter().map(to_tuple));
        }
        if namespace != GLOBAL {
            if let Some(bucket) = registry.get(&(event.to_string(), GLOBAL.to_string())) {
                ordered.extend(bucket.iter().map(to_tuple));
            }
        }
        ordered
    }
}

fn to_tuple(binding: &Binding) -> (Uuid, String, bool, Handler) {
    (binding.id, binding.function_name.clone(), binding.persistent, binding.handler.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn handlers_fire_in_priority_then_insertion_order() {
        let dispatcher = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_a = log.clone();
        dispatcher.subscribe("tick", GLOBAL, "handler_a", 100, true, Arc::new(move |_| {
            log_a.lock().unwrap().push("a");
            Ok(serde_json::Value::Null)
        }));
        let log_b = log.clone();
        dispatcher.subscribe("tick", GLOBAL, "handler_b", 50, true, Arc::new(move |_| {
            log_b.lock().unwrap().push("b");
            Ok(serde_json::Value::Null)
        }));

        dispatcher.dispatch("tick", GLOBAL, &Payload::new());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn one_shot_handler_fires_exactly_once() {
        let dispatcher = Dispatcher::new();
        let count = Arc::new(Mutex::new(0));
        let count_handle = count.clone();
        dispatcher.subscribe("tick", GLOBAL, "handler", 0, false, Arc::new(move |_| {
            *count_handle.lock().unwrap() += 1;
            Ok(serde_json::Value::Null)
        }));

        dispatcher.dispatch("tick", GLOBAL, &Payload::new());
        dispatcher.dispatch("tick", GLOBAL, &Payload::new());

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn namespaced_dispatch_also_invokes_global_handlers_after() {
        let dispatcher = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_ns = log.clone();
        dispatcher.subscribe("tick", "study", "handler_ns", 0, true, Arc::new(move |_| {
            log_ns.lock().unwrap().push("namespaced");
            Ok(serde_json::Value::Null)
        }));
        let log_global = log.clone();
        dispatcher.subscribe("tick", GLOBAL, "handler_global", 0, true, Arc::new(move |_| {
            log_global.lock().unwrap().push("global");
            Ok(serde_json::Value::Null)
        }));

        dispatcher.dispatch("tick", "study", &Payload::new());
        assert_eq!(*log.lock().unwrap(), vec!["namespaced", "global"]);
    }

    #[test]
    fn dispatch_with_no_handlers_yields_empty_response_without_errors() {
        let dispatcher = Dispatcher::new();
        let response = dispatcher.dispatch("nothing-registered", GLOBAL, &Payload::new());
        assert!(response.buckets.is_empty());
        assert!(!response.has_errors());
    }

    #[test]
    fn unsubscribe_is_idempotent_and_empties_future_dispatches() {
        let dispatcher = Dispatcher::new();
        let id = dispatcher.subscribe("tick", GLOBAL, "handler", 0, true, Arc::new(|_| Ok(serde_json::Value::Null)));
        dispatcher.unsubscribe(id);
        dispatcher.unsubscribe(id);
        let response = dispatcher.dispatch("tick", GLOBAL, &Payload::new());
        assert!(response.buckets.is_empty());
    }

    #[test]
    fn a_raising_handler_is_recorded_and_does_not_stop_the_others() {
        let dispatcher = Dispatcher::new();
        dispatcher.subscribe("tick", GLOBAL, "failing", 100, true, Arc::new(|_| Err("boom".to_string())));
        dispatcher.subscribe("tick", GLOBAL, "succeeding", 50, true, Arc::new(|_| Ok(serde_json::Value::Bool(true))));

        let response = dispatcher.dispatch("tick", GLOBAL, &Payload::new());
        assert!(response.has_errors());
        assert_eq!(response.buckets["failing"][0].error.as_deref(), Some("boom"));
        assert_eq!(response.buckets["succeeding"][0].result, Some(serde_json::Value::Bool(true)));
    }
}
