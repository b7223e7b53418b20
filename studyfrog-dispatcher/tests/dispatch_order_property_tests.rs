//! Property-based tests for the dispatcher's priority-then-insertion
//! ordering guarantee (§4.4.4), complementing the handwritten examples
//! in `src/dispatcher.rs`'s `#[cfg(test)]` module with a sweep over
//! randomly generated priority assignments.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use studyfrog_dispatcher::{Dispatcher, GLOBAL};

proptest! {
    /// For any sequence of priorities assigned to handlers registered in
    /// that order, the observed firing order is a stable sort by
    /// descending priority — ties broken by registration order.
    #[test]
    fn handlers_fire_in_stable_priority_order(priorities in proptest::collection::vec(-5i32..5, 1..12)) {
        let dispatcher = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for (index, priority) in priorities.iter().enumerate() {
            let log = log.clone();
            dispatcher.subscribe(
                "tick",
                GLOBAL,
                format!("handler_{index}"),
                *priority,
                true,
                Arc::new(move |_| {
                    log.lock().unwrap().push(index);
                    Ok(serde_json::Value::Null)
                }),
            );
        }

        dispatcher.dispatch("tick", GLOBAL, &std::collections::HashMap::new());

        let mut expected: Vec<usize> = (0..priorities.len()).collect();
        expected.sort_by(|&a, &b| priorities[b].cmp(&priorities[a]).then(a.cmp(&b)));

        prop_assert_eq!(log.lock().unwrap().clone(), expected);
    }

    /// However many handlers are registered, dispatching once fires
    /// each exactly once: the response's bucket count and firing count
    /// both equal the number of registered handlers.
    #[test]
    fn every_registered_handler_fires_exactly_once(count in 0usize..12) {
        let dispatcher = Dispatcher::new();

        for index in 0..count {
            dispatcher.subscribe(
                "tick",
                GLOBAL,
                format!("handler_{index}"),
                0,
                true,
                Arc::new(|_| Ok(serde_json::Value::Null)),
            );
        }

        let response = dispatcher.dispatch("tick", GLOBAL, &std::collections::HashMap::new());
        let total_firings: usize = response.buckets.values().map(|records| records.len()).sum();
        prop_assert_eq!(total_firings, count);
        prop_assert_eq!(response.buckets.len(), count);
        prop_assert!(!response.has_errors());
    }
}
