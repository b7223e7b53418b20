//! Shared value types for the dispatcher: payloads, handler results, and
//! the bucketed response shape described in §4.4.2 and the design note
//! on multi-handler returns.

use std::collections::HashMap;

use serde_json::Value;

/// The reserved namespace that always receives dispatched events, in
/// addition to (and after) any namespace-specific handlers.
pub const GLOBAL: &str = "GLOBAL";

/// The `**payload` a handler is invoked with.
pub type Payload = HashMap<String, Value>;

/// What a handler returns: a value on success, or an error message.
pub type HandlerOutcome = std::result::Result<Value, String>;

/// One handler's result from one firing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HandlerRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HandlerRecord {
    fn ok(value: Value) -> Self {
        Self { result: Some(value), error: None }
    }

    fn err(message: String) -> Self {
        Self { result: None, error: Some(message) }
    }
}

impl From<HandlerOutcome> for HandlerRecord {
    fn from(outcome: HandlerOutcome) -> Self {
        match outcome {
            Ok(value) => HandlerRecord::ok(value),
            Err(message) => HandlerRecord::err(message),
        }
    }
}

/// The full result of one `dispatch` call: every handler's firing,
/// bucketed by the handler's declared function name, in firing order.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Response {
    pub buckets: HashMap<String, Vec<HandlerRecord>>,
}

impl Response {
    /// Whether any handler firing produced an error.
    pub fn has_errors(&self) -> bool {
        self.buckets.values().any(|records| records.iter().any(|record| record.error.is_some()))
    }

    /// Convenience accessor mirroring the source's
    /// `response["function_name"][0]["result"]` access pattern: the
    /// first firing's result for a given handler name, if any.
    pub fn first_result(&self, function_name: &str) -> Option<&Value> {
        self.buckets.get(function_name)?.first()?.result.as_ref()
    }

    fn push(&mut self, function_name: &str, record: HandlerRecord) {
        self.buckets.entry(function_name.to_string()).or_default().push(record);
    }
}

pub(crate) fn record_firing(response: &mut Response, function_name: &str, outcome: HandlerOutcome) {
    response.push(function_name, outcome.into());
}
