//! Entities owned by the rehearsal run engine: the run record itself,
//! its per-item companion record, and the small value types they embed.

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// The setup-form snapshot captured into `REHEARSAL_RUN.configuration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub item_order_randomization_enabled: bool,
    pub time_counter_enabled: bool,
    pub time_limit_enabled: bool,
    pub time_limit_minutes: u32,
}

/// An elapsed-time value, always derived as `end - start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub minutes: u64,
    pub seconds: u64,
}

impl Duration {
    /// Builds a duration from a whole number of elapsed seconds.
    pub fn from_seconds(seconds: u64) -> Self {
        Self { minutes: seconds / 60, seconds }
    }
}

/// The three grading verdicts the UI can emit against the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Easy,
    Medium,
    Hard,
    Edit,
}

/// One observed cursor/grading action, appended to a
/// [`RehearsalRunItem`]'s `actions` list as it happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub at: chrono::DateTime<chrono::Utc>,
}

/// One rehearsal session: the selected stacks, the expanded/filtered
/// item list, the setup snapshot, and start/end/duration bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehearsalRun {
    pub metadata: Metadata,
    pub stacks: Vec<String>,
    pub items: Vec<String>,
    pub configuration: RunConfiguration,
    pub start: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl RehearsalRun {
    pub const FIELDS: &'static [&'static str] =
        &["stacks", "items", "configuration", "start", "end", "duration"];
}

/// The per-item record tracked for one item visited during a run.
///
/// `run` back-references the owning `REHEARSAL_RUN` key. The source
/// left this link ambiguous (association vs. back-reference, see the
/// open questions in the design notes); a plain field is the simpler
/// and more idiomatic choice here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehearsalRunItem {
    pub metadata: Metadata,
    pub run: String,
    pub item: String,
    pub actions: Vec<Action>,
    pub start: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl RehearsalRunItem {
    pub const FIELDS: &'static [&'static str] =
        &["run", "item", "actions", "start", "end", "duration"];
}
