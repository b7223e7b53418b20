//! Key/ID utilities: parsing and synthesizing canonical `"TYPE_<id>"`
//! keys, pluralizing tags into table names, and the small set of time,
//! UUID, and shuffling helpers the rest of the core relies on.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::entity::EntityKind;

/// Splits a canonical key `"TYPE_<id>"` into its tag and numeric id.
///
/// Returns `None` if the string does not match `^([A-Z_]+)_(\d+)$` or if
/// the tag portion is not a known [`EntityKind`]. Callers are expected to
/// log and skip on `None` rather than treat it as fatal — dangling or
/// malformed keys are a normal (soft-integrity) occurrence.
pub fn parse_key(key: &str) -> Option<(EntityKind, u64)> {
    let (tag_part, id_part) = key.rsplit_once('_')?;
    if tag_part.is_empty() || !tag_part.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
        return None;
    }
    if id_part.is_empty() || !id_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let id: u64 = id_part.parse().ok()?;
    let kind = EntityKind::from_tag_str(tag_part)?;
    Some((kind, id))
}

/// Synthesizes a canonical key from a tag and numeric id.
pub fn make_key(kind: EntityKind, id: u64) -> String {
    format!("{}_{}", kind.tag_str(), id)
}

/// Maps a singular, lower-case entity word to its table (file/tag) name.
///
/// Matches the irregular-plural inventory of the source application:
/// most words take a trailing `s`, but `difficulty`/`priority` take the
/// `-y -> -ies` form and the two-word `rehearsal_run*` tags pluralize
/// only their trailing noun.
pub fn pluralize(word: &str) -> String {
    match word {
        "difficulty" => "difficulties".to_string(),
        "priority" => "priorities".to_string(),
        "rehearsal_run_item" => "rehearsal_run_items".to_string(),
        "rehearsal_run" => "rehearsal_runs".to_string(),
        _ if word.ends_with('y')
            && !word.ends_with("ay")
            && !word.ends_with("ey")
            && !word.ends_with("oy")
            && !word.ends_with("uy") =>
        {
            format!("{}ies", &word[..word.len() - 1])
        }
        _ if word.ends_with('s') => word.to_string(),
        _ => format!("{word}s"),
    }
}

/// The current instant, truncated to seconds resolution per the
/// metadata contract (`created_at <= updated_at` comparisons and
/// round-trips through the on-disk JSON both assume whole seconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Today's calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Renders an instant as ISO-8601 with seconds resolution.
pub fn iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Generates a fresh UUID v4.
pub fn uuid4() -> Uuid {
    Uuid::new_v4()
}

/// Shuffles a sequence in place using the thread-local RNG.
pub fn shuffle<T>(items: &mut [T]) {
    items.shuffle(&mut rand::thread_rng());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_round_trips_through_make_key() {
        let key = make_key(EntityKind::Flashcard, 42);
        assert_eq!(key, "FLASHCARD_42");
        let (kind, id) = parse_key(&key).expect("should parse");
        assert_eq!(kind, EntityKind::Flashcard);
        assert_eq!(id, 42);
    }

    #[test]
    fn parse_key_round_trips_for_multi_word_tags() {
        let key = make_key(EntityKind::RehearsalRunItem, 7);
        assert_eq!(key, "REHEARSAL_RUN_ITEM_7");
        let (kind, id) = parse_key(&key).expect("should parse");
        assert_eq!(kind, EntityKind::RehearsalRunItem);
        assert_eq!(id, 7);
    }

    #[test]
    fn parse_key_rejects_malformed_strings() {
        assert!(parse_key("not-a-key").is_none());
        assert!(parse_key("FLASHCARD_").is_none());
        assert!(parse_key("flashcard_1").is_none());
        assert!(parse_key("FLASHCARD_1x").is_none());
        assert!(parse_key("UNKNOWN_TAG_1").is_none());
    }

    #[test]
    fn pluralize_matches_source_irregular_inventory() {
        assert_eq!(pluralize("difficulty"), "difficulties");
        assert_eq!(pluralize("priority"), "priorities");
        assert_eq!(pluralize("rehearsal_run_item"), "rehearsal_run_items");
        assert_eq!(pluralize("rehearsal_run"), "rehearsal_runs");
        assert_eq!(pluralize("flashcard"), "flashcards");
        assert_eq!(pluralize("stack"), "stacks");
        assert_eq!(pluralize("subject"), "subjects");
    }

    #[test]
    fn shuffle_preserves_multiset() {
        let mut items: Vec<i32> = (0..20).collect();
        let original = items.clone();
        shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, original);
    }
}
