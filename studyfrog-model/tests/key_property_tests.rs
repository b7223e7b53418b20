//! Property-based tests for the key/id utilities.
//!
//! Generated tests complement the handwritten examples in
//! `src/key.rs`'s `#[cfg(test)]` module by sweeping across every
//! [`EntityKind`] and a wide range of ids rather than a handful of
//! fixed cases.

use proptest::prelude::*;
use studyfrog_model::entity::EntityKind;
use studyfrog_model::key::{make_key, parse_key, pluralize};

fn any_kind() -> impl Strategy<Value = EntityKind> {
    proptest::sample::select(EntityKind::ALL.to_vec())
}

proptest! {
    /// `parse_key` must invert `make_key` for every kind and any id.
    #[test]
    fn make_key_then_parse_key_round_trips(kind in any_kind(), id in 0u64..1_000_000) {
        let key = make_key(kind, id);
        let parsed = parse_key(&key);
        prop_assert_eq!(parsed, Some((kind, id)));
    }

    /// A key's tag segment must never be accepted if it contains any
    /// character other than an ASCII uppercase letter or underscore.
    #[test]
    fn parse_key_rejects_any_lower_case_tag(tag in "[a-z_]{1,12}", id in 0u64..1000) {
        let key = format!("{tag}_{id}");
        prop_assert_eq!(parse_key(&key), None);
    }

    /// Pluralizing the same word twice is a no-op the second time (the
    /// irregular forms and the `-y` rule both produce an `s`-terminated
    /// result that further pluralization would leave untouched).
    #[test]
    fn pluralize_is_idempotent(word in "[a-z]{2,15}") {
        let once = pluralize(&word);
        let twice = pluralize(&once);
        prop_assert_eq!(once, twice);
    }
}
