//! Property tests for DOM id generation.

use proptest::prelude::*;
use weft_widgets::IdPool;
use weft_widgets::id_pool::slug;

proptest! {
    #[test]
    fn slugs_use_only_id_safe_characters(input in ".{0,64}") {
        let s = slug(&input);
        prop_assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!s.starts_with('-'));
        prop_assert!(!s.ends_with('-'));
        prop_assert!(!s.contains("--"));
    }

    #[test]
    fn slug_is_idempotent(input in ".{0,64}") {
        let once = slug(&input);
        prop_assert_eq!(slug(&once), once);
    }

    #[test]
    fn ids_never_repeat_within_a_pool(
        name in "[a-zA-Z ]{1,12}",
        values in prop::collection::vec(".{0,16}", 1..24),
    ) {
        let mut pool = IdPool::new();
        let mut seen = std::collections::HashSet::new();
        for value in &values {
            let id = pool.dom_id(&name, value);
            prop_assert!(seen.insert(id.clone()), "duplicate id {:?}", id);
        }
    }
}
