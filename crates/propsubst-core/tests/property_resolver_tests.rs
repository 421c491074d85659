//! Property-based tests for placeholder resolution.
//!
//! Test coverage:
//! - Values without placeholders come back byte-for-byte
//! - Lookups are idempotent and never touch the raw store
//! - A chain of references always resolves to the literal at its end
//! - Any reference ring is reported as a circular reference from every entry

use proptest::prelude::*;

use propsubst_core::{interpolation, Resolver};

/// Text that never contains a `${` sequence.
fn plain_text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _.:/{}$-]{0,40}".prop_filter("must not contain ${", |s| !s.contains("${"))
}

/// Key names in the shapes seen in real property files.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_.]{0,12}"
}

proptest! {
    #[test]
    fn plain_values_pass_through(value in plain_text_strategy()) {
        let mut resolver = Resolver::new();
        resolver.insert("key", value.clone());

        prop_assert!(!interpolation::contains_placeholder(&value));
        prop_assert_eq!(resolver.get("key").unwrap(), Some(value));
    }

    #[test]
    fn lookups_are_idempotent(
        prefix in plain_text_strategy(),
        leaf in plain_text_strategy(),
    ) {
        let mut resolver = Resolver::new();
        resolver.insert("a", format!("{}${{b}}{}", prefix, prefix));
        resolver.insert("b", "${c}");
        resolver.insert("c", leaf.clone());

        let first = resolver.get("a").unwrap();
        let second = resolver.get("a").unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, Some(format!("{}{}{}", prefix, leaf, prefix)));
        prop_assert_eq!(resolver.get_raw("b"), Some("${c}"));
    }

    #[test]
    fn reference_chains_resolve_to_leaf(
        keys in prop::collection::hash_set(key_strategy(), 1..8),
        leaf in plain_text_strategy(),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut resolver = Resolver::new();
        for pair in keys.windows(2) {
            resolver.insert(pair[0].clone(), format!("${{{}}}", pair[1]));
        }
        let last = keys.last().unwrap().clone();
        resolver.insert(last, leaf.clone());

        for key in &keys {
            prop_assert_eq!(resolver.get(key).unwrap(), Some(leaf.clone()));
        }
    }

    #[test]
    fn reference_rings_are_circular(
        keys in prop::collection::hash_set(key_strategy(), 1..8),
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let mut resolver = Resolver::new();
        for (i, key) in keys.iter().enumerate() {
            let next = &keys[(i + 1) % keys.len()];
            resolver.insert(key.clone(), format!("x${{{}}}y", next));
        }

        for key in &keys {
            let err = resolver.get(key).unwrap_err();
            prop_assert!(err.is_circular_reference());
            let chain = err.chain().unwrap();
            prop_assert_eq!(chain.len(), keys.len() + 1);
            prop_assert_eq!(chain.first(), chain.last());
        }
    }
}
