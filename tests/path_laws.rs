//! Property-based tests for navigation lenses and copy-on-write writes.
//!
//! - **GetPut Law**: setting what was viewed leaves an equal value
//! - **PutGet Law**: viewing after a set yields what was set
//! - **PutPut Law**: the second of two sets wins
//! - **Non-mutation**: neither lenses nor controllers change the value they
//!   were given

use controllens::creators::controller_from_initial_value;
use controllens::optics::{Lens, Path, Step};
use controllens::value::Value;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1000..1000_i64).prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-c]", inner, 0..4).prop_map(Value::from),
        ]
    })
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-c]".prop_map(Step::Key),
        (0..4_usize).prop_map(Step::Index),
    ]
}

fn path() -> impl Strategy<Value = Path> {
    prop::collection::vec(step(), 0..4).prop_map(|steps| steps.into_iter().collect())
}

// =============================================================================
// Lens laws
// =============================================================================

proptest! {
    /// PutGet Law for paths: what was set is what is viewed.
    #[test]
    fn prop_path_put_get_law(source in value(), path in path(), new_value in value()) {
        let updated = path.set(&source, new_value.clone());
        prop_assert_eq!(path.view(&updated), new_value);
    }

    /// PutPut Law for paths: the second set wins.
    #[test]
    fn prop_path_put_put_law(source in value(), path in path(), first in value(), second in value()) {
        let twice = path.set(&path.set(&source, first), second.clone());
        let once = path.set(&source, second);
        prop_assert_eq!(twice, once);
    }

    /// GetPut Law for keys present in an object.
    #[test]
    fn prop_key_get_put_law(entries in prop::collection::btree_map("[a-c]", value(), 1..4)) {
        let source = Value::from(entries.clone());
        for key in entries.keys() {
            let step = Step::key(key.as_str());
            prop_assert_eq!(step.set(&source, step.view(&source)), source.clone());
        }
    }

    /// GetPut Law for in-range indices.
    #[test]
    fn prop_index_get_put_law(items in prop::collection::vec(value(), 1..5)) {
        let source = Value::from(items.clone());
        for index in 0..items.len() {
            let step = Step::index(index);
            prop_assert_eq!(step.set(&source, step.view(&source)), source.clone());
        }
    }
}

// =============================================================================
// Copy-on-write
// =============================================================================

proptest! {
    /// Setting through a path never changes the source.
    #[test]
    fn prop_path_set_does_not_mutate_source(source in value(), path in path(), new_value in value()) {
        let before = source.to_string();
        let _ = path.set(&source, new_value);
        prop_assert_eq!(source.to_string(), before);
    }

    /// A write through nested controllers matches a set through the path to
    /// the same place, and leaves the initial value alone.
    #[test]
    fn prop_controller_write_matches_path_set(source in value(), path in path(), new_value in value()) {
        let before = source.to_string();
        let root = controller_from_initial_value(source.clone());
        let target = path
            .steps()
            .iter()
            .fold(root.clone(), |controller, step| controller.get(step.clone()));

        target.set_value(new_value.clone());

        prop_assert_eq!(root.value(), path.set(&source, new_value.clone()));
        prop_assert_eq!(target.value(), new_value);
        prop_assert_eq!(source.to_string(), before);
    }

    /// Removing an index shortens the array by one and keeps the order of
    /// the rest.
    #[test]
    fn prop_remove_index(items in prop::collection::vec(scalar(), 1..6), index in 0..6_usize) {
        let root = controller_from_initial_value(Value::from(items.clone()));
        let index = index % items.len();

        root.get(index).remove().unwrap();

        let mut expected = items;
        expected.remove(index);
        prop_assert_eq!(root.value(), Value::from(expected));
    }
}
