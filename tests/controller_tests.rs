//! Integration tests for controllers: navigation, memoization, copy-on-write
//! and the creators.

use std::cell::RefCell;
use std::rc::Rc;

use controllens::controller::{ControllerError, Snapshot};
use controllens::creators::{
    controller_from_accessors, controller_from_initial_value, controller_from_mutable_value,
    controller_from_source,
};
use controllens::optics::standard::{number_string, value_bool, value_string};
use controllens::optics::{Path, Target};
use controllens::value;
use controllens::value::Value;
use rstest::rstest;

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_hello_world_write_leaves_original_untouched() {
    let original = value!({ "a": "Hello world" });
    let root = controller_from_initial_value(original.clone());

    root.get("a").set_value(value!("Bye"));

    assert_eq!(root.value().key("a"), value!("Bye"));
    assert_eq!(original, value!({ "a": "Hello world" }));
    assert!(!root.value().same(&original));
}

#[test]
fn test_mutable_value_is_replaced_in_place() {
    let shared = Rc::new(RefCell::new(value!({ "a": "Hello world" })));
    let before = shared.borrow().clone();
    let root = controller_from_mutable_value(Rc::clone(&shared));

    root.get("a").set_value(value!("Bye"));

    assert_eq!(*shared.borrow(), value!({ "a": "Bye" }));
    assert_eq!(before, value!({ "a": "Hello world" }));
}

#[test]
fn test_splice_scenario() {
    let root = controller_from_initial_value(value!(["Peter", "Janet", "Pam"]));

    let removed = root.splice(1, 1, Vec::new()).unwrap();

    assert_eq!(removed, vec![value!("Janet")]);
    assert_eq!(root.value(), value!(["Peter", "Pam"]));
}

#[test]
fn test_nested_structure_built_from_empty_object() {
    let root = controller_from_initial_value(value!({}));

    root.get("child").get("name").set_value(value!("Patrick"));

    assert_eq!(root.value(), value!({ "child": { "name": "Patrick" } }));
}

#[test]
fn test_nested_structure_built_from_null() {
    let root = controller_from_initial_value(Value::Null);

    root.get("rows").get(2).get("id").set_value(value!(7));

    assert_eq!(root.value(), value!({ "rows": [null, null, { "id": 7 }] }));
}

#[test]
fn test_map_scenario() {
    let root = controller_from_initial_value(value!(["Julian", "Dick"]));

    let names = root.map(|child, _| child.value()).unwrap();

    assert_eq!(names, vec![value!("Julian"), value!("Dick")]);
}

#[test]
fn test_map_on_object_is_type_mismatch() {
    let root = controller_from_initial_value(value!({ "name": "Julian" }));

    let error = root.map(|child, _| child.value()).unwrap_err();

    assert!(matches!(error, ControllerError::TypeMismatch { operation: "map", .. }));
}

// =============================================================================
// Identity stability
// =============================================================================

#[rstest]
#[case::key("name")]
#[case::nested_key("address")]
fn test_get_identity_survives_writes(#[case] key: &str) {
    let root = controller_from_initial_value(value!({ "name": "Anne", "address": {} }));
    let child = root.get(key);

    root.set_value(value!({ "name": "George", "address": { "city": "Kirrin" } }));
    child.set_value(value!("changed"));

    assert!(child.ptr_eq(&root.get(key)));
}

#[test]
fn test_snapshot_at_identity() {
    let root = controller_from_initial_value(value!({ "list": [1, 2, 3] }));

    let first = root.snapshot_at("list");
    let second = root.snapshot_at("list");
    assert!(Rc::ptr_eq(&first, &second));

    root.push_at("list", 4).unwrap();
    let third = root.snapshot_at("list");
    assert!(!Rc::ptr_eq(&first, &third));
    assert_eq!(third.value, value!([1, 2, 3, 4]));
}

#[test]
fn test_snapshot_change_function_is_stable() {
    let root = controller_from_initial_value(value!({ "a": 1 }));
    let before = root.snapshot_at("a");

    (before.change)(value!(2));
    let after = root.snapshot_at("a");

    assert!(Rc::ptr_eq(&before.change, &after.change));
    assert_eq!(after.value, value!(2));
}

#[test]
fn test_unchanged_sibling_keeps_identity() {
    let root = controller_from_initial_value(value!({ "a": [1], "b": [2] }));
    let b_before = root.get("b").value();

    root.get("a").push(5).unwrap();

    assert!(root.get("b").value().same(&b_before));
}

// =============================================================================
// Copy-on-write
// =============================================================================

#[test]
fn test_each_write_rebuilds_ancestors_once() {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let store = Rc::new(RefCell::new(value!({ "a": { "b": { "c": 1 } }, "z": [] })));
    let (reader, writer, log) = (Rc::clone(&store), Rc::clone(&store), Rc::clone(&writes));
    let root = controller_from_accessors(
        move || reader.borrow().clone(),
        move |value: Value| {
            log.borrow_mut().push(value.clone());
            *writer.borrow_mut() = value;
        },
    );
    let original = root.value();

    root.get("a").get("b").get("c").set_value(value!(2));

    assert_eq!(writes.borrow().len(), 1);
    assert_eq!(original, value!({ "a": { "b": { "c": 1 } }, "z": [] }));
    assert!(root.value().key("z").same(&original.key("z")));
}

#[test]
fn test_remove_key_and_element() {
    let root = controller_from_initial_value(value!({ "keep": 1, "drop": 2, "list": ["x", "y", "z"] }));

    root.get("drop").remove().unwrap();
    root.get("list").get(1).remove().unwrap();

    assert_eq!(root.value(), value!({ "keep": 1, "list": ["x", "z"] }));
}

#[test]
fn test_remove_root_is_unsupported() {
    let root = controller_from_initial_value(value!({}));
    assert_eq!(
        root.remove().unwrap_err(),
        ControllerError::UnsupportedOperation {
            operation: "remove",
            path: Path::root(),
        }
    );
}

#[test]
fn test_index_write_far_past_end_is_dropped() {
    let root = controller_from_initial_value(value!(["a"]));

    root.get(usize::MAX).set_value(value!(1));

    assert_eq!(root.value(), value!(["a"]));
    assert_eq!(root.get(usize::MAX).value(), Value::Null);
}

// =============================================================================
// Placeholders
// =============================================================================

#[test]
fn test_field_of_dropped_placeholder_stays_writable() {
    let rows = controller_from_initial_value(value!([]));

    let name = rows.push_new().unwrap().get("name");
    name.set_value(value!("Timmy"));
    name.set_value(value!("Timothy"));

    assert_eq!(rows.value(), value!([{ "name": "Timothy" }]));
}

#[test]
fn test_transform_of_dropped_placeholder_stays_writable() {
    let rows = controller_from_initial_value(value!([]));

    let number = rows.push_new().unwrap().transform(&Rc::new(number_string()));
    number.set_value(value!(3));

    assert_eq!(rows.value(), value!(["3"]));
}

#[test]
fn test_placeholder_follows_its_element_after_earlier_removal() {
    let rows = controller_from_initial_value(value!(["a"]));
    let row = rows.push_new().unwrap();
    row.set_value(value!("b"));

    rows.remove_at(0).unwrap();
    assert_eq!(row.value(), value!("b"));

    row.set_value(value!("c"));
    assert_eq!(rows.value(), value!(["c"]));
}

#[test]
fn test_placeholder_follows_its_element_after_splice() {
    let rows = controller_from_initial_value(value!(["a"]));
    let row = rows.push_new().unwrap();
    row.set_value(value!("b"));

    rows.splice(0, 0, vec![value!("x"), value!("y")]).unwrap();
    row.set_value(value!("c"));

    assert_eq!(rows.value(), value!(["x", "y", "a", "c"]));
}

#[test]
fn test_placeholder_follows_its_element_after_remove_matching() {
    let rows = controller_from_initial_value(value!(["a", "b"]));
    let row = rows.push_new().unwrap();
    row.set_value(value!("c"));

    let is_letter = |item: &Value, _: usize| *item != value!("c");
    rows.remove_matching(Target::This, Some(&is_letter)).unwrap();
    row.set_value(value!("d"));

    assert_eq!(rows.value(), value!(["d"]));
}

#[test]
fn test_placeholder_whose_element_was_removed_starts_over() {
    let rows = controller_from_initial_value(value!(["a"]));
    let row = rows.push_new().unwrap();
    row.set_value(value!("b"));

    rows.remove_at(1).unwrap();
    assert_eq!(row.value(), Value::Null);
    assert!(row.remove().is_err());

    row.set_value(value!("c"));
    assert_eq!(rows.value(), value!(["a", "c"]));
}

// =============================================================================
// Transforms
// =============================================================================

#[test]
fn test_transform_round_trip() {
    let root = controller_from_initial_value(value!({ "age": "7" }));
    let parse = Rc::new(number_string());
    let age = root.get("age").transform(&parse);

    assert_eq!(age.value(), value!(7));

    age.set_value(value!(8));
    assert_eq!(root.value(), value!({ "age": "8" }));
}

#[test]
fn test_transform_is_lossy() {
    let root = controller_from_initial_value(value!("007"));
    let number = root.transform(&Rc::new(number_string()));

    number.set_value(number.value());

    assert_eq!(root.value(), value!("7"));
}

#[rstest]
#[case::missing(Value::Null, "")]
#[case::text(value!("Anne"), "Anne")]
#[case::number(value!(3), "3")]
fn test_value_string_transform(#[case] initial: Value, #[case] expected: &str) {
    let root = controller_from_initial_value(value!({ "field": initial }));
    let text = root.get("field").transform(&Rc::new(value_string()));

    assert_eq!(text.value(), expected);

    text.set_value("typed".to_string());
    assert_eq!(root.value(), value!({ "field": "typed" }));
}

#[test]
fn test_bool_transform_drives_checkbox() {
    let root = controller_from_initial_value(value!({ "done": null }));
    let done = root.get("done").transform(&Rc::new(value_bool()));

    assert!(!done.value());
    done.update(|checked| !checked);
    assert_eq!(root.value(), value!({ "done": true }));
}

#[test]
fn test_transform_of_dynamic_transformer() {
    let root = controller_from_initial_value(value!("12"));
    let transformer: Rc<dyn controllens::optics::Transform<Value, Value>> = Rc::new(number_string());

    let first = root.transform(&transformer);
    let second = root.transform(&transformer);

    assert!(first.ptr_eq(&second));
    assert_eq!(first.value(), value!(12));
}

// =============================================================================
// Creators
// =============================================================================

#[test]
fn test_controller_from_source_uses_fresh_snapshots() {
    let store = Rc::new(RefCell::new(value!({ "count": 1 })));
    let shared = Rc::clone(&store);
    let root = controller_from_source(move || {
        let writer = Rc::clone(&shared);
        Snapshot::new(
            shared.borrow().clone(),
            Rc::new(move |value| *writer.borrow_mut() = value),
        )
    });

    root.get("count").set_value(value!(2));
    assert_eq!(*store.borrow(), value!({ "count": 2 }));

    *store.borrow_mut() = value!({ "count": 10 });
    assert_eq!(root.get("count").value(), value!(10));
}

#[test]
fn test_controller_over_plain_type() {
    let counter = controller_from_initial_value(0_u32);
    let increment = counter.on_change();

    increment(counter.value() + 1);
    increment(counter.value() + 1);

    assert_eq!(counter.value(), 2);
    assert!(Rc::ptr_eq(&increment, &counter.on_change()));
}

#[test]
fn test_get_this_on_array_element() {
    let root = controller_from_initial_value(value!([{ "name": "Anne" }]));
    let element = root.get(0);

    element.get(Target::This).set_value(value!({ "name": "George" }));

    assert!(element.get(Target::This).ptr_eq(&element));
    assert_eq!(root.value(), value!([{ "name": "George" }]));
}
