use dc_matrix_calculator::safe_access::{
    ensure_object_structure, flatten_leaves, get_nested_property, safe_divide,
    set_nested_property, to_number,
};
use serde_json::{json, Value};

#[test]
fn nested_get_with_defaults() {
    let obj = json!({ "a": { "b": { "c": 3 }, "n": null }, "s": "x" });
    assert_eq!(get_nested_property(&obj, "a.b.c", json!(0)), json!(3));
    assert_eq!(get_nested_property(&obj, "a.b.z", json!(0)), json!(0));
    assert_eq!(get_nested_property(&obj, "a.n", json!("d")), json!("d"));
    assert_eq!(get_nested_property(&obj, "s.t", json!(1)), json!(1));
    assert_eq!(get_nested_property(&Value::Null, "a", json!(1)), json!(1));
    assert_eq!(get_nested_property(&obj, "", json!(9)), json!(9));
}

#[test]
fn nested_set_creates_intermediate_objects() {
    let mut obj = json!({ "a": 1 });
    assert!(set_nested_property(&mut obj, "a.b.c", json!(true)));
    assert_eq!(obj, json!({ "a": { "b": { "c": true } } }));

    let mut not_object = json!(5);
    assert!(set_nested_property(&mut not_object, "x", json!("y")));
    assert_eq!(not_object, json!({ "x": "y" }));

    let mut untouched = json!({});
    assert!(!set_nested_property(&mut untouched, "", json!(1)));
    assert_eq!(untouched, json!({}));
}

#[test]
fn ensure_structure_fills_only_missing_or_mistyped() {
    let schema = vec![
        ("a.x", json!(1.0)),
        ("a.y", json!("s")),
        ("b", json!(false)),
    ];
    let out = ensure_object_structure(&json!({ "a": { "x": 42, "y": 7 }, "extra": 1 }), &schema);
    assert_eq!(out, json!({ "a": { "x": 42, "y": "s" }, "b": false, "extra": 1 }));

    let out = ensure_object_structure(&Value::Null, &schema);
    assert_eq!(out, json!({ "a": { "x": 1.0, "y": "s" }, "b": false }));
}

#[test]
fn flatten_lists_leaf_paths() {
    let mut leaves = flatten_leaves(&json!({ "a": { "b": 1, "c": { "d": "x" } }, "e": [1] }));
    leaves.sort_by(|l, r| l.0.cmp(&r.0));
    let paths: Vec<&str> = leaves.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(paths, ["a.b", "a.c.d", "e"]);
    assert!(flatten_leaves(&json!(3)).is_empty());
}

#[test]
fn number_coercion() {
    assert_eq!(to_number(&json!(2.5), 0.0), 2.5);
    assert_eq!(to_number(&json!(" 12 "), 0.0), 12.0);
    assert_eq!(to_number(&json!("abc"), 7.0), 7.0);
    assert_eq!(to_number(&json!("inf"), 7.0), 7.0);
    assert_eq!(to_number(&json!(true), 1.0), 1.0);
    assert_eq!(to_number(&Value::Null, -1.0), -1.0);
}

#[test]
fn guarded_division() {
    assert_eq!(safe_divide(10.0, 4.0, 0.0), 2.5);
    assert_eq!(safe_divide(10.0, 0.0, 0.0), 0.0);
    assert_eq!(safe_divide(0.0, 0.0, -1.0), -1.0);
    assert_eq!(safe_divide(f64::NAN, 2.0, 3.0), 3.0);
    assert_eq!(safe_divide(1.0, f64::INFINITY, 3.0), 3.0);
    assert_eq!(safe_divide(f64::MAX, 1e-300, 0.0), 0.0);
}
