mod support;

use serde_json::json;
use support::{doc, path, yaml};
use tree_patch::{apply_ops, find, Diff, Op, OpError, Ops, TestCheck};
use tree_patch_util::Value;

#[test]
fn find_array_element() {
    assert_eq!(find(&doc(json!([1, 2, 3])), &path("/1")).unwrap(), Value::from(2));
}

#[test]
fn find_negative_and_relative_index() {
    assert_eq!(find(&doc(json!([1, 2, 3])), &path("/3:prev")).unwrap(), Value::from(3));
}

#[test]
fn remove_by_match() {
    let out = Op::remove(path("/key=val"))
        .apply(doc(json!([{"key": "val"}, {"key": "val2"}])))
        .unwrap();
    assert_eq!(out, doc(json!([{"key": "val2"}])));
}

#[test]
fn replace_missing_with_optional() {
    let out = Op::replace(path("/abc?/efg"), 1)
        .apply(doc(json!({"xyz": "xyz"})))
        .unwrap();
    assert_eq!(out, doc(json!({"abc": {"efg": 1}, "xyz": "xyz"})));
}

#[test]
fn diff_simple_mapping() {
    let ops = Diff::new(&doc(json!({"a": 123, "b": 456})), &doc(json!({"a": 124, "c": 456})))
        .calculate();
    assert_eq!(
        ops.into_vec(),
        vec![
            Op::test_value(path("/a"), 123),
            Op::replace(path("/a"), 124),
            Op::test_value(path("/b"), 456),
            Op::remove(path("/b")),
            Op::test_absent(path("/c")),
            Op::replace(path("/c?"), 456),
        ]
    );
}

#[test]
fn diff_sequence_grow() {
    let ops = Diff::new(&doc(json!(["a"])), &doc(json!(["b", 123, 456]))).calculate();
    assert_eq!(
        ops.into_vec(),
        vec![
            Op::test_value(path("/0"), "a"),
            Op::replace(path("/0"), "b"),
            Op::test_absent(path("/1")),
            Op::replace(path("/-"), 123),
            Op::test_absent(path("/2")),
            Op::replace(path("/-"), 456),
        ]
    );
}

#[test]
fn after_last_index_must_be_last() {
    let err = Op::replace(path("/-/x"), 1).apply(doc(json!([]))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expected after last index token to be last in path '/-/'"
    );
}

#[test]
fn optional_steps_short_circuit() {
    let d = doc(json!({"a": {"b": [1]}}));
    assert_eq!(Op::remove(path("/x?/y")).apply(d.clone()).unwrap(), d);
    assert_eq!(Op::remove(path("/a/b/5?")).apply(d.clone()).unwrap(), d);
    assert_eq!(Op::test_absent(path("/x?/y")).apply(d.clone()).unwrap(), d);
    assert_eq!(find(&d, &path("/a/x?/y")).unwrap(), Value::Null);
    assert_eq!(
        Op::replace(path("/x?/y"), 1).apply(d).unwrap(),
        doc(json!({"a": {"b": [1]}, "x": {"y": 1}}))
    );
}

#[test]
fn index_wraps_once() {
    let d = doc(json!([10, 20, 30]));
    for k in 1..=3i64 {
        let at = usize::try_from(3 - k).unwrap();
        assert_eq!(
            find(&d, &path(&format!("/-{k}"))).unwrap(),
            d.as_sequence().unwrap()[at]
        );
    }
    assert!(matches!(
        find(&d, &path("/-4")),
        Err(OpError::MissingIndex { index: -4, len: 3, .. })
    ));
}

#[test]
fn replace_clones_its_value() {
    let op = Op::replace(path("/a"), doc(json!({"b": [1]})));
    let out = op.apply(doc(json!({}))).unwrap();

    let Op::Replace { mut value, .. } = op else {
        unreachable!()
    };
    if let Value::Mapping(map) = &mut value {
        map.clear();
    }
    assert_eq!(out, doc(json!({"a": {"b": [1]}})));
}

#[test]
fn descriptive_errors_name_the_operation() {
    let ops = Ops::from(vec![
        Op::replace(path("/name"), "api"),
        Op::descriptive(Op::test_absent(path("/name")), "name must not be set"),
    ]);
    let err = ops.apply(doc(json!({}))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error 'name must not be set': Expected to not find '/name'"
    );
    assert_eq!(err.root_cause(), &OpError::UnexpectedlyFound(path("/name")));
}

#[test]
fn manifest_style_patch() {
    let manifest = yaml(
        r#"
name: deployment
releases:
- name: app
  version: 1
instance_groups:
- name: web
  instances: 1
  jobs:
  - name: nginx
    properties: {port: 80}
"#,
    );
    let ops = vec![
        Op::replace(path("/releases/name=app/version"), 2),
        Op::replace(path("/instance_groups/name=web/jobs/name=nginx/properties/port"), 8080),
        Op::replace(path("/instance_groups/name=web/jobs/-"), doc(json!({"name": "syslog"}))),
        Op::replace(path("/instance_groups/name=worker?/instances"), 2),
        Op::Test {
            path: path("/instance_groups/name=web/jobs/1/name"),
            check: TestCheck::Value(Value::from("syslog")),
        },
        Op::remove(path("/instance_groups/0/jobs/name=nginx:next")),
    ];
    let out = apply_ops(manifest, &ops).unwrap();
    assert_eq!(
        out,
        yaml(
            r#"
name: deployment
releases:
- name: app
  version: 2
instance_groups:
- name: web
  instances: 1
  jobs:
  - name: nginx
    properties: {port: 8080}
- name: worker
  instances: 2
"#
        )
    );
}

#[test]
fn failed_patch_leaves_caller_copy_untouched() {
    let original = doc(json!({"a": [1, 2]}));
    let ops = vec![Op::remove(path("/a/0")), Op::remove(path("/missing"))];
    assert!(apply_ops(original.clone(), &ops).is_err());
    assert_eq!(original, doc(json!({"a": [1, 2]})));
}
