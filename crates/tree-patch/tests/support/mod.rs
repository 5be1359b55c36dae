#![allow(dead_code)]

use tree_patch_pointer::Pointer;
use tree_patch_util::Value;

pub fn doc(value: serde_json::Value) -> Value {
    Value::from(value)
}

pub fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).expect("fixture YAML must parse")
}

pub fn path(text: &str) -> Pointer {
    Pointer::parse(text).expect("fixture path must parse")
}
