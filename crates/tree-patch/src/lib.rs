//! tree-patch - path-addressed patches and diffs for YAML/JSON documents.
//!
//! Documents are [`tree_patch_util::Value`] trees. Paths are
//! [`tree_patch_pointer::Pointer`]s: JSON Pointer plus relative index
//! modifiers, key=value matching and optional steps.
//!
//! - [`patch`] applies find, replace, remove and test operations, and reads
//!   and writes them as definitions;
//! - [`patch_diff`] computes the operations that turn one document into
//!   another.
//!
//! # Example
//!
//! ```
//! use tree_patch::{ops_from_yaml, Diff};
//! use tree_patch_util::Value;
//!
//! let doc: Value = serde_yaml::from_str("
//! jobs:
//! - name: api
//!   instances: 1
//! ").unwrap();
//!
//! let ops = ops_from_yaml("
//! - type: replace
//!   path: /jobs/name=api/instances
//!   value: 3
//! - type: replace
//!   path: /jobs/name=worker?/instances
//!   value: 1
//! ").unwrap();
//! let patched = ops.apply(doc.clone()).unwrap();
//!
//! let expected: Value = serde_yaml::from_str("
//! jobs:
//! - name: api
//!   instances: 3
//! - name: worker
//!   instances: 1
//! ").unwrap();
//! assert_eq!(patched, expected);
//!
//! // and back again
//! let undo = Diff::new(&patched, &doc).calculate();
//! assert_eq!(undo.apply(patched).unwrap(), doc);
//! ```

pub mod patch;
pub mod patch_diff;

pub use patch::{
    apply_op, apply_ops, definitions_from_ops, find, ops_from_definitions, ops_from_json,
    ops_from_yaml, ops_to_json, ops_to_yaml, DefinitionError, FieldError, Op, OpDefinition,
    OpError, Ops, TestCheck,
};
pub use patch_diff::{diff, Diff, DiffOptions};
