//! Path-addressed patch operations over document trees.
//!
//! # Operations
//!
//! - `replace`: set the value at a path, creating missing optional steps,
//! - `remove`: delete the value at a path,
//! - `test`: check the value at a path, or that nothing is there,
//! - `find`: read the value at a path.
//!
//! Any operation can be wrapped with a message that prefixes its errors.
//! Operations are usually read from YAML or JSON definitions, see
//! [`codec::definition`].

pub mod apply;
pub mod codec;
pub mod error;
mod index;
pub mod types;

pub use apply::{apply_op, apply_ops, find};
pub use codec::definition::{
    definitions_from_ops, ops_from_definitions, ops_from_json, ops_from_yaml, ops_to_json,
    ops_to_yaml, DefinitionError, FieldError, OpDefinition,
};
pub use error::OpError;
pub use types::{Op, Ops, TestCheck};
