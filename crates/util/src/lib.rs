//! tree-patch-util - shared value model for tree-patch
//!
//! Holds the document tree type every crate in the workspace operates on,
//! the one equality helper the interpreter and the diff agree on, and the
//! mapping key ordering the diff relies on for reproducible output.

pub mod key_cmp;
pub mod value;
pub mod value_equal;

// Re-exports for convenience
pub use key_cmp::{sort_keys, yaml_key};
pub use value::{Mapping, Value};
pub use value_equal::deep_equal;
