//! Converting operations to and from their serialized definitions.

pub mod definition;
