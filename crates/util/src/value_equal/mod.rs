//! Structural equality for [`Value`](crate::Value).
//!
//! The interpreter's test operation, the diff and mapping key lookup all
//! compare through [`deep_equal`], so they always agree.

mod deep_equal;

pub use deep_equal::deep_equal;
