//! Errors raised while applying operations.

use thiserror::Error;
use tree_patch_pointer::{Modifier, Pointer};

/// Failure of a single operation. Paths point at the step that failed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OpError {
    /// `index` is the requested position after `prev`/`next` were applied,
    /// before negative indexes were counted from the end.
    #[error("Expected to find array index '{index}' but found array of length '{len}' for path '{path}'")]
    MissingIndex { index: i64, len: usize, path: Pointer },

    /// `siblings` lists the string keys that were present, sorted.
    #[error("Expected to find a map key '{key}' for path '{path}' ({})", describe_keys(.siblings))]
    MissingMapKey {
        key: String,
        path: Pointer,
        siblings: Vec<String>,
    },

    #[error("Expected to find exactly one matching array item for path '{path}' but found {}", .indexes.len())]
    MultipleMatchingIndex { path: Pointer, indexes: Vec<usize> },

    #[error("Expected to find {expected} at path '{path}' but found '{found}'")]
    MismatchType {
        expected: &'static str,
        path: Pointer,
        found: &'static str,
    },

    #[error("Expected to not find token '{kind}' at path '{path}'")]
    UnexpectedToken { kind: &'static str, path: Pointer },

    #[error("Expected to find one of the following modifiers: 'prev', 'next', but found modifier '{0}'")]
    IndexModifier(Modifier),

    #[error("Expected to not find any modifiers after '{anchor}' modifier, but found modifier '{found}'")]
    InsertionModifier { anchor: Modifier, found: Modifier },

    /// Holds the path up to the after-last-index step; the message shows the
    /// separator that wrongly follows it.
    #[error("Expected after last index token to be last in path '{0}/'")]
    AfterLastIndexNotLast(Pointer),

    #[error("Expected not to find after last index token in path '{0}' (not supported in find operations)")]
    AfterLastIndexInFind(Pointer),

    /// An index step followed a step that resolved to nothing.
    #[error("Expected to find key or matching index token at path '{0}'")]
    IndexAfterAbsent(Pointer),

    /// Replace could not build the missing structure for this step.
    #[error("Expected to find key, matching index or after last index token at path '{0}'")]
    CannotCreate(Pointer),

    #[error("Cannot remove entire document")]
    RemoveDocument,

    #[error("Found value does not match expected value")]
    ValueMismatch,

    #[error("Expected to not find '{0}'")]
    UnexpectedlyFound(Pointer),

    #[error("Error '{message}': {source}")]
    Descriptive {
        message: String,
        source: Box<OpError>,
    },
}

impl OpError {
    pub(crate) fn expected_array(path: Pointer, found: &tree_patch_util::Value) -> Self {
        OpError::MismatchType {
            expected: "an array",
            path,
            found: found.kind(),
        }
    }

    pub(crate) fn expected_map(path: Pointer, found: &tree_patch_util::Value) -> Self {
        OpError::MismatchType {
            expected: "a map",
            path,
            found: found.kind(),
        }
    }

    /// The innermost error, looking through descriptive wrappers.
    pub fn root_cause(&self) -> &OpError {
        match self {
            OpError::Descriptive { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn describe_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        return "found no other map keys".to_string();
    }
    let quoted: Vec<String> = keys.iter().map(|k| format!("'{k}'")).collect();
    format!("found map keys: {}", quoted.join(", "))
}
