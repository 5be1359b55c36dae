//! Operation definitions: the record form operations take in YAML and JSON.
//!
//! ```yaml
//! - type: replace
//!   path: /instance_groups/name=web/instances
//!   value: 3
//! - type: test
//!   path: /releases/name=old?
//!   absent: true
//!   error: old release must be gone
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tree_patch_pointer::{Pointer, PointerError};
use tree_patch_util::Value;

use crate::patch::types::{Op, Ops, TestCheck};

/// One operation as written in a definitions file.
///
/// Field names are read in lowercase or PascalCase and written in
/// lowercase. An explicit `value: null` counts as a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpDefinition {
    #[serde(rename = "type", alias = "Type", default)]
    pub op_type: String,
    #[serde(alias = "Path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(
        alias = "Value",
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
    #[serde(alias = "Absent", default, skip_serializing_if = "Option::is_none")]
    pub absent: Option<bool>,
    #[serde(alias = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn deserialize_some<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Why a single definition could not be turned into an operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("Missing path")]
    MissingPath,
    #[error("Missing value")]
    MissingValue,
    #[error("Cannot specify value")]
    UnexpectedValue,
    #[error("Missing value or absent")]
    MissingValueOrAbsent,
    #[error("Cannot specify both value and absent")]
    ValueAndAbsent,
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PointerError),
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    /// `definition` is the offending record as pretty JSON, value redacted.
    #[error("{kind} operation [{index}]: {reason} within\n{definition}")]
    Invalid {
        kind: &'static str,
        index: usize,
        #[source]
        reason: FieldError,
        definition: String,
    },
    #[error("Unknown operation [{index}] with type '{op_type}' within\n{definition}")]
    UnknownType {
        index: usize,
        op_type: String,
        definition: String,
    },
    #[error("Operation [{index}]: Expected error to be non-empty string")]
    EmptyErrorMessage { index: usize },
    /// The path would read back as a different path.
    #[error("Operation [{index}]: Expected path '{path}' to read back as the same path")]
    UnrepresentablePath { index: usize, path: String },
    /// The operation has no definition form.
    #[error("Unknown operation [{index}] with type '{op_type}'")]
    Unsupported { index: usize, op_type: &'static str },
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Builds operations from definitions.
///
/// # Errors
///
/// Fails on the first definition that is incomplete, contradictory, has an
/// unparseable path or an unknown type. Errors quote the definition with its
/// value redacted.
pub fn ops_from_definitions(definitions: &[OpDefinition]) -> Result<Ops, DefinitionError> {
    let mut ops = Ops::new();
    for (index, definition) in definitions.iter().enumerate() {
        let (kind, built) = match definition.op_type.as_str() {
            "replace" => ("Replace", replace_from(definition)),
            "remove" => ("Remove", remove_from(definition)),
            "test" => ("Test", test_from(definition)),
            other => {
                return Err(DefinitionError::UnknownType {
                    index,
                    op_type: other.to_string(),
                    definition: redacted(definition),
                })
            }
        };
        let op = built.map_err(|reason| DefinitionError::Invalid {
            kind,
            index,
            reason,
            definition: redacted(definition),
        })?;

        let op = match &definition.error {
            Some(message) if message.is_empty() => {
                return Err(DefinitionError::EmptyErrorMessage { index })
            }
            Some(message) => Op::descriptive(op, message.clone()),
            None => op,
        };
        ops.push(op);
    }
    tracing::debug!(count = ops.len(), "built operations from definitions");
    Ok(ops)
}

/// Turns operations back into definitions.
///
/// Descriptive wrappers become the `error` field of the wrapped operation.
/// Find operations and doubly wrapped operations have no definition form.
pub fn definitions_from_ops(ops: &[Op]) -> Result<Vec<OpDefinition>, DefinitionError> {
    ops.iter()
        .enumerate()
        .map(|(index, op)| definition_from(index, op))
        .collect()
}

pub fn ops_from_yaml(text: &str) -> Result<Ops, DefinitionError> {
    let definitions: Vec<OpDefinition> = serde_yaml::from_str(text)?;
    ops_from_definitions(&definitions)
}

pub fn ops_from_json(text: &str) -> Result<Ops, DefinitionError> {
    let definitions: Vec<OpDefinition> = serde_json::from_str(text)?;
    ops_from_definitions(&definitions)
}

pub fn ops_to_yaml(ops: &[Op]) -> Result<String, DefinitionError> {
    Ok(serde_yaml::to_string(&definitions_from_ops(ops)?)?)
}

pub fn ops_to_json(ops: &[Op]) -> Result<String, DefinitionError> {
    Ok(serde_json::to_string_pretty(&definitions_from_ops(ops)?)?)
}

// ── Decoding ──────────────────────────────────────────────────────────────

fn parse_path(definition: &OpDefinition) -> Result<Pointer, FieldError> {
    let text = definition.path.as_deref().ok_or(FieldError::MissingPath)?;
    Ok(Pointer::parse(text)?)
}

fn replace_from(definition: &OpDefinition) -> Result<Op, FieldError> {
    if definition.path.is_none() {
        return Err(FieldError::MissingPath);
    }
    let value = definition.value.clone().ok_or(FieldError::MissingValue)?;
    Ok(Op::Replace {
        path: parse_path(definition)?,
        value,
    })
}

fn remove_from(definition: &OpDefinition) -> Result<Op, FieldError> {
    if definition.path.is_none() {
        return Err(FieldError::MissingPath);
    }
    if definition.value.is_some() {
        return Err(FieldError::UnexpectedValue);
    }
    Ok(Op::Remove {
        path: parse_path(definition)?,
    })
}

fn test_from(definition: &OpDefinition) -> Result<Op, FieldError> {
    if definition.path.is_none() {
        return Err(FieldError::MissingPath);
    }
    let check = match (&definition.value, definition.absent) {
        (None, None) => return Err(FieldError::MissingValueOrAbsent),
        (Some(_), Some(_)) => return Err(FieldError::ValueAndAbsent),
        (Some(value), None) => TestCheck::Value(value.clone()),
        (None, Some(true)) => TestCheck::Absent,
        // `absent: false` is a test for a null value
        (None, Some(false)) => TestCheck::Value(Value::Null),
    };
    Ok(Op::Test {
        path: parse_path(definition)?,
        check,
    })
}

/// Pretty JSON of a definition with its value replaced, so errors never
/// print secrets.
fn redacted(definition: &OpDefinition) -> String {
    let mut shown = definition.clone();
    if shown.value.is_some() {
        shown.value = Some(Value::from("<redacted>"));
    }
    serde_json::to_string_pretty(&shown).unwrap_or_else(|_| format!("{shown:?}"))
}

// ── Encoding ──────────────────────────────────────────────────────────────

fn definition_from(index: usize, op: &Op) -> Result<OpDefinition, DefinitionError> {
    let path = || path_text(index, op.path()).map(Some);
    Ok(match op {
        Op::Replace { value, .. } => OpDefinition {
            op_type: "replace".to_string(),
            path: path()?,
            value: Some(value.clone()),
            ..OpDefinition::default()
        },
        Op::Remove { .. } => OpDefinition {
            op_type: "remove".to_string(),
            path: path()?,
            ..OpDefinition::default()
        },
        Op::Test { check, .. } => {
            let (value, absent) = match check {
                TestCheck::Value(value) => (Some(value.clone()), None),
                TestCheck::Absent => (None, Some(true)),
            };
            OpDefinition {
                op_type: "test".to_string(),
                path: path()?,
                value,
                absent,
                ..OpDefinition::default()
            }
        }
        Op::Find { .. } => {
            return Err(DefinitionError::Unsupported {
                index,
                op_type: "find",
            })
        }
        Op::Descriptive { op: inner, message } => {
            if matches!(**inner, Op::Descriptive { .. }) {
                return Err(DefinitionError::Unsupported {
                    index,
                    op_type: "descriptive",
                });
            }
            OpDefinition {
                error: Some(message.clone()),
                ..definition_from(index, inner)?
            }
        }
    })
}

/// The path as text, provided the text reads back as the same path. Keys
/// such as `5`, `-` or `a=b` only exist as tokens built in code.
fn path_text(index: usize, path: &Pointer) -> Result<String, DefinitionError> {
    let text = path.to_string();
    match Pointer::parse(&text) {
        Ok(reparsed) if reparsed == *path => Ok(text),
        _ => Err(DefinitionError::UnrepresentablePath { index, path: text }),
    }
}
