//! [`Value`], the document tree every operation reads and rewrites.
//!
//! A value is a scalar, an ordered sequence of values, or a mapping from
//! value to value. Mappings keep insertion order and accept any scalar as a
//! key, which is what YAML decoders hand back.

mod serde_impl;

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::value_equal::deep_equal;

/// Ordered association from value to value.
pub type Mapping = IndexMap<Value, Value>;

/// A decoded YAML/JSON document node.
///
/// Equality is structural and numerically normalized: `Float(2.0)` equals
/// `Integer(2)`, and mapping equality ignores entry order.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// Any integer that fits in `i64`.
    Integer(i64),
    /// Unsigned integer > `i64::MAX`
    UInteger(u64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

/// Canonical numeric form used by equality and hashing.
///
/// Integral floats collapse onto the integer they equal; every NaN shares a
/// single bit pattern so that `Value` can be `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Numeric {
    Int(i128),
    Float(u64),
}

impl Value {
    /// Returns the name of this value's kind as shown in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) | Value::UInteger(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "array",
            Value::Mapping(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a string key in a mapping value.
    ///
    /// Returns `None` for non-mappings and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping()?.get(&Value::String(key.to_string()))
    }

    /// Text a scalar key is addressed by in a path.
    ///
    /// Strings are their own text; other scalars use their canonical
    /// rendering (`1`, `true`, `null`, `1.5`). Collections have none.
    ///
    /// ```
    /// use tree_patch_util::Value;
    ///
    /// assert_eq!(Value::from("name").key_text().as_deref(), Some("name"));
    /// assert_eq!(Value::from(8080).key_text().as_deref(), Some("8080"));
    /// assert_eq!(Value::Sequence(vec![]).key_text(), None);
    /// ```
    pub fn key_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Null => Some(Cow::Borrowed("null")),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Integer(i) => Some(Cow::Owned(i.to_string())),
            Value::UInteger(u) => Some(Cow::Owned(u.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    pub(crate) fn numeric(&self) -> Option<Numeric> {
        match self {
            Value::Integer(i) => Some(Numeric::Int(i128::from(*i))),
            Value::UInteger(u) => Some(Numeric::Int(i128::from(*u))),
            Value::Float(f) => Some(float_numeric(*f)),
            _ => None,
        }
    }
}

fn float_numeric(f: f64) -> Numeric {
    // i128::MIN as f64 is exactly -2^127, i128::MAX as f64 rounds up to 2^127
    if f.fract() == 0.0 && f >= i128::MIN as f64 && f < i128::MAX as f64 {
        Numeric::Int(f as i128)
    } else if f.is_nan() {
        Numeric::Float(f64::NAN.to_bits())
    } else {
        Numeric::Float(f.to_bits())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Integer(_) | Value::UInteger(_) | Value::Float(_) => {
                2u8.hash(state);
                self.numeric().hash(state);
            }
            Value::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Sequence(items) => {
                4u8.hash(state);
                items.len().hash(state);
                for item in items {
                    item.hash(state);
                }
            }
            Value::Mapping(map) => {
                5u8.hash(state);
                map.len().hash(state);
                // Entry order does not take part in equality, so it must not
                // take part in the hash either.
                let mut acc = 0u64;
                for (key, val) in map {
                    let mut entry = DefaultHasher::new();
                    key.hash(&mut entry);
                    val.hash(&mut entry);
                    acc = acc.wrapping_add(entry.finish());
                }
                acc.hash(state);
            }
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Integer(i64::from(u))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::UInteger(u),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Sequence(iter.into_iter().collect())
    }
}

impl FromIterator<(Value, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInteger(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Sequence(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Mapping(
                obj.into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
