//! Structural diff: the operations that turn one document into another.
//!
//! Every change is emitted as a test of what the left document holds
//! followed by the edit, so a diff applied to a document that drifted from
//! `left` fails instead of silently clobbering it. Unchecked diffs drop the
//! tests.

use tree_patch_pointer::{Pointer, Token};
use tree_patch_util::{sort_keys, Mapping, Value};

use crate::patch::types::{Op, Ops};

// ── Public API ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Leave test operations out of the result.
    pub unchecked: bool,
}

/// A pending comparison of two documents.
///
/// ```
/// use tree_patch::Diff;
/// use tree_patch_util::Value;
///
/// let left = Value::from(serde_json::json!({"replicas": 2}));
/// let right = Value::from(serde_json::json!({"replicas": 3}));
/// let ops = Diff::new(&left, &right).calculate();
/// assert_eq!(ops.len(), 2);
/// assert_eq!(ops.apply(left).unwrap(), right);
/// ```
#[derive(Debug, Clone)]
pub struct Diff<'a> {
    left: &'a Value,
    right: &'a Value,
    options: DiffOptions,
}

impl<'a> Diff<'a> {
    pub fn new(left: &'a Value, right: &'a Value) -> Self {
        Self::with_options(left, right, DiffOptions::default())
    }

    pub fn with_options(left: &'a Value, right: &'a Value, options: DiffOptions) -> Self {
        Diff {
            left,
            right,
            options,
        }
    }

    pub fn unchecked(mut self, unchecked: bool) -> Self {
        self.options.unchecked = unchecked;
        self
    }

    /// Computes the operations. Output order depends only on the inputs.
    pub fn calculate(&self) -> Ops {
        let mut ops = Vec::new();
        diff_at_path(&mut ops, &Pointer::root(), self.left, self.right);
        if self.options.unchecked {
            ops.retain(|op| !op.is_test());
        }
        tracing::debug!(
            count = ops.len(),
            unchecked = self.options.unchecked,
            "calculated diff"
        );
        Ops::from(ops)
    }
}

/// Shorthand for `Diff::new(left, right).calculate()`.
pub fn diff(left: &Value, right: &Value) -> Ops {
    Diff::new(left, right).calculate()
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_at_path(ops: &mut Vec<Op>, path: &Pointer, left: &Value, right: &Value) {
    match (left, right) {
        (Value::Mapping(l), Value::Mapping(r)) => diff_map(ops, path, l, r),
        (Value::Sequence(l), Value::Sequence(r)) => diff_seq(ops, path, l, r),
        _ if left == right => {}
        _ => diff_val(ops, path, left, right),
    }
}

fn diff_val(ops: &mut Vec<Op>, path: &Pointer, left: &Value, right: &Value) {
    ops.push(Op::test_value(path.clone(), left.clone()));
    ops.push(Op::replace(path.clone(), right.clone()));
}

fn diff_map(ops: &mut Vec<Op>, path: &Pointer, left: &Mapping, right: &Mapping) {
    let mut keys: Vec<&Value> = left.keys().collect();
    keys.extend(right.keys().filter(|key| !left.contains_key(*key)));
    sort_keys(&mut keys);

    // Key steps address entries by text. When that cannot pin down every
    // key the whole mapping is swapped instead.
    let Some(texts) = addressable(&keys, left) else {
        if left != right {
            diff_val(ops, path, &Value::Mapping(left.clone()), &Value::Mapping(right.clone()));
        }
        return;
    };

    for (key, text) in keys.into_iter().zip(&texts) {
        match (left.get(key), right.get(key)) {
            (Some(l), Some(r)) => diff_at_path(ops, &path.child(Token::key(text.as_str())), l, r),
            (Some(l), None) => {
                let at = path.child(Token::key(text.as_str()));
                ops.push(Op::test_value(at.clone(), l.clone()));
                ops.push(Op::remove(at));
            }
            (None, Some(r)) => {
                ops.push(Op::test_absent(path.child(Token::key(text.as_str()))));
                ops.push(Op::replace(
                    path.child(Token::optional_key(text.as_str())),
                    r.clone(),
                ));
            }
            (None, None) => {}
        }
    }
}

/// Path text for each key, or `None` when some key cannot be addressed
/// unambiguously: it has no text, two keys share a text, or a non-string key
/// would have to be created.
fn addressable(keys: &[&Value], left: &Mapping) -> Option<Vec<String>> {
    let mut texts = Vec::with_capacity(keys.len());
    for key in keys {
        if !matches!(key, Value::String(_)) && !left.contains_key(*key) {
            return None;
        }
        let text = key.key_text()?.into_owned();
        if texts.contains(&text) {
            return None;
        }
        texts.push(text);
    }
    Some(texts)
}

fn diff_seq(ops: &mut Vec<Op>, path: &Pointer, left: &[Value], right: &[Value]) {
    let mut live_index: i64 = 0;
    for i in 0..left.len().max(right.len()) {
        match (left.get(i), right.get(i)) {
            (Some(l), Some(r)) => {
                diff_at_path(ops, &path.child(Token::index(live_index)), l, r);
                live_index += 1;
            }
            (Some(l), None) => {
                // later items shift down into this slot
                let at = path.child(Token::index(live_index));
                ops.push(Op::test_value(at.clone(), l.clone()));
                ops.push(Op::remove(at));
            }
            (None, Some(r)) => {
                let at = i64::try_from(i).unwrap_or(i64::MAX);
                ops.push(Op::test_absent(path.child(Token::index(at))));
                ops.push(Op::replace(path.child(Token::AfterLastIndex), r.clone()));
                live_index += 1;
            }
            (None, None) => {}
        }
    }
}
