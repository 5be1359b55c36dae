//! Operation types.

use std::ops::Deref;

use tree_patch_pointer::Pointer;
use tree_patch_util::Value;

use super::apply::{apply_op, apply_ops};
use super::error::OpError;

/// What a test operation checks at its path.
#[derive(Debug, Clone, PartialEq)]
pub enum TestCheck {
    /// The path resolves to a value equal to this one.
    Value(Value),
    /// The path resolves to nothing.
    Absent,
}

/// A patch operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Replace { path: Pointer, value: Value },
    Remove { path: Pointer },
    Test { path: Pointer, check: TestCheck },
    /// Read-only lookup; applying it yields the value at `path`.
    Find { path: Pointer },
    /// Prefixes failures of `op` with a caller-supplied message.
    Descriptive { op: Box<Op>, message: String },
}

impl Op {
    pub fn replace(path: Pointer, value: impl Into<Value>) -> Self {
        Op::Replace {
            path,
            value: value.into(),
        }
    }

    pub fn remove(path: Pointer) -> Self {
        Op::Remove { path }
    }

    pub fn test_value(path: Pointer, value: impl Into<Value>) -> Self {
        Op::Test {
            path,
            check: TestCheck::Value(value.into()),
        }
    }

    pub fn test_absent(path: Pointer) -> Self {
        Op::Test {
            path,
            check: TestCheck::Absent,
        }
    }

    pub fn find(path: Pointer) -> Self {
        Op::Find { path }
    }

    pub fn descriptive(op: Op, message: impl Into<String>) -> Self {
        Op::Descriptive {
            op: Box::new(op),
            message: message.into(),
        }
    }

    /// The path this operation addresses; descriptive wrappers report the
    /// wrapped operation's path.
    pub fn path(&self) -> &Pointer {
        match self {
            Op::Replace { path, .. }
            | Op::Remove { path }
            | Op::Test { path, .. }
            | Op::Find { path } => path,
            Op::Descriptive { op, .. } => op.path(),
        }
    }

    /// Lowercase operation name, as written in definitions.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Replace { .. } => "replace",
            Op::Remove { .. } => "remove",
            Op::Test { .. } => "test",
            Op::Find { .. } => "find",
            Op::Descriptive { op, .. } => op.name(),
        }
    }

    pub fn is_test(&self) -> bool {
        match self {
            Op::Test { .. } => true,
            Op::Descriptive { op, .. } => op.is_test(),
            _ => false,
        }
    }

    pub fn apply(&self, doc: Value) -> Result<Value, OpError> {
        apply_op(doc, self)
    }
}

/// An ordered list of operations, applied one after another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ops(pub Vec<Op>);

impl Ops {
    pub fn new() -> Self {
        Ops(Vec::new())
    }

    pub fn push(&mut self, op: Op) {
        self.0.push(op);
    }

    pub fn into_vec(self) -> Vec<Op> {
        self.0
    }

    /// Applies every operation in order. The first failure stops the run.
    ///
    /// ```
    /// use tree_patch::{Op, Ops};
    /// use tree_patch_pointer::Pointer;
    /// use tree_patch_util::Value;
    ///
    /// let ops = Ops::from(vec![
    ///     Op::replace(Pointer::parse("/name").unwrap(), "api"),
    ///     Op::test_value(Pointer::parse("/name").unwrap(), "api"),
    /// ]);
    /// let doc = ops.apply(Value::from(serde_json::json!({"name": "web"}))).unwrap();
    /// assert_eq!(doc.get("name"), Some(&Value::from("api")));
    /// ```
    pub fn apply(&self, doc: Value) -> Result<Value, OpError> {
        apply_ops(doc, &self.0)
    }
}

impl Deref for Ops {
    type Target = [Op];

    fn deref(&self) -> &[Op] {
        &self.0
    }
}

impl From<Vec<Op>> for Ops {
    fn from(ops: Vec<Op>) -> Self {
        Ops(ops)
    }
}

impl FromIterator<Op> for Ops {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Ops(iter.into_iter().collect())
    }
}

impl IntoIterator for Ops {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ops {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> Pointer {
        Pointer::parse(text).unwrap()
    }

    #[test]
    fn test_accessors() {
        let op = Op::descriptive(Op::test_absent(path("/a")), "no a");
        assert_eq!(op.path(), &path("/a"));
        assert_eq!(op.name(), "test");
        assert!(op.is_test());

        assert_eq!(Op::remove(path("/a")).name(), "remove");
        assert!(!Op::replace(path("/a"), 1).is_test());
        assert_eq!(Op::find(path("")).name(), "find");
    }

    #[test]
    fn test_ops_collects_and_derefs() {
        let ops: Ops = vec![Op::remove(path("/a")), Op::remove(path("/b"))]
            .into_iter()
            .collect();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].path(), &path("/b"));
        assert_eq!(ops.iter().filter(|op| op.is_test()).count(), 0);
    }
}
