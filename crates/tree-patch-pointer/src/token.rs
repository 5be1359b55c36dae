//! Path steps.

use std::fmt;
use std::str::FromStr;

use crate::PointerError;

/// Adjusts how an array index step resolves.
///
/// `Prev` and `Next` shift the index by one. `Before` and `After` only
/// matter on the last step of a replace, where they turn an overwrite into
/// an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Prev,
    Next,
    Before,
    After,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Prev => "prev",
            Modifier::Next => "next",
            Modifier::Before => "before",
            Modifier::After => "after",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(Modifier::Prev),
            "next" => Ok(Modifier::Next),
            "before" => Ok(Modifier::Before),
            "after" => Ok(Modifier::After),
            other => Err(PointerError::UnknownModifier(other.to_string())),
        }
    }
}

/// One step of a [`Pointer`](crate::Pointer).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// The document itself. Always, and only, the first step.
    Root,
    /// A mapping key.
    Key { key: String, optional: bool },
    /// An array position. Negative values count from the end.
    Index {
        index: i64,
        modifiers: Vec<Modifier>,
        optional: bool,
    },
    /// The slot after the last array element (`-`).
    AfterLastIndex,
    /// The single array element that is a mapping with `key` set to `value`.
    MatchingIndex {
        key: String,
        value: String,
        modifiers: Vec<Modifier>,
        optional: bool,
    },
}

impl Token {
    pub fn key(key: impl Into<String>) -> Self {
        Token::Key {
            key: key.into(),
            optional: false,
        }
    }

    pub fn optional_key(key: impl Into<String>) -> Self {
        Token::Key {
            key: key.into(),
            optional: true,
        }
    }

    pub fn index(index: i64) -> Self {
        Token::Index {
            index,
            modifiers: Vec::new(),
            optional: false,
        }
    }

    pub fn matching(key: impl Into<String>, value: impl Into<String>) -> Self {
        Token::MatchingIndex {
            key: key.into(),
            value: value.into(),
            modifiers: Vec::new(),
            optional: false,
        }
    }

    /// Name of the step kind, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Root => "root",
            Token::Key { .. } => "key",
            Token::Index { .. } => "index",
            Token::AfterLastIndex => "after last index",
            Token::MatchingIndex { .. } => "matching index",
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Token::Key { optional, .. }
            | Token::Index { optional, .. }
            | Token::MatchingIndex { optional, .. } => *optional,
            Token::Root | Token::AfterLastIndex => false,
        }
    }

    pub fn modifiers(&self) -> &[Modifier] {
        match self {
            Token::Index { modifiers, .. } | Token::MatchingIndex { modifiers, .. } => modifiers,
            _ => &[],
        }
    }

    /// Marks the step optional. Root and after-last-index steps have no
    /// optional form and are left unchanged.
    pub fn into_optional(mut self) -> Self {
        self.set_optional();
        self
    }

    pub(crate) fn set_optional(&mut self) {
        match self {
            Token::Key { optional, .. }
            | Token::Index { optional, .. }
            | Token::MatchingIndex { optional, .. } => *optional = true,
            Token::Root | Token::AfterLastIndex => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_from_str() {
        assert_eq!("prev".parse::<Modifier>(), Ok(Modifier::Prev));
        assert_eq!("after".parse::<Modifier>(), Ok(Modifier::After));
        assert_eq!(
            "first".parse::<Modifier>(),
            Err(PointerError::UnknownModifier("first".to_string()))
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Token::Root.kind(), "root");
        assert_eq!(Token::key("a").kind(), "key");
        assert_eq!(Token::index(0).kind(), "index");
        assert_eq!(Token::AfterLastIndex.kind(), "after last index");
        assert_eq!(Token::matching("a", "b").kind(), "matching index");
    }

    #[test]
    fn test_into_optional() {
        assert!(Token::index(1).into_optional().is_optional());
        assert!(Token::matching("a", "b").into_optional().is_optional());
        assert_eq!(Token::AfterLastIndex.into_optional(), Token::AfterLastIndex);
        assert_eq!(Token::key("k").into_optional(), Token::optional_key("k"));
    }
}
