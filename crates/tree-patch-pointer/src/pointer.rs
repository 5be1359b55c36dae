//! Validated token sequences.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::parse::parse_pointer;
use crate::token::Token;
use crate::PointerError;

/// A path into a document: `Root` followed by zero or more steps.
///
/// Once a step is optional, every step after it is optional too; the
/// constructors enforce that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    tokens: Vec<Token>,
}

impl Pointer {
    /// The pointer to the whole document (`""`).
    pub fn root() -> Self {
        Pointer {
            tokens: vec![Token::Root],
        }
    }

    /// Builds a pointer from explicit tokens.
    ///
    /// # Errors
    ///
    /// Fails unless the first token is [`Token::Root`] and no other token is.
    ///
    /// # Example
    ///
    /// ```
    /// use tree_patch_pointer::{Pointer, Token};
    ///
    /// let pointer = Pointer::new(vec![
    ///     Token::Root,
    ///     Token::optional_key("a"),
    ///     Token::key("b"),
    /// ])
    /// .unwrap();
    /// assert!(pointer.last().is_optional());
    /// assert!(Pointer::new(vec![Token::key("a")]).is_err());
    /// ```
    pub fn new(tokens: Vec<Token>) -> Result<Self, PointerError> {
        match tokens.first() {
            Some(Token::Root) => {}
            _ => return Err(PointerError::MissingRoot),
        }
        if tokens[1..].iter().any(|t| matches!(t, Token::Root)) {
            return Err(PointerError::ExtraRoot);
        }
        Ok(Self::from_tokens(tokens))
    }

    /// Propagates optionality; callers guarantee the root invariant.
    pub(crate) fn from_tokens(mut tokens: Vec<Token>) -> Self {
        if let Some(first) = tokens.iter().position(Token::is_optional) {
            for token in &mut tokens[first + 1..] {
                token.set_optional();
            }
        }
        Pointer { tokens }
    }

    pub fn parse(text: &str) -> Result<Self, PointerError> {
        parse_pointer(text)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens, root included. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_root(&self) -> bool {
        self.tokens.len() == 1
    }

    pub fn last(&self) -> &Token {
        // the root token is always present
        &self.tokens[self.tokens.len() - 1]
    }

    /// The first `n` tokens as a pointer; at least the root is kept.
    ///
    /// ```
    /// use tree_patch_pointer::Pointer;
    ///
    /// let pointer = Pointer::parse("/a/0/b").unwrap();
    /// assert_eq!(pointer.prefix(3).to_string(), "/a/0");
    /// assert_eq!(pointer.prefix(0).to_string(), "");
    /// ```
    pub fn prefix(&self, n: usize) -> Pointer {
        let n = n.clamp(1, self.tokens.len());
        Pointer {
            tokens: self.tokens[..n].to_vec(),
        }
    }

    /// This pointer extended by one step.
    ///
    /// The new step becomes optional when any step before it is.
    pub fn child(&self, token: Token) -> Pointer {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        match token {
            // a second root can only come from a caller bug; drop it rather
            // than break the invariant
            Token::Root => {}
            token => tokens.push(token),
        }
        Self::from_tokens(tokens)
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Pointer::root()
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pointer(s)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::format::write_pointer(f, &self.tokens)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_pointer(&text).map_err(de::Error::custom)
    }
}
