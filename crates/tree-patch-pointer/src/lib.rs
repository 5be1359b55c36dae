//! Extended JSON Pointer paths.
//!
//! A path is a JSON Pointer (RFC 6901) with a few additions used when
//! patching YAML documents:
//!
//! - `-` addresses the slot after the last array element,
//! - `name=value` addresses the single array element whose `name` is `value`,
//! - a trailing `?` makes a step (and every step after it) optional,
//! - `:prev`, `:next`, `:before` and `:after` modify array index steps,
//! - `~7` escapes `:` in addition to `~0` and `~1`.
//!
//! # Example
//!
//! ```
//! use tree_patch_pointer::{Pointer, Token};
//!
//! let pointer: Pointer = "/jobs/name=api?/instances".parse().unwrap();
//! assert_eq!(pointer.tokens().len(), 4);
//! assert!(matches!(pointer.last(), Token::Key { optional: true, .. }));
//!
//! // Only the first optional step carries the `?` marker.
//! assert_eq!(pointer.to_string(), "/jobs/name=api?/instances");
//! ```

use thiserror::Error;

mod format;
pub mod parse;
pub mod pointer;
pub mod token;

pub use parse::parse_pointer;
pub use pointer::Pointer;
pub use token::{Modifier, Token};

/// Unescapes a path component.
///
/// `~0` becomes `~`, `~1` becomes `/` and `~7` becomes `:`. The input is
/// scanned once, so `~01` is `~1` and not `/`.
///
/// # Example
///
/// ```
/// use tree_patch_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("e~7f"), "e:f");
/// assert_eq!(unescape_component("no-escapes"), "no-escapes");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some('7') => out.push(':'),
            _ => {
                out.push('~');
                continue;
            }
        }
        chars.next();
    }
    out
}

/// Escapes a path component.
///
/// `~` becomes `~0`, `/` becomes `~1` and `:` becomes `~7`.
///
/// # Example
///
/// ```
/// use tree_patch_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// assert_eq!(escape_component("e:f"), "e~7f");
/// assert_eq!(escape_component("no-escapes"), "no-escapes");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains(['~', '/', ':']) {
        return component.to_string();
    }
    // ~ must be escaped first
    component
        .replace('~', "~0")
        .replace('/', "~1")
        .replace(':', "~7")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("Expected to start with '/'")]
    MissingLeadingSlash,
    #[error(
        "Expected to find one of the following modifiers: 'prev', 'next', 'before', or 'after' but found '{0}'"
    )]
    UnknownModifier(String),
    #[error("Expected not to find any modifiers with after last index token")]
    AfterLastIndexModifiers,
    #[error("Expected not to find any modifiers with key token")]
    KeyModifiers,
    #[error("Expected first token to be root")]
    MissingRoot,
    #[error("Expected only first token to be root")]
    ExtraRoot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_component() {
        assert_eq!(unescape_component("foo"), "foo");

        assert_eq!(unescape_component("a~0b"), "a~b");
        assert_eq!(unescape_component("c~1d"), "c/d");
        assert_eq!(unescape_component("m~7n"), "m:n");
        assert_eq!(unescape_component("a~0b~1c~7d"), "a~b/c:d");

        assert_eq!(unescape_component("~0~0"), "~~");
        assert_eq!(unescape_component("~1~1"), "//");
    }

    #[test]
    fn test_unescape_is_single_pass() {
        assert_eq!(unescape_component("~01"), "~1");
        assert_eq!(unescape_component("~07"), "~7");
    }

    #[test]
    fn test_unescape_leaves_unknown_sequences() {
        assert_eq!(unescape_component("~"), "~");
        assert_eq!(unescape_component("a~2b"), "a~2b");
        assert_eq!(unescape_component("~~1"), "~/");
    }

    #[test]
    fn test_escape_component() {
        assert_eq!(escape_component("foo"), "foo");

        assert_eq!(escape_component("a~b"), "a~0b");
        assert_eq!(escape_component("c/d"), "c~1d");
        assert_eq!(escape_component("m:n"), "m~7n");
        assert_eq!(escape_component("a~b/c:d"), "a~0b~1c~7d");

        assert_eq!(escape_component("~~"), "~0~0");
        assert_eq!(escape_component("//"), "~1~1");
    }

    #[test]
    fn test_escape_then_unescape() {
        for text in ["", "~1", "~0/:", "a:b:c", "/~7"] {
            assert_eq!(unescape_component(&escape_component(text)), text);
        }
    }
}
