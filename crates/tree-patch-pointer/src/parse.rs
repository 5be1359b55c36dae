//! Path text to tokens.

use crate::pointer::Pointer;
use crate::token::{Modifier, Token};
use crate::{unescape_component, PointerError};

/// Parses path text.
///
/// # Errors
///
/// Non-empty text must start with `/`. Modifiers must be one of `prev`,
/// `next`, `before` or `after` and are rejected on `-` and key steps.
///
/// # Example
///
/// ```
/// use tree_patch_pointer::{parse_pointer, Modifier, Token};
///
/// let pointer = parse_pointer("/-1:prev:before").unwrap();
/// assert_eq!(
///     pointer.tokens()[1],
///     Token::Index {
///         index: -1,
///         modifiers: vec![Modifier::Prev, Modifier::Before],
///         optional: false,
///     }
/// );
/// assert!(parse_pointer("key").is_err());
/// ```
pub fn parse_pointer(text: &str) -> Result<Pointer, PointerError> {
    let mut tokens = vec![Token::Root];
    if text.is_empty() {
        return Ok(Pointer::from_tokens(tokens));
    }
    let rest = text
        .strip_prefix('/')
        .ok_or(PointerError::MissingLeadingSlash)?;

    let mut optional = false;
    for segment in rest.split('/') {
        tokens.push(parse_segment(segment, &mut optional)?);
    }
    Ok(Pointer::from_tokens(tokens))
}

fn parse_segment(segment: &str, optional: &mut bool) -> Result<Token, PointerError> {
    let (body, modifiers) = match segment.split_once(':') {
        Some((body, rest)) => (body, parse_modifiers(rest)?),
        None => (segment, Vec::new()),
    };
    let body = unescape_component(body);

    if body == "-" {
        if !modifiers.is_empty() {
            return Err(PointerError::AfterLastIndexModifiers);
        }
        return Ok(Token::AfterLastIndex);
    }

    let body = match body.strip_suffix('?') {
        Some(stripped) => {
            *optional = true;
            stripped
        }
        None => body.as_str(),
    };

    if let Ok(index) = body.parse::<i64>() {
        return Ok(Token::Index {
            index,
            modifiers,
            optional: *optional,
        });
    }

    if let Some((key, value)) = body.split_once('=') {
        return Ok(Token::MatchingIndex {
            key: key.to_string(),
            value: value.to_string(),
            modifiers,
            optional: *optional,
        });
    }

    if !modifiers.is_empty() {
        return Err(PointerError::KeyModifiers);
    }
    Ok(Token::Key {
        key: body.to_string(),
        optional: *optional,
    })
}

fn parse_modifiers(text: &str) -> Result<Vec<Modifier>, PointerError> {
    text.split(':').map(str::parse).collect()
}
