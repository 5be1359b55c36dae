use std::fmt;

use crate::escape_component;
use crate::token::{Modifier, Token};

/// Writes tokens back as path text. Only the first optional step gets a `?`;
/// the parser makes every later step optional again. A later key or match
/// whose text ends in `?` or is `-` still gets one, since the parser would
/// otherwise strip that `?` or read an after-last-index step.
pub(crate) fn write_pointer(f: &mut fmt::Formatter<'_>, tokens: &[Token]) -> fmt::Result {
    let mut marked = false;
    for token in tokens {
        let mark = token.is_optional() && !marked;
        marked |= mark;
        match token {
            Token::Root => continue,
            Token::Key { key, optional } => {
                let body = escape_component(key);
                write!(f, "/{body}")?;
                write_mark(f, mark || (*optional && needs_mark(&body)))?;
            }
            Token::Index {
                index, modifiers, ..
            } => {
                write!(f, "/{index}")?;
                write_mark(f, mark)?;
                write_modifiers(f, modifiers)?;
            }
            Token::AfterLastIndex => f.write_str("/-")?,
            Token::MatchingIndex {
                key,
                value,
                modifiers,
                optional,
            } => {
                let body = format!("{}={}", escape_component(key), escape_component(value));
                write!(f, "/{body}")?;
                write_mark(f, mark || (*optional && needs_mark(&body)))?;
                write_modifiers(f, modifiers)?;
            }
        }
    }
    Ok(())
}

fn needs_mark(body: &str) -> bool {
    body == "-" || body.ends_with('?')
}

fn write_mark(f: &mut fmt::Formatter<'_>, mark: bool) -> fmt::Result {
    if mark {
        f.write_str("?")?;
    }
    Ok(())
}

fn write_modifiers(f: &mut fmt::Formatter<'_>, modifiers: &[Modifier]) -> fmt::Result {
    for modifier in modifiers {
        write!(f, ":{modifier}")?;
    }
    Ok(())
}
