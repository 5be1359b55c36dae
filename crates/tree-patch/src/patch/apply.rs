//! Applying operations to documents.
//!
//! Every operation takes the document by value and hands back the result.
//! Containers along the path are edited in place through `&mut` descent; if
//! an operation fails, the half-edited document is dropped with the error.

use tree_patch_pointer::{Pointer, Token};
use tree_patch_util::{Mapping, Value};

use super::error::OpError;
use super::index::{matching_indexes, resolve_index, Insertion};
use super::types::{Op, TestCheck};

/// Applies one operation.
///
/// For [`Op::Find`] the result is the value found, not the document.
pub fn apply_op(doc: Value, op: &Op) -> Result<Value, OpError> {
    match op {
        Op::Replace { path, value } => replace(doc, path, value),
        Op::Remove { path } => remove(doc, path),
        Op::Test { path, check } => test(doc, path, check),
        Op::Find { path } => find(&doc, path),
        Op::Descriptive { op, message } => {
            apply_op(doc, op).map_err(|source| OpError::Descriptive {
                message: message.clone(),
                source: Box::new(source),
            })
        }
    }
}

/// Applies operations in order, stopping at the first failure.
pub fn apply_ops(mut doc: Value, ops: &[Op]) -> Result<Value, OpError> {
    for (i, op) in ops.iter().enumerate() {
        tracing::trace!(index = i, op = op.name(), path = %op.path(), "applying operation");
        doc = apply_op(doc, op)?;
    }
    Ok(doc)
}

/// Returns the value at `path`.
///
/// Steps marked optional that resolve to nothing yield `Null`; a missing
/// matching item is stood in for by a mapping holding just the matched pair.
///
/// ```
/// use tree_patch::find;
/// use tree_patch_pointer::Pointer;
/// use tree_patch_util::Value;
///
/// let doc = Value::from(serde_json::json!({"jobs": [{"name": "api", "port": 80}]}));
/// let port = find(&doc, &Pointer::parse("/jobs/name=api/port").unwrap()).unwrap();
/// assert_eq!(port, Value::from(80));
/// let none = find(&doc, &Pointer::parse("/missing?/port").unwrap()).unwrap();
/// assert!(none.is_null());
/// ```
pub fn find(doc: &Value, path: &Pointer) -> Result<Value, OpError> {
    Ok(match lookup(doc, path)? {
        Lookup::Found(value) => value.clone(),
        Lookup::Absent(projected) => projected,
    })
}

// ── Lookup ────────────────────────────────────────────────────────────────

enum Lookup<'a> {
    Found(&'a Value),
    /// An optional step resolved to nothing; holds what find reports instead.
    Absent(Value),
}

fn lookup<'a>(doc: &'a Value, path: &Pointer) -> Result<Lookup<'a>, OpError> {
    let mut node = doc;
    for (i, token) in path.tokens().iter().enumerate().skip(1) {
        match token {
            Token::Index {
                index,
                modifiers,
                optional,
            } => {
                let items = sequence(node, path, i)?;
                match resolve_index(*index, modifiers, items.len(), || path.prefix(i + 1)) {
                    Ok(at) => node = &items[at],
                    Err(OpError::MissingIndex { .. }) if *optional => {
                        return absent_tail(path, i + 1)
                    }
                    Err(err) => return Err(err),
                }
            }
            Token::MatchingIndex {
                key,
                value,
                modifiers,
                optional,
            } => {
                let items = sequence(node, path, i)?;
                let found = matching_indexes(items, key, value);
                if found.is_empty() && *optional {
                    return project(path, i + 1, matched_pair(key, value)).map(Lookup::Absent);
                }
                let at = single_match(found, path, i)?;
                let at = resolve_index(at, modifiers, items.len(), || path.prefix(i + 1))?;
                node = &items[at];
            }
            Token::Key { key, optional } => {
                let map = mapping(node, path, i)?;
                match key_position(map, key) {
                    Some(at) => node = &map[at],
                    None if *optional => return absent_tail(path, i + 1),
                    None => return Err(missing_key(map, key, path.prefix(i + 1))),
                }
            }
            Token::AfterLastIndex => return Err(OpError::AfterLastIndexInFind(path.clone())),
            Token::Root => return Err(unexpected(token, path, i)),
        }
    }
    Ok(Lookup::Found(node))
}

/// Checks the steps after an optional key or index that resolved to nothing.
/// Only key and matching-index steps can follow; the result is `Null`.
fn absent_tail<'a>(path: &Pointer, start: usize) -> Result<Lookup<'a>, OpError> {
    for (i, token) in path.tokens().iter().enumerate().skip(start) {
        match token {
            Token::Key { .. } | Token::MatchingIndex { .. } => {}
            Token::Index { .. } => return Err(OpError::IndexAfterAbsent(path.prefix(i + 1))),
            Token::AfterLastIndex => return Err(OpError::AfterLastIndexInFind(path.clone())),
            Token::Root => return Err(unexpected(token, path, i)),
        }
    }
    Ok(Lookup::Absent(Value::Null))
}

/// Walks the steps after a matching-index step that matched nothing.
/// Further matching steps stand in a fresh mapping for their missing item;
/// index steps have nothing to index into.
fn project(path: &Pointer, start: usize, mut node: Value) -> Result<Value, OpError> {
    for (i, token) in path.tokens().iter().enumerate().skip(start) {
        node = match token {
            Token::Key { key, .. } => {
                let mut map = match node {
                    Value::Mapping(map) => map,
                    other => return Err(OpError::expected_map(path.prefix(i + 1), &other)),
                };
                match key_position(&map, key).and_then(|at| map.swap_remove_index(at)) {
                    Some((_, value)) => value,
                    None => return Ok(Value::Null),
                }
            }
            Token::MatchingIndex { key, value, .. } => matched_pair(key, value),
            Token::Index { .. } => return Err(OpError::IndexAfterAbsent(path.prefix(i + 1))),
            Token::AfterLastIndex => return Err(OpError::AfterLastIndexInFind(path.clone())),
            Token::Root => return Err(unexpected(token, path, i)),
        };
    }
    Ok(node)
}

// ── Replace ───────────────────────────────────────────────────────────────

fn replace(mut doc: Value, path: &Pointer, value: &Value) -> Result<Value, OpError> {
    let tokens = path.tokens();
    let last = tokens.len() - 1;
    if last == 0 {
        return Ok(value.clone());
    }

    let mut node = &mut doc;
    for (i, token) in tokens.iter().enumerate().skip(1) {
        let is_last = i == last;
        match token {
            Token::Index {
                index, modifiers, ..
            } => {
                let items = sequence_mut(node, path, i)?;
                if is_last {
                    Insertion::resolve(*index, modifiers, items.len(), || path.prefix(i + 1))?
                        .apply(items, value.clone());
                    break;
                }
                let at = resolve_index(*index, modifiers, items.len(), || path.prefix(i + 1))?;
                node = &mut items[at];
            }
            Token::AfterLastIndex => {
                let items = sequence_mut(node, path, i)?;
                if !is_last {
                    return Err(OpError::AfterLastIndexNotLast(path.prefix(i + 1)));
                }
                items.push(value.clone());
                break;
            }
            Token::MatchingIndex {
                key,
                value: wanted,
                modifiers,
                optional,
            } => {
                let items = sequence_mut(node, path, i)?;
                let found = matching_indexes(items, key, wanted);
                if found.is_empty() && *optional {
                    let item = if is_last {
                        value.clone()
                    } else {
                        create_item(path, i, value)?
                    };
                    items.push(item);
                    break;
                }
                let at = single_match(found, path, i)?;
                if is_last {
                    Insertion::resolve(at, modifiers, items.len(), || path.prefix(i + 1))?
                        .apply(items, value.clone());
                    break;
                }
                let at = resolve_index(at, modifiers, items.len(), || path.prefix(i + 1))?;
                node = &mut items[at];
            }
            Token::Key { key, optional } => {
                let map = mapping_mut(node, path, i)?;
                match key_position(map, key) {
                    Some(at) if is_last => {
                        map[at] = value.clone();
                        break;
                    }
                    Some(at) => node = &mut map[at],
                    None if !*optional => {
                        return Err(missing_key(map, key, path.prefix(i + 1)))
                    }
                    None => {
                        let created = if is_last {
                            value.clone()
                        } else {
                            create(path, i + 1, value)?
                        };
                        map.insert(Value::from(key.as_str()), created);
                        break;
                    }
                }
            }
            Token::Root => return Err(unexpected(token, path, i)),
        }
    }
    Ok(doc)
}

/// Builds what `path.tokens()[start..]` needs when nothing exists there yet,
/// with `value` at the deepest point.
fn create(path: &Pointer, start: usize, value: &Value) -> Result<Value, OpError> {
    let tokens = path.tokens();
    let is_last = start == tokens.len() - 1;
    let inner = || {
        if is_last {
            Ok(value.clone())
        } else {
            create(path, start + 1, value)
        }
    };

    match &tokens[start] {
        Token::Key { key, .. } => {
            let mut map = Mapping::new();
            map.insert(Value::from(key.as_str()), inner()?);
            Ok(Value::Mapping(map))
        }
        Token::Index { index: 0, .. } => Ok(Value::Sequence(vec![inner()?])),
        Token::Index { .. } => Err(OpError::CannotCreate(path.prefix(start + 1))),
        Token::AfterLastIndex if is_last => Ok(Value::Sequence(vec![value.clone()])),
        Token::AfterLastIndex => Err(OpError::AfterLastIndexNotLast(path.prefix(start + 1))),
        Token::MatchingIndex { .. } if is_last => Ok(Value::Sequence(vec![value.clone()])),
        Token::MatchingIndex { .. } => Ok(Value::Sequence(vec![create_item(path, start, value)?])),
        Token::Root => Err(unexpected(&tokens[start], path, start)),
    }
}

/// The item added for a matching-index step that matched nothing and has
/// more steps after it: the matched pair plus what those steps build.
fn create_item(path: &Pointer, at: usize, value: &Value) -> Result<Value, OpError> {
    let tokens = path.tokens();
    let Token::MatchingIndex {
        key,
        value: wanted,
        ..
    } = &tokens[at]
    else {
        return Err(unexpected(&tokens[at], path, at));
    };

    let mut item = match matched_pair(key, wanted) {
        Value::Mapping(map) => map,
        _ => Mapping::new(),
    };
    match &tokens[at + 1] {
        Token::Key { .. } => {
            if let Value::Mapping(rest) = create(path, at + 1, value)? {
                item.extend(rest);
            }
            Ok(Value::Mapping(item))
        }
        _ => Err(OpError::MismatchType {
            expected: "an array",
            path: path.prefix(at + 2),
            found: "map",
        }),
    }
}

// ── Remove ────────────────────────────────────────────────────────────────

fn remove(mut doc: Value, path: &Pointer) -> Result<Value, OpError> {
    let tokens = path.tokens();
    let last = tokens.len() - 1;
    if last == 0 {
        return Err(OpError::RemoveDocument);
    }

    let mut node = &mut doc;
    for (i, token) in tokens.iter().enumerate().skip(1) {
        let is_last = i == last;
        match token {
            Token::Index {
                index,
                modifiers,
                optional,
            } => {
                let items = sequence_mut(node, path, i)?;
                let at = match resolve_index(*index, modifiers, items.len(), || {
                    path.prefix(i + 1)
                }) {
                    Ok(at) => at,
                    Err(OpError::MissingIndex { .. }) if *optional => break,
                    Err(err) => return Err(err),
                };
                if is_last {
                    items.remove(at);
                    break;
                }
                node = &mut items[at];
            }
            Token::MatchingIndex {
                key,
                value,
                modifiers,
                optional,
            } => {
                let items = sequence_mut(node, path, i)?;
                let found = matching_indexes(items, key, value);
                if found.is_empty() && *optional {
                    break;
                }
                let at = single_match(found, path, i)?;
                let at = resolve_index(at, modifiers, items.len(), || path.prefix(i + 1))?;
                if is_last {
                    items.remove(at);
                    break;
                }
                node = &mut items[at];
            }
            Token::Key { key, optional } => {
                let map = mapping_mut(node, path, i)?;
                match key_position(map, key) {
                    Some(at) if is_last => {
                        map.shift_remove_index(at);
                        break;
                    }
                    Some(at) => node = &mut map[at],
                    None if *optional => break,
                    None => return Err(missing_key(map, key, path.prefix(i + 1))),
                }
            }
            Token::AfterLastIndex | Token::Root => return Err(unexpected(token, path, i)),
        }
    }
    Ok(doc)
}

// ── Test ──────────────────────────────────────────────────────────────────

fn test(doc: Value, path: &Pointer, check: &TestCheck) -> Result<Value, OpError> {
    match check {
        TestCheck::Value(expected) => {
            let equal = match lookup(&doc, path)? {
                Lookup::Found(found) => found == expected,
                Lookup::Absent(projected) => projected == *expected,
            };
            if !equal {
                return Err(OpError::ValueMismatch);
            }
        }
        TestCheck::Absent => match lookup(&doc, path) {
            Ok(Lookup::Absent(_)) => {}
            Ok(Lookup::Found(_)) => return Err(OpError::UnexpectedlyFound(path.clone())),
            Err(
                OpError::MissingIndex { path: at, .. } | OpError::MissingMapKey { path: at, .. },
            ) if at == *path => {}
            Err(err) => return Err(err),
        },
    }
    Ok(doc)
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// Position of the entry a key step addresses. String keys win; otherwise a
/// scalar key whose text is `key` (`1`, `true`, `null`) is used.
pub(crate) fn key_position(map: &Mapping, key: &str) -> Option<usize> {
    map.get_index_of(&Value::from(key)).or_else(|| {
        map.keys().position(|candidate| {
            !matches!(candidate, Value::String(_)) && candidate.key_text().as_deref() == Some(key)
        })
    })
}

fn missing_key(map: &Mapping, key: &str, path: Pointer) -> OpError {
    let mut siblings: Vec<String> = map
        .keys()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    siblings.sort();
    OpError::MissingMapKey {
        key: key.to_string(),
        path,
        siblings,
    }
}

fn matched_pair(key: &str, value: &str) -> Value {
    let mut map = Mapping::new();
    map.insert(Value::from(key), Value::from(value));
    Value::Mapping(map)
}

fn single_match(found: Vec<usize>, path: &Pointer, i: usize) -> Result<i64, OpError> {
    if found.len() == 1 {
        return Ok(i64::try_from(found[0]).unwrap_or(i64::MAX));
    }
    Err(OpError::MultipleMatchingIndex {
        path: path.prefix(i + 1),
        indexes: found,
    })
}

fn unexpected(token: &Token, path: &Pointer, i: usize) -> OpError {
    OpError::UnexpectedToken {
        kind: token.kind(),
        path: path.prefix(i + 1),
    }
}

fn sequence<'a>(node: &'a Value, path: &Pointer, i: usize) -> Result<&'a [Value], OpError> {
    match node {
        Value::Sequence(items) => Ok(items),
        other => Err(OpError::expected_array(path.prefix(i + 1), other)),
    }
}

fn mapping<'a>(node: &'a Value, path: &Pointer, i: usize) -> Result<&'a Mapping, OpError> {
    match node {
        Value::Mapping(map) => Ok(map),
        other => Err(OpError::expected_map(path.prefix(i + 1), other)),
    }
}

fn sequence_mut<'a>(
    node: &'a mut Value,
    path: &Pointer,
    i: usize,
) -> Result<&'a mut Vec<Value>, OpError> {
    match node {
        Value::Sequence(items) => Ok(items),
        other => Err(OpError::expected_array(path.prefix(i + 1), other)),
    }
}

fn mapping_mut<'a>(
    node: &'a mut Value,
    path: &Pointer,
    i: usize,
) -> Result<&'a mut Mapping, OpError> {
    match node {
        Value::Mapping(map) => Ok(map),
        other => Err(OpError::expected_map(path.prefix(i + 1), other)),
    }
}
