//! Resolving array positions for index and matching-index steps.

use tree_patch_pointer::{Modifier, Pointer};
use tree_patch_util::Value;

use super::error::OpError;

/// Resolves an index step against a sequence of `len` items.
///
/// `prev`/`next` shift the index, negative indexes count from the end once,
/// and the result must address an existing item.
pub(crate) fn resolve_index(
    index: i64,
    modifiers: &[Modifier],
    len: usize,
    path: impl FnOnce() -> Pointer,
) -> Result<usize, OpError> {
    let mut raw = index;
    for modifier in modifiers {
        match modifier {
            Modifier::Prev => raw = raw.saturating_sub(1),
            Modifier::Next => raw = raw.saturating_add(1),
            other => return Err(OpError::IndexModifier(*other)),
        }
    }

    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let normalized = if raw < 0 { raw + len_i } else { raw };
    if normalized < 0 || normalized >= len_i {
        return Err(OpError::MissingIndex {
            index: raw,
            len,
            path: path(),
        });
    }
    // 0 <= normalized < len
    Ok(normalized as usize)
}

/// Where the last step of a replace puts its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    Overwrite(usize),
    Insert(usize),
}

impl Insertion {
    /// Resolves an index step that ends a replace. A trailing `before` or
    /// `after` turns the overwrite into an insertion next to the item.
    pub(crate) fn resolve(
        index: i64,
        modifiers: &[Modifier],
        len: usize,
        path: impl FnOnce() -> Pointer,
    ) -> Result<Self, OpError> {
        let mut shifts = Vec::with_capacity(modifiers.len());
        let mut anchor = None;
        for modifier in modifiers {
            if let Some(anchor) = anchor {
                return Err(OpError::InsertionModifier {
                    anchor,
                    found: *modifier,
                });
            }
            match modifier {
                Modifier::Before | Modifier::After => anchor = Some(*modifier),
                other => shifts.push(*other),
            }
        }

        let at = resolve_index(index, &shifts, len, path)?;
        Ok(match anchor {
            None => Insertion::Overwrite(at),
            Some(Modifier::After) => Insertion::Insert(at + 1),
            Some(_) => Insertion::Insert(at),
        })
    }

    pub(crate) fn apply(self, items: &mut Vec<Value>, value: Value) {
        match self {
            Insertion::Overwrite(at) => items[at] = value,
            Insertion::Insert(at) => items.insert(at, value),
        }
    }
}

/// Positions of the items that are mappings with `key` set to the string
/// `value`.
pub(crate) fn matching_indexes(items: &[Value], key: &str, value: &str) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            item.as_mapping()
                .and_then(|map| map.get(&Value::from(key)))
                .and_then(Value::as_str)
                == Some(value)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn here() -> Pointer {
        Pointer::parse("/items/0").unwrap()
    }

    #[test]
    fn test_resolve_plain_and_negative() {
        assert_eq!(resolve_index(0, &[], 3, here), Ok(0));
        assert_eq!(resolve_index(2, &[], 3, here), Ok(2));
        assert_eq!(resolve_index(-1, &[], 3, here), Ok(2));
        assert_eq!(resolve_index(-3, &[], 3, here), Ok(0));
    }

    #[test]
    fn test_resolve_out_of_range_keeps_raw_index() {
        assert_eq!(
            resolve_index(-4, &[], 3, here),
            Err(OpError::MissingIndex {
                index: -4,
                len: 3,
                path: here(),
            })
        );
        let err = resolve_index(2, &[Modifier::Next], 3, here).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected to find array index '3' but found array of length '3' for path '/items/0'"
        );
    }

    #[test]
    fn test_resolve_prev_next() {
        assert_eq!(resolve_index(1, &[Modifier::Prev], 3, here), Ok(0));
        assert_eq!(resolve_index(0, &[Modifier::Prev], 3, here), Ok(2));
        assert_eq!(
            resolve_index(0, &[Modifier::Next, Modifier::Next], 3, here),
            Ok(2)
        );
    }

    #[test]
    fn test_resolve_rejects_insertion_modifiers() {
        assert_eq!(
            resolve_index(0, &[Modifier::Before], 3, here)
                .unwrap_err()
                .to_string(),
            "Expected to find one of the following modifiers: 'prev', 'next', but found modifier 'before'"
        );
    }

    #[test]
    fn test_insertion() {
        assert_eq!(
            Insertion::resolve(1, &[], 3, here),
            Ok(Insertion::Overwrite(1))
        );
        assert_eq!(
            Insertion::resolve(1, &[Modifier::Before], 3, here),
            Ok(Insertion::Insert(1))
        );
        assert_eq!(
            Insertion::resolve(-1, &[Modifier::After], 3, here),
            Ok(Insertion::Insert(3))
        );
        assert_eq!(
            Insertion::resolve(1, &[Modifier::Prev, Modifier::After], 3, here),
            Ok(Insertion::Insert(1))
        );
        assert_eq!(
            Insertion::resolve(1, &[Modifier::After, Modifier::Prev], 3, here)
                .unwrap_err()
                .to_string(),
            "Expected to not find any modifiers after 'after' modifier, but found modifier 'prev'"
        );
    }

    #[test]
    fn test_insertion_apply() {
        let mut items = vec![Value::from(1), Value::from(2)];
        Insertion::Insert(1).apply(&mut items, Value::from(9));
        Insertion::Overwrite(0).apply(&mut items, Value::from(0));
        assert_eq!(items, vec![Value::from(0), Value::from(9), Value::from(2)]);
    }

    #[test]
    fn test_matching_indexes() {
        let items = Value::from(json!([
            {"name": "a"},
            {"name": "b", "x": 1},
            "name=b",
            {"name": "b"},
            {"name": 1}
        ]));
        let items = items.as_sequence().unwrap();
        assert_eq!(matching_indexes(items, "name", "b"), vec![1, 3]);
        assert_eq!(matching_indexes(items, "name", "1"), Vec::<usize>::new());
        assert!(matching_indexes(items, "other", "a").is_empty());
    }
}
