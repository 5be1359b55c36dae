use std::cmp::Ordering;

use crate::value::Value;

/// Sort mapping keys into the order the diff visits them.
///
/// When every key is a string the order is plain lexicographic. As soon as
/// one key is something else, all keys are ordered by their YAML
/// serialization instead. The sort is stable.
///
/// # Examples
///
/// ```
/// use tree_patch_util::{sort_keys, Value};
///
/// let (b, a) = (Value::from("b"), Value::from("a"));
/// let mut keys = vec![&b, &a];
/// sort_keys(&mut keys);
/// assert_eq!(keys, vec![&a, &b]);
/// ```
pub fn sort_keys(keys: &mut [&Value]) {
    if keys.iter().all(|key| matches!(key, Value::String(_))) {
        keys.sort_by(|a, b| str_key_cmp(a, b));
    } else {
        keys.sort_by_cached_key(|key| yaml_key(key));
    }
}

fn str_key_cmp(a: &Value, b: &Value) -> Ordering {
    a.as_str().cmp(&b.as_str())
}

/// YAML rendering of a key, used as its sort key in mixed-key mappings.
pub fn yaml_key(key: &Value) -> String {
    serde_yaml::to_string(key).unwrap_or_else(|_| format!("{key:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut keys: Vec<&Value>) -> Vec<Value> {
        sort_keys(&mut keys);
        keys.into_iter().cloned().collect()
    }

    #[test]
    fn test_string_keys() {
        let (a, b, aa) = (Value::from("a"), Value::from("b"), Value::from("aa"));
        assert_eq!(sorted(vec![&b, &aa, &a]), vec![a.clone(), aa.clone(), b.clone()]);
    }

    #[test]
    fn test_mixed_keys_use_yaml_text() {
        let (ten, two, name) = (Value::from(10), Value::from(2), Value::from("name"));
        // "10\n" < "2\n" < "name\n"
        assert_eq!(
            sorted(vec![&name, &two, &ten]),
            vec![ten.clone(), two.clone(), name.clone()]
        );
    }

    #[test]
    fn test_yaml_key() {
        assert_eq!(yaml_key(&Value::from(true)), "true\n");
        assert_eq!(yaml_key(&Value::from("x")), "x\n");
    }
}
