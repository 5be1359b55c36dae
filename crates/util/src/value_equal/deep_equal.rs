use crate::value::Value;

/// Performs a deep equality check between two values.
///
/// Numbers compare after normalization: an integral float equals the
/// integer of the same value, whatever variant holds it. Sequences compare
/// element by element; mappings compare key by key regardless of entry order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tree_patch_util::{deep_equal, Value};
///
/// let a = Value::from(json!({"foo": [1, 2, 3]}));
/// let b = Value::from(json!({"foo": [1.0, 2, 3]}));
/// let c = Value::from(json!({"foo": [1, 2, 4]}));
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,

        // Sequences
        (Value::Sequence(seq_a), Value::Sequence(seq_b)) => {
            if seq_a.len() != seq_b.len() {
                return false;
            }
            seq_a.iter().zip(seq_b).all(|(x, y)| deep_equal(x, y))
        }

        // Mappings
        (Value::Mapping(map_a), Value::Mapping(map_b)) => {
            if map_a.len() != map_b.len() {
                return false;
            }
            for (key, val_a) in map_a {
                match map_b.get(key) {
                    Some(val_b) => {
                        if !deep_equal(val_a, val_b) {
                            return false;
                        }
                    }
                    None => return false,
                }
            }
            true
        }

        // Numbers of any variant, then everything else
        _ => match (a.numeric(), b.numeric()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}
