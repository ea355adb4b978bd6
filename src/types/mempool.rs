use serde_json::Value;

use crate::helpers::{first_present, sanitize_number};

/// Pending transaction count of a mempool payload: the element count of an
/// array, or the `size` (then `length`) field of an object. 0 otherwise.
pub fn mempool_size(payload: &Value) -> u64 {
    match payload {
        Value::Array(transactions) => transactions.len() as u64,
        Value::Object(_) => {
            sanitize_number(first_present(payload, &["size", "length"]))
                .filter(|size| *size > 0.0)
                .map_or(0, |size| size as u64)
        },
        _ => 0,
    }
}
