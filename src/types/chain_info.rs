use serde_json::Value;

use crate::helpers::{lookup, sanitize_number};

/// Block height of a blockchain info payload: `blocks`, then
/// `blockchain.blocks`, then `estimatedheight`.
pub fn block_height(info: &Value) -> Option<u64> {
    [
        &["blocks"][..],
        &["blockchain", "blocks"][..],
        &["estimatedheight"][..],
    ]
    .iter()
    .filter_map(|path| lookup(info, path))
    .find(|value| !value.is_null())
    .and_then(|value| sanitize_number(Some(value)))
    .filter(|height| {
        *height >= 0.0 && height.fract() == 0.0 && *height < u64::MAX as f64
    })
    .map(|height| height as u64)
}

/// Value pool records `{ id, chainValue }` of a blockchain info payload.
pub fn value_pool_records(info: &Value) -> &[Value] {
    [&["valuePools"][..], &["blockchain", "valuePools"][..]]
        .iter()
        .filter_map(|path| lookup(info, path))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// `chainValue` of the pool with the given id, 0 when absent or not a
/// number.
pub fn chain_value(records: &[Value], id: &str) -> f64 {
    records
        .iter()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
        .and_then(|record| sanitize_number(record.get("chainValue")))
        .unwrap_or(0.0)
}
