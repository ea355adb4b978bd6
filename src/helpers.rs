use serde_json::Value;

/// Reads a finite number out of a JSON value. Numeric strings are accepted;
/// anything else, including values that overflow to infinity, is `None`.
pub fn sanitize_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    number.is_finite().then_some(number)
}

pub fn sanitize_f64(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// First of `keys` present on `object` with a non-null value.
pub fn first_present<'a>(object: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// Follows `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_keeps_finite_numbers() {
        assert_eq!(sanitize_number(Some(&json!(42))), Some(42.0));
        assert_eq!(sanitize_number(Some(&json!(-1.5))), Some(-1.5));
        assert_eq!(sanitize_number(Some(&json!(" 12.25 "))), Some(12.25));
    }

    #[test]
    fn sanitize_rejects_everything_else() {
        assert_eq!(sanitize_number(None), None);
        assert_eq!(sanitize_number(Some(&Value::Null)), None);
        assert_eq!(sanitize_number(Some(&json!("abc"))), None);
        assert_eq!(sanitize_number(Some(&json!("NaN"))), None);
        assert_eq!(sanitize_number(Some(&json!("inf"))), None);
        assert_eq!(sanitize_number(Some(&json!(""))), None);
        assert_eq!(sanitize_number(Some(&json!(true))), None);
        assert_eq!(sanitize_number(Some(&json!({ "usd": 1 }))), None);
        assert_eq!(sanitize_number(Some(&json!([1]))), None);
        assert_eq!(sanitize_f64(f64::NAN), None);
        assert_eq!(sanitize_f64(f64::NEG_INFINITY), None);
    }

    #[test]
    fn first_present_prefers_earlier_keys() {
        let entry = json!({ "current_price": null, "usd": 3, "price": 4 });
        assert_eq!(first_present(&entry, &["current_price", "usd"]), Some(&json!(3)));
        assert_eq!(first_present(&entry, &["price", "usd"]), Some(&json!(4)));
        assert_eq!(first_present(&entry, &["missing"]), None);
    }

    #[test]
    fn lookup_walks_nested_objects() {
        let info = json!({ "blockchain": { "blocks": 7 } });
        assert_eq!(lookup(&info, &["blockchain", "blocks"]), Some(&json!(7)));
        assert_eq!(lookup(&info, &["blockchain", "headers"]), None);
        assert_eq!(lookup(&json!([1]), &["blocks"]), None);
    }
}
