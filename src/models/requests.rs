//! Request DTOs for the cache HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value; null or missing removes the key
/// - `ttl`: Optional TTL in milliseconds; anything but a positive number
///   (or numeric string) means no expiry
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: Option<Value>,
    /// Optional TTL in milliseconds
    #[serde(default, deserialize_with = "lenient_ttl")]
    pub ttl: Option<u64>,
}

/// Accepts any JSON value as a TTL. Positive numbers and numeric strings
/// become whole milliseconds (at least 1); everything else is no TTL.
fn lenient_ttl<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => {
            if let Some(whole) = n.as_u64() {
                return Ok(Some(whole).filter(|ms| *ms > 0));
            }
            n.as_f64()
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(millis
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| (ms as u64).max(1)))
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"key": "test", "value": {"name": "Amazon"}}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "test");
        assert_eq!(req.value, Some(json!({"name": "Amazon"})));
        assert!(req.ttl.is_none());
    }

    #[test]
    fn test_set_request_with_ttl() {
        let json = r#"{"key": "test", "value": "hello", "ttl": 1000}"#;
        let req: SetRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.ttl, Some(1000));
    }

    #[test]
    fn test_set_request_null_value() {
        let req: SetRequest = serde_json::from_str(r#"{"key": "test", "value": null}"#).unwrap();
        assert!(req.value.is_none());

        let req: SetRequest = serde_json::from_str(r#"{"key": "test"}"#).unwrap();
        assert!(req.value.is_none());
    }

    #[test]
    fn test_set_request_ignores_non_positive_ttl() {
        for ttl in ["-5", "0", "null", "true", r#""soon""#, "[1]", r#"{"ms":1}"#] {
            let json = format!(r#"{{"key": "test", "value": 1, "ttl": {}}}"#, ttl);
            let req: SetRequest = serde_json::from_str(&json).unwrap();
            assert!(req.ttl.is_none(), "ttl {} should mean no expiry", ttl);
        }
    }

    #[test]
    fn test_set_request_coerces_numeric_ttl() {
        let parse = |ttl: &str| {
            let json = format!(r#"{{"key": "test", "ttl": {}}}"#, ttl);
            serde_json::from_str::<SetRequest>(&json).unwrap().ttl
        };
        assert_eq!(parse(r#""250""#), Some(250));
        assert_eq!(parse("1500.7"), Some(1500));
        assert_eq!(parse("0.2"), Some(1));
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetRequest {
            key: "".to_string(),
            value: Some(json!("test")),
            ttl: None,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetRequest {
            key: "valid_key".to_string(),
            value: Some(json!("test")),
            ttl: Some(60),
        };
        assert!(req.validate().is_none());
    }
}
