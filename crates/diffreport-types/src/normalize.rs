//! Normalization: typed input to the generic [`Value`] tree.
//!
//! A typed value is rendered through `serde` and reparsed as a weakly typed
//! tree. The diff engine only ever sees the result.

use serde::Serialize;

use crate::error::TypeError;
use crate::value::Value;

/// Normalize any serializable value into a [`Value`].
pub fn normalize<T: Serialize + ?Sized>(value: &T) -> Result<Value, TypeError> {
    serde_json::to_value(value)
        .map(Value::from)
        .map_err(|e| TypeError::Normalization(e.to_string()))
}

/// Normalize an optional value; `None` becomes [`Value::Null`].
pub fn normalize_option<T: Serialize>(value: Option<&T>) -> Result<Value, TypeError> {
    match value {
        Some(v) => normalize(v),
        None => Ok(Value::Null),
    }
}

/// Parse a JSON snapshot from text.
pub fn parse_json(text: &str) -> Result<Value, TypeError> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(Value::from)
        .map_err(|e| TypeError::InvalidJson(e.to_string()))
}

/// Parse a JSON snapshot from raw bytes.
pub fn parse_json_slice(bytes: &[u8]) -> Result<Value, TypeError> {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .map(Value::from)
        .map_err(|e| TypeError::InvalidJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;
    use serde::ser::Error as _;
    use serde::Serializer;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Representation {
        name: String,
        values: BTreeMap<String, String>,
    }

    struct Unrenderable;

    impl Serialize for Unrenderable {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot render"))
        }
    }

    #[test]
    fn struct_normalizes_to_object() {
        let repr = Representation {
            name: "Gender".into(),
            values: BTreeMap::from([("1".to_string(), "M".to_string())]),
        };
        let v = normalize(&repr).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj["name"], Value::from("Gender"));
        assert_eq!(obj["values"].kind(), Kind::Object);
    }

    #[test]
    fn none_normalizes_to_null() {
        let v = normalize_option::<Representation>(None).unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn serializer_failure_is_reported() {
        let err = normalize(&Unrenderable).unwrap_err();
        assert!(matches!(err, TypeError::Normalization(msg) if msg.contains("cannot render")));
    }

    #[test]
    fn parse_json_rejects_garbage() {
        assert!(matches!(parse_json("{not json"), Err(TypeError::InvalidJson(_))));
        assert!(parse_json_slice(b"{\"a\": 1}").is_ok());
    }
}
