use std::collections::BTreeMap;

use ipld_core::codec::Codec;
use ipld_core::ipld::Ipld;
use serde::Serialize;
use serde_ipld_dagcbor::codec::DagCborCodec;

/// Largest float that collapses to an integer without precision loss
/// (2^53 - 1, the shared safe-integer bound with javascript callers).
const MAX_SAFE_INTEGER: f64 = 9007199254740991.0;

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("document is not representable as json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode document as dag-cbor: {0}")]
    Cbor(#[from] serde_ipld_dagcbor::error::CodecError),
    #[error("document contains a non-finite number")]
    NonFiniteNumber,
}

/// Encode a document into its canonical byte representation.
///
/// The document is normalized into the IPLD data model and encoded as
/// DAG-CBOR, whose deterministic map ordering makes the output invariant
/// to key insertion order. Integral numbers inside the safe-integer range
/// encode as integers no matter how they were spelled, so `1`, `1.0` and
/// `1e0` all canonicalize identically.
pub fn encode<T: Serialize>(document: &T) -> Result<Vec<u8>, EncodingError> {
    let value = serde_json::to_value(document)?;
    let ipld = to_ipld(value)?;
    Ok(DagCborCodec::encode_to_vec(&ipld)?)
}

fn to_ipld(value: serde_json::Value) -> Result<Ipld, EncodingError> {
    let ipld = match value {
        serde_json::Value::Null => Ipld::Null,
        serde_json::Value::Bool(inner) => Ipld::Bool(inner),
        serde_json::Value::Number(number) => number_to_ipld(&number)?,
        serde_json::Value::String(inner) => Ipld::String(inner),
        serde_json::Value::Array(values) => {
            let mut list = Vec::with_capacity(values.len());
            for value in values {
                list.push(to_ipld(value)?);
            }
            Ipld::List(list)
        }
        serde_json::Value::Object(entries) => {
            let mut map = BTreeMap::new();
            for (key, value) in entries {
                map.insert(key, to_ipld(value)?);
            }
            Ipld::Map(map)
        }
    };
    Ok(ipld)
}

fn number_to_ipld(number: &serde_json::Number) -> Result<Ipld, EncodingError> {
    if let Some(signed) = number.as_i64() {
        return Ok(Ipld::Integer(signed as i128));
    }
    if let Some(unsigned) = number.as_u64() {
        return Ok(Ipld::Integer(unsigned as i128));
    }
    let float = number.as_f64().ok_or(EncodingError::NonFiniteNumber)?;
    if !float.is_finite() {
        return Err(EncodingError::NonFiniteNumber);
    }
    if float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER {
        return Ok(Ipld::Integer(float as i128));
    }
    Ok(Ipld::Float(float))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode_json(raw: &str) -> Vec<u8> {
        let value: serde_json::Value = serde_json::from_str(raw).unwrap();
        encode(&value).unwrap()
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let a = encode_json(r#"{"client_name":"app","redirect_uris":["http://127.0.0.1/cb"]}"#);
        let b = encode_json(r#"{"redirect_uris":["http://127.0.0.1/cb"],"client_name":"app"}"#);
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_spelling_is_irrelevant() {
        assert_eq!(encode_json(r#"{"n":1}"#), encode_json(r#"{"n":1.0}"#));
        assert_eq!(encode_json(r#"{"n":100}"#), encode_json(r#"{"n":1e2}"#));
        assert_eq!(encode_json(r#"{"n":1.5}"#), encode_json(r#"{"n":1.50}"#));
    }

    #[test]
    fn test_distinct_content_gets_distinct_bytes() {
        assert_ne!(encode_json(r#"{"n":1}"#), encode_json(r#"{"n":2}"#));
        assert_ne!(encode_json(r#"{"a":1}"#), encode_json(r#"{"b":1}"#));
    }

    #[test]
    fn test_known_map_encoding() {
        // dag-cbor: map(1) | text "a" | unsigned 1
        let bytes = encode(&json!({"a": 1})).unwrap();
        assert_eq!(bytes, vec![0xa1, 0x61, 0x61, 0x01]);
    }

    #[test]
    fn test_nested_values_normalize() {
        let a = encode_json(r#"{"jwks":{"keys":[{"kty":"EC","x":1.0}]}}"#);
        let b = encode_json(r#"{"jwks":{"keys":[{"x":1,"kty":"EC"}]}}"#);
        assert_eq!(a, b);
    }

    #[test]
    fn test_floats_past_the_safe_bound_stay_floats() {
        // 2^53 is past the collapse bound, so the float spelling no
        // longer converges on the integer one
        let as_float = encode(&json!({"n": 9007199254740992.0})).unwrap();
        let as_int = encode(&json!({"n": 9007199254740992u64})).unwrap();
        assert_ne!(as_float, as_int);
    }
}
