//! Conversion between JSON and ABI values
//!
//! Integers are accepted as JSON numbers or decimal/hex strings and printed
//! as decimal strings, since most ABI integers do not fit a JSON number.
//! Byte-valued types travel as hex strings.

use abikit_codec::{BaseType, Real, Type, Value, I256, U256};
use serde_json::Value as Json;

use crate::CliError;

/// Build the value of type `ty` described by `json`
pub fn from_json(ty: &Type, json: &Json) -> Result<Value, CliError> {
    if ty.is_array() {
        let items = json.as_array().ok_or_else(|| mismatch(ty, json))?;
        let sub = ty.subtype();
        return items
            .iter()
            .map(|item| from_json(&sub, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array);
    }

    match (ty.base(), json) {
        (BaseType::Bool, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (BaseType::Uint | BaseType::Int, Json::Number(_) | Json::String(_)) => {
            let n = integer(ty, json)?;
            if ty.base() == BaseType::Uint && !n.is_negative() {
                Ok(Value::Uint(n.abs()))
            } else {
                Ok(Value::Int(n))
            }
        }
        (BaseType::Fixed | BaseType::Ufixed, Json::Number(n)) => {
            if n.is_i64() || n.is_u64() {
                return Ok(Value::Fixed(Real::from_int(integer(ty, json)?)));
            }
            let f = n.as_f64().ok_or_else(|| mismatch(ty, json))?;
            Ok(Value::Fixed(Real::from_f64(f)?))
        }
        (BaseType::Fixed | BaseType::Ufixed, Json::String(s)) => Ok(Value::Fixed(s.parse()?)),
        (BaseType::Address, Json::Number(_)) => Ok(Value::Int(integer(ty, json)?)),
        (
            BaseType::Bytes | BaseType::Hash | BaseType::Address | BaseType::String,
            Json::String(s),
        ) => Ok(Value::String(s.clone())),
        _ => Err(mismatch(ty, json)),
    }
}

/// JSON form of a decoded value
pub fn to_json(value: &Value, hex_prefix: bool) -> Json {
    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::Uint(n) => Json::String(n.to_string()),
        Value::Int(n) => Json::String(n.to_string()),
        Value::Fixed(r) => Json::String(r.to_string()),
        Value::Bytes(bytes) => Json::String(format_hex(bytes, hex_prefix)),
        Value::String(s) => Json::String(s.clone()),
        Value::Address(addr) => Json::String(format_hex(addr.as_bytes(), hex_prefix)),
        Value::Array(items) => Json::Array(items.iter().map(|v| to_json(v, hex_prefix)).collect()),
    }
}

/// Lowercase hex, optionally `0x`-prefixed
pub fn format_hex(bytes: &[u8], prefix: bool) -> String {
    if prefix {
        format!("0x{}", hex::encode(bytes))
    } else {
        hex::encode(bytes)
    }
}

fn integer(ty: &Type, json: &Json) -> Result<I256, CliError> {
    match json {
        Json::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(I256::from(U256::from(u)))
            } else if let Some(i) = n.as_i64() {
                Ok(I256::from(i))
            } else {
                Err(CliError::InvalidInput(format!(
                    "{} is not an integer; pass fractional values for {} as a string",
                    n, ty
                )))
            }
        }
        Json::String(s) => s
            .parse()
            .map_err(|_| CliError::InvalidInput(format!("Invalid integer for {}: {}", ty, s))),
        other => Err(mismatch(ty, other)),
    }
}

fn mismatch(ty: &Type, json: &Json) -> CliError {
    CliError::InvalidInput(format!("Cannot read {} as {}", json, ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ty(sig: &str) -> Type {
        Type::parse(sig).unwrap()
    }

    #[test]
    fn test_integers() {
        assert_eq!(from_json(&ty("uint256"), &json!(5)).unwrap(), Value::from(5u64));
        assert_eq!(
            from_json(&ty("uint256"), &json!("0xff")).unwrap(),
            Value::from(255u64)
        );
        assert_eq!(from_json(&ty("int8"), &json!(-1)).unwrap(), Value::from(-1i64));
        assert_eq!(from_json(&ty("int8"), &json!("-0x10")).unwrap(), Value::from(-16i64));
        assert!(from_json(&ty("uint8"), &json!(1.5)).is_err());
        assert!(from_json(&ty("uint8"), &json!("1e3")).is_err());
    }

    #[test]
    fn test_fixed() {
        let expected = Value::Fixed("1.125".parse().unwrap());
        assert_eq!(from_json(&ty("fixed128x128"), &json!(1.125)).unwrap(), expected);
        assert_eq!(from_json(&ty("fixed128x128"), &json!("1.125")).unwrap(), expected);
        assert_eq!(
            from_json(&ty("fixed128x128"), &json!(-2)).unwrap(),
            Value::Fixed(Real::from(-2i64))
        );
    }

    #[test]
    fn test_arrays() {
        let value = from_json(&ty("uint8[][2]"), &json!([[1, 2], []])).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Array(vec![Value::from(1u64), Value::from(2u64)]),
                Value::Array(vec![]),
            ])
        );
        assert!(from_json(&ty("uint8[]"), &json!(1)).is_err());
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(from_json(&ty("bool"), &json!(1)).is_err());
        assert!(from_json(&ty("string"), &json!(1)).is_err());
        assert!(from_json(&ty("bytes"), &json!([1, 2])).is_err());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(to_json(&Value::from(-3i64), true), json!("-3"));
        assert_eq!(to_json(&Value::Bytes(vec![1, 0xab]), true), json!("0x01ab"));
        assert_eq!(to_json(&Value::Bytes(vec![1, 0xab]), false), json!("01ab"));
        assert_eq!(
            to_json(&Value::Array(vec![Value::Bool(true), Value::from("x")]), true),
            json!([true, "x"])
        );
        assert_eq!(
            to_json(&Value::Fixed("-125.125".parse().unwrap()), true),
            json!("-125.125")
        );
    }
}
