//! Head-tail encoding of argument lists and arrays

use abikit_primitives::utils::to_word;
use abikit_primitives::U256;
use tracing::trace;

use crate::primitive::encode_primitive;
use crate::types::Type;
use crate::{AbiError, Value};

/// Encode an argument list
///
/// # Example
///
/// ```
/// use abikit_codec::{encode_abi, Type, Value};
///
/// let types = [Type::parse("uint256").unwrap(), Type::parse("bytes").unwrap()];
/// let encoded = encode_abi(&types, &[Value::from(5u64), Value::Bytes(vec![1, 2])]).unwrap();
/// assert_eq!(encoded.len(), 4 * 32);
/// ```
pub fn encode_abi(types: &[Type], values: &[Value]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::Encoding(format!(
            "Wrong number of arguments: {} types, {} values",
            types.len(),
            values.len()
        )));
    }
    let items: Vec<(&Type, &Value)> = types.iter().zip(values).collect();
    encode_sequence(&items)
}

/// Parse the signatures, then [`encode_abi`]
pub fn encode_abi_str(types: &[&str], values: &[Value]) -> Result<Vec<u8>, AbiError> {
    let types = parse_all(types)?;
    encode_abi(&types, values)
}

/// Full encoding of one value, as it appears in a tail region
///
/// Arrays with a dynamic outer dimension start with the element count.
pub fn encode_type(ty: &Type, value: &Value) -> Result<Vec<u8>, AbiError> {
    let Some(dim) = ty.outer_dim() else {
        return encode_primitive(ty, value);
    };

    let elements = value.as_array().ok_or_else(|| {
        AbiError::Encoding(format!("Expected array value for {}, got {}", ty, value.kind()))
    })?;
    if dim != 0 && elements.len() != dim {
        return Err(AbiError::Encoding(format!(
            "Wrong array length for {}: got {} elements",
            ty,
            elements.len()
        )));
    }

    let sub = ty.subtype();
    let items: Vec<(&Type, &Value)> = elements.iter().map(|v| (&sub, v)).collect();
    let body = encode_sequence(&items)?;
    if dim != 0 {
        return Ok(body);
    }

    let mut out = Vec::with_capacity(body.len() + 32);
    out.extend_from_slice(&to_word(&U256::from(elements.len())));
    out.extend(body);
    Ok(out)
}

/// Lay out `items` as heads followed by tails
///
/// Offsets are relative to the start of the returned buffer.
fn encode_sequence(items: &[(&Type, &Value)]) -> Result<Vec<u8>, AbiError> {
    let head_size = items
        .iter()
        .fold(0usize, |acc, (ty, _)| acc.saturating_add(ty.head_size()));

    let mut head = Vec::with_capacity(head_size.min(1 << 16));
    let mut tail = Vec::new();
    for (ty, value) in items {
        let encoded = encode_type(ty, value)?;
        if ty.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend_from_slice(&to_word(&U256::from(offset)));
            tail.extend(encoded);
        } else {
            head.extend(encoded);
        }
    }

    trace!(
        "Encoded {} items: head {} bytes, tail {} bytes",
        items.len(),
        head.len(),
        tail.len()
    );
    head.extend(tail);
    Ok(head)
}

pub(crate) fn parse_all(signatures: &[&str]) -> Result<Vec<Type>, AbiError> {
    signatures.iter().map(|s| Type::parse(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(n: u64) -> Vec<u8> {
        to_word(&U256::from(n)).to_vec()
    }

    #[test]
    fn test_arity_mismatch() {
        assert!(matches!(
            encode_abi_str(&["uint256", "bool"], &[Value::from(1u64)]),
            Err(AbiError::Encoding(_))
        ));
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(matches!(
            encode_abi_str(&["uint7"], &[Value::from(1u64)]),
            Err(AbiError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_argument_list() {
        assert!(encode_abi(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_mixed_head_tail() {
        let encoded = encode_abi_str(
            &["uint256", "bytes"],
            &[Value::from(5u64), Value::Bytes(vec![1, 2])],
        )
        .unwrap();

        let mut expected = word(5);
        expected.extend(word(64));
        expected.extend(word(2));
        expected.extend([1, 2]);
        expected.extend([0u8; 30]);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_static_array_inline() {
        let encoded = encode_abi_str(
            &["uint8[2]", "bool"],
            &[Value::from(vec![Value::from(1u64), Value::from(2u64)]), Value::Bool(true)],
        )
        .unwrap();
        let mut expected = word(1);
        expected.extend(word(2));
        expected.extend(word(1));
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_dynamic_array_has_count() {
        let ty = Type::parse("uint256[]").unwrap();
        let encoded =
            encode_type(&ty, &Value::from(vec![Value::from(1u64), Value::from(2u64)])).unwrap();
        let mut expected = word(2);
        expected.extend(word(1));
        expected.extend(word(2));
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_array_length_mismatch() {
        let ty = Type::parse("uint256[3]").unwrap();
        assert!(matches!(
            encode_type(&ty, &Value::from(vec![Value::from(1u64)])),
            Err(AbiError::Encoding(_))
        ));
        assert!(matches!(
            encode_type(&ty, &Value::from(1u64)),
            Err(AbiError::Encoding(_))
        ));
    }

    #[test]
    fn test_second_dynamic_offset_accumulates() {
        let encoded = encode_abi_str(
            &["string", "string"],
            &[Value::from("a"), Value::from("b")],
        )
        .unwrap();
        assert_eq!(&encoded[..32], word(64).as_slice());
        assert_eq!(&encoded[32..64], word(128).as_slice());
        assert_eq!(encoded.len(), 64 + 64 + 64);
    }
}
