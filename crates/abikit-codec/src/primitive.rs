//! Encoding and decoding of single scalar values

use std::borrow::Cow;

use abikit_primitives::utils::{ceil32, decode_hex, read_word, rpad, to_word, word_to_usize, zpad};
use abikit_primitives::{Address, I256, U256, WORD_SIZE};

use crate::types::{BaseType, Sub, Type};
use crate::{AbiError, Real, Value};

/// Encode one scalar value
///
/// Static types produce exactly one word. `bytes` and `string` produce a
/// length word followed by the zero-padded payload.
pub fn encode_primitive(ty: &Type, value: &Value) -> Result<Vec<u8>, AbiError> {
    if ty.is_array() {
        return Err(AbiError::Encoding(format!(
            "{} is an array type, not a primitive",
            ty
        )));
    }

    match (ty.base(), ty.sub()) {
        (BaseType::Bool, _) => match value {
            Value::Bool(b) => Ok(to_word(&U256::from(u8::from(*b))).to_vec()),
            other => Err(mismatch(ty, other)),
        },
        (BaseType::Uint, Sub::Size(bits)) => {
            let n = integer(ty, value)?;
            if n.is_negative() || n.abs().bits() > bits {
                return Err(out_of_bounds(ty, &n));
            }
            Ok(to_word(&n.abs()).to_vec())
        }
        (BaseType::Int, Sub::Size(bits)) => {
            let n = integer(ty, value)?;
            if !n.fits_bits(bits) {
                return Err(out_of_bounds(ty, &n));
            }
            Ok(to_word(&n.to_twos_complement()).to_vec())
        }
        (BaseType::Ufixed | BaseType::Fixed, Sub::Real { high, low }) => {
            let real = to_real(ty, value)?;
            let scaled = real.scale(low as u32)?;
            let bits = high + low;
            let in_range = if ty.base() == BaseType::Ufixed {
                !scaled.is_negative() && scaled.abs().bits() <= bits
            } else {
                scaled.fits_bits(bits)
            };
            if !in_range {
                return Err(AbiError::ValueOutOfBounds(format!(
                    "{} does not fit in {}",
                    real, ty
                )));
            }
            Ok(to_word(&scaled.to_twos_complement()).to_vec())
        }
        (BaseType::Bytes, Sub::None) => Ok(encode_dynamic(&byte_payload(ty, value)?)),
        (BaseType::Bytes, Sub::Size(size)) => {
            let payload = byte_payload(ty, value)?;
            if payload.len() > size {
                return Err(AbiError::ValueOutOfBounds(format!(
                    "{} bytes do not fit in {}",
                    payload.len(),
                    ty
                )));
            }
            Ok(rpad(&payload, 0, WORD_SIZE))
        }
        (BaseType::String, _) => {
            let payload: &[u8] = match value {
                Value::String(s) => s.as_bytes(),
                Value::Bytes(b) => b,
                other => return Err(mismatch(ty, other)),
            };
            Ok(encode_dynamic(payload))
        }
        (BaseType::Hash, Sub::Size(size)) => {
            if size == 0 || size > WORD_SIZE {
                return Err(AbiError::Encoding(format!("{} must be 1 to 32 bytes", ty)));
            }
            let payload = match value {
                Value::Bytes(b) if b.len() == size => Cow::Borrowed(b.as_slice()),
                Value::String(s) if hex_digits(s).len() == size * 2 => {
                    Cow::Owned(decode_hex(s).map_err(AbiError::encoding)?)
                }
                Value::Bytes(_) | Value::String(_) => {
                    return Err(AbiError::Encoding(format!(
                        "Could not parse {}: expected {} bytes or {} hex characters",
                        ty,
                        size,
                        size * 2
                    )))
                }
                other => return Err(mismatch(ty, other)),
            };
            Ok(rpad(&payload, 0, WORD_SIZE))
        }
        (BaseType::Address, _) => Ok(zpad(encode_address(ty, value)?.as_bytes(), WORD_SIZE)),
        _ => Err(AbiError::Encoding(format!("Unsupported type: {}", ty))),
    }
}

/// Decode one scalar value from the start of `data`
///
/// Static types read a single word; `bytes` and `string` read a length word
/// and then that many bytes. Words that are not the canonical encoding of
/// the declared type (dirty padding, out-of-range integers) are rejected.
pub fn decode_primitive(ty: &Type, data: &[u8]) -> Result<Value, AbiError> {
    if ty.is_array() {
        return Err(AbiError::Decoding(format!(
            "{} is an array type, not a primitive",
            ty
        )));
    }

    if ty.is_dynamic() {
        let payload = decode_dynamic(ty, data)?;
        return match ty.base() {
            BaseType::String => String::from_utf8(payload.to_vec())
                .map(Value::String)
                .map_err(|e| AbiError::Decoding(format!("Invalid UTF-8: {}", e))),
            _ => Ok(Value::Bytes(payload.to_vec())),
        };
    }

    let word = read_word(data, 0).ok_or_else(|| insufficient(ty, WORD_SIZE, data.len()))?;
    let raw = U256::from_big_endian(word);

    match (ty.base(), ty.sub()) {
        (BaseType::Bool, _) => match raw.low_u64() {
            0 if raw.is_zero() => Ok(Value::Bool(false)),
            1 if raw.bits() == 1 => Ok(Value::Bool(true)),
            _ => Err(noncanonical(ty)),
        },
        (BaseType::Uint, Sub::Size(bits)) => {
            if raw.bits() > bits {
                return Err(noncanonical(ty));
            }
            Ok(Value::Uint(raw))
        }
        (BaseType::Int, Sub::Size(bits)) => {
            let n = I256::from_twos_complement(raw);
            if !n.fits_bits(bits) {
                return Err(noncanonical(ty));
            }
            Ok(Value::Int(n))
        }
        (BaseType::Ufixed, Sub::Real { high, low }) => {
            if raw.bits() > high + low {
                return Err(noncanonical(ty));
            }
            Ok(Value::Fixed(Real::from_scaled(I256::from(raw), low as u32)))
        }
        (BaseType::Fixed, Sub::Real { high, low }) => {
            let n = I256::from_twos_complement(raw);
            if !n.fits_bits(high + low) {
                return Err(noncanonical(ty));
            }
            Ok(Value::Fixed(Real::from_scaled(n, low as u32)))
        }
        (BaseType::Hash, Sub::Size(size)) if size == 0 || size > WORD_SIZE => {
            Err(AbiError::Decoding(format!("{} must be 1 to 32 bytes", ty)))
        }
        (BaseType::Bytes | BaseType::Hash, Sub::Size(size)) if size <= WORD_SIZE => {
            let (content, padding) = word.split_at(size);
            if padding.iter().any(|&b| b != 0) {
                return Err(noncanonical(ty));
            }
            Ok(Value::Bytes(content.to_vec()))
        }
        (BaseType::Address, _) => {
            if word[..WORD_SIZE - Address::LEN].iter().any(|&b| b != 0) {
                return Err(noncanonical(ty));
            }
            Ok(Value::Address(Address::from_word(word)))
        }
        _ => Err(AbiError::Decoding(format!("Unsupported type: {}", ty))),
    }
}

/// Length word followed by the payload padded to a word boundary
fn encode_dynamic(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(WORD_SIZE + ceil32(payload.len()));
    out.extend_from_slice(&to_word(&U256::from(payload.len())));
    out.extend(rpad(payload, 0, ceil32(payload.len())));
    out
}

fn decode_dynamic<'a>(ty: &Type, data: &'a [u8]) -> Result<&'a [u8], AbiError> {
    let len_word = read_word(data, 0).ok_or_else(|| insufficient(ty, WORD_SIZE, data.len()))?;
    let len = word_to_usize(&U256::from_big_endian(len_word))
        .ok_or_else(|| AbiError::Decoding(format!("Length of {} exceeds buffer", ty)))?;
    let end = len
        .checked_add(WORD_SIZE)
        .ok_or_else(|| AbiError::Decoding(format!("Length of {} exceeds buffer", ty)))?;
    data.get(WORD_SIZE..end)
        .ok_or_else(|| insufficient(ty, end, data.len()))
}

fn integer(ty: &Type, value: &Value) -> Result<I256, AbiError> {
    value.as_int().ok_or_else(|| mismatch(ty, value))
}

fn to_real(ty: &Type, value: &Value) -> Result<Real, AbiError> {
    match value {
        Value::Fixed(r) => Ok(*r),
        Value::Uint(_) | Value::Int(_) => Ok(Real::from_int(integer(ty, value)?)),
        other => Err(mismatch(ty, other)),
    }
}

/// Raw bytes, or hex-decoded text
fn byte_payload<'a>(ty: &Type, value: &'a Value) -> Result<Cow<'a, [u8]>, AbiError> {
    match value {
        Value::Bytes(b) => Ok(Cow::Borrowed(b)),
        Value::String(s) => Ok(Cow::Owned(decode_hex(s).map_err(AbiError::encoding)?)),
        other => Err(mismatch(ty, other)),
    }
}

fn encode_address(ty: &Type, value: &Value) -> Result<Address, AbiError> {
    match value {
        Value::Address(a) => Ok(*a),
        Value::Bytes(b) => Address::from_slice(b).map_err(|e| AbiError::Encoding(e.to_string())),
        Value::String(s) => Address::from_hex(s).map_err(|e| AbiError::Encoding(e.to_string())),
        Value::Uint(_) | Value::Int(_) => {
            let n = integer(ty, value)?;
            if n.is_negative() || n.abs().bits() > Address::LEN * 8 {
                return Err(out_of_bounds(ty, &n));
            }
            Ok(Address::from_word(&to_word(&n.abs())))
        }
        other => Err(mismatch(ty, other)),
    }
}

fn hex_digits(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn mismatch(ty: &Type, value: &Value) -> AbiError {
    AbiError::Encoding(format!("Cannot encode {} value as {}", value.kind(), ty))
}

fn out_of_bounds(ty: &Type, n: &I256) -> AbiError {
    AbiError::ValueOutOfBounds(format!("{} does not fit in {}", n, ty))
}

fn noncanonical(ty: &Type) -> AbiError {
    AbiError::Decoding(format!("Word is not a valid {} encoding", ty))
}

fn insufficient(ty: &Type, need: usize, have: usize) -> AbiError {
    AbiError::Decoding(format!(
        "Insufficient data for {}: need {} bytes, have {}",
        ty, need, have
    ))
}
