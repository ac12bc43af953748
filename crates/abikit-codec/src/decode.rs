//! Head-tail decoding of argument lists and arrays

use std::iter;

use abikit_primitives::utils::{read_word, word_to_usize};
use abikit_primitives::{U256, WORD_SIZE};
use tracing::{debug, trace};

use crate::encode::parse_all;
use crate::primitive::decode_primitive;
use crate::types::Type;
use crate::{AbiError, Value};

/// Decode an argument list
///
/// Every offset, length and count is checked against the buffer before it
/// is followed, so malformed input yields [`AbiError::Decoding`]. Offsets
/// may alias, but the decoded values can never cover more words than
/// `data` holds.
pub fn decode_abi(types: &[Type], data: &[u8]) -> Result<Vec<Value>, AbiError> {
    trace!("Decoding {} types from {} bytes", types.len(), data.len());
    decode_sequence(types.iter(), data, &mut Budget::for_input(data))
}

/// Parse the signatures, then [`decode_abi`]
pub fn decode_abi_str(types: &[&str], data: &[u8]) -> Result<Vec<Value>, AbiError> {
    let types = parse_all(types)?;
    decode_abi(&types, data)
}

/// Decode the full encoding of one value starting at `data[0]`
pub fn decode_type(ty: &Type, data: &[u8]) -> Result<Value, AbiError> {
    decode_value(ty, data, &mut Budget::for_input(data))
}

/// Words of input still available to decoded values
///
/// Each scalar word, length word, payload word and element count is charged
/// once. Offsets are free. A well-formed encoding stores all of these in
/// distinct words, so it never runs out; aliased offsets that would
/// replay one region many times do.
struct Budget {
    words: usize,
}

impl Budget {
    fn for_input(data: &[u8]) -> Self {
        Budget {
            words: data.len().div_ceil(WORD_SIZE),
        }
    }

    fn charge(&mut self, ty: &Type, words: usize) -> Result<(), AbiError> {
        self.words = self.words.checked_sub(words).ok_or_else(|| {
            fail(format!(
                "Decoded {} exceeds the size of the input; offsets alias",
                ty
            ))
        })?;
        Ok(())
    }
}

fn decode_value(ty: &Type, data: &[u8], budget: &mut Budget) -> Result<Value, AbiError> {
    let Some(dim) = ty.outer_dim() else {
        budget.charge(ty, 1)?;
        let value = decode_primitive(ty, data)?;
        if ty.is_dynamic() {
            let len = match &value {
                Value::Bytes(payload) => payload.len(),
                Value::String(text) => text.len(),
                _ => 0,
            };
            budget.charge(ty, len.div_ceil(WORD_SIZE))?;
        }
        return Ok(value);
    };
    let sub = ty.subtype();

    let (count, region) = if dim == 0 {
        let word = read_word(data, 0)
            .ok_or_else(|| fail(format!("Missing element count for {}", ty)))?;
        let count = word_to_usize(&U256::from_big_endian(word))
            .ok_or_else(|| fail(format!("Element count for {} out of range", ty)))?;
        budget.charge(ty, 1)?;
        (count, data.get(WORD_SIZE..).unwrap_or_default())
    } else {
        (dim, data)
    };

    let needed = count.checked_mul(sub.head_size());
    if needed.map_or(true, |n| n > region.len()) {
        return Err(fail(format!(
            "{} elements of {} do not fit in {} bytes",
            count,
            sub,
            region.len()
        )));
    }

    decode_sequence(iter::repeat(&sub).take(count), region, budget).map(Value::Array)
}

/// Walk the heads of `region`, following offsets for dynamic types
fn decode_sequence<'a>(
    types: impl Iterator<Item = &'a Type>,
    region: &[u8],
    budget: &mut Budget,
) -> Result<Vec<Value>, AbiError> {
    let mut values = Vec::with_capacity(types.size_hint().0);
    let mut cursor = 0usize;

    for ty in types {
        let value = match ty.size() {
            Some(size) => {
                let slot = cursor
                    .checked_add(size)
                    .and_then(|end| region.get(cursor..end))
                    .ok_or_else(|| {
                        fail(format!(
                            "Insufficient data for {} at {}: have {} bytes",
                            ty,
                            cursor,
                            region.len()
                        ))
                    })?;
                cursor += size;
                decode_value(ty, slot, budget)?
            }
            None => {
                let word = read_word(region, cursor)
                    .ok_or_else(|| fail(format!("Missing offset for {} at {}", ty, cursor)))?;
                cursor += WORD_SIZE;
                let tail = word_to_usize(&U256::from_big_endian(word))
                    .and_then(|offset| region.get(offset..))
                    .ok_or_else(|| {
                        fail(format!(
                            "Offset for {} points outside {} bytes",
                            ty,
                            region.len()
                        ))
                    })?;
                decode_value(ty, tail, budget)?
            }
        };
        values.push(value);
    }

    Ok(values)
}

fn fail(msg: String) -> AbiError {
    debug!("{}", msg);
    AbiError::Decoding(msg)
}
