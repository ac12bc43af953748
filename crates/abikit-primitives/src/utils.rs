//! Byte-level helpers shared by the encoder and decoder
//!
//! Big-endian integer conversion, zero padding and hex. All functions are
//! pure; padding helpers never truncate an input that is already long enough.

use primitive_types::U256;

use crate::{PrimitiveError, Word, WORD_SIZE};

/// Round `x` up to the next multiple of 32
pub fn ceil32(x: usize) -> usize {
    x.div_ceil(WORD_SIZE) * WORD_SIZE
}

/// Left-pad `x` with `symbol` up to `len` bytes
pub fn lpad(x: &[u8], symbol: u8, len: usize) -> Vec<u8> {
    if x.len() >= len {
        return x.to_vec();
    }
    let mut out = vec![symbol; len - x.len()];
    out.extend_from_slice(x);
    out
}

/// Right-pad `x` with `symbol` up to `len` bytes
pub fn rpad(x: &[u8], symbol: u8, len: usize) -> Vec<u8> {
    let mut out = x.to_vec();
    if out.len() < len {
        out.resize(len, symbol);
    }
    out
}

/// Left-pad with zero bytes
pub fn zpad(x: &[u8], len: usize) -> Vec<u8> {
    lpad(x, 0, len)
}

/// Strip leading zero bytes
pub fn zunpad(x: &[u8]) -> &[u8] {
    let start = x.iter().position(|&b| b != 0).unwrap_or(x.len());
    &x[start..]
}

/// Minimal big-endian bytes of `n`, empty for zero
pub fn int_to_big_endian(n: &U256) -> Vec<u8> {
    zunpad(&to_word(n)).to_vec()
}

/// Minimal encoding of an unsigned integer, the inverse of [`decode_int`]
pub fn encode_int(n: &U256) -> Vec<u8> {
    int_to_big_endian(n)
}

/// Big-endian bytes to integer, leading zeros allowed
pub fn big_endian_to_int(bytes: &[u8]) -> Result<U256, PrimitiveError> {
    let significant = zunpad(bytes);
    if significant.len() > WORD_SIZE {
        return Err(PrimitiveError::IntegerOverflow(significant.len()));
    }
    Ok(U256::from_big_endian(significant))
}

/// Strict decode of a minimal big-endian integer
pub fn decode_int(bytes: &[u8]) -> Result<U256, PrimitiveError> {
    if bytes.first() == Some(&0) {
        return Err(PrimitiveError::LeadingZeros);
    }
    big_endian_to_int(bytes)
}

/// `n` as big-endian bytes left-padded to `len`
pub fn zpad_int(n: &U256, len: usize) -> Vec<u8> {
    zpad(&int_to_big_endian(n), len)
}

/// Decode hex and left-pad the bytes to `len`
pub fn zpad_hex(s: &str, len: usize) -> Result<Vec<u8>, PrimitiveError> {
    Ok(zpad(&decode_hex(s)?, len))
}

/// A 32-byte big-endian word
pub fn to_word(n: &U256) -> Word {
    let mut word = [0u8; WORD_SIZE];
    n.to_big_endian(&mut word);
    word
}

/// Read the word starting at `offset`, if the buffer holds all 32 bytes of it
pub fn read_word(data: &[u8], offset: usize) -> Option<&Word> {
    let end = offset.checked_add(WORD_SIZE)?;
    data.get(offset..end)?.try_into().ok()
}

/// Narrow a word value to `usize`
pub fn word_to_usize(n: &U256) -> Option<usize> {
    if n.bits() > 64 {
        return None;
    }
    usize::try_from(n.low_u64()).ok()
}

/// Lowercase hex without prefix
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex with an optional `0x`/`0X` prefix
pub fn decode_hex(s: &str) -> Result<Vec<u8>, PrimitiveError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| PrimitiveError::InvalidHex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil32() {
        assert_eq!(ceil32(0), 0);
        assert_eq!(ceil32(1), 32);
        assert_eq!(ceil32(256), 256);
        assert_eq!(ceil32(250), 256);
    }

    #[test]
    fn test_big_endian_to_int() {
        assert_eq!(big_endian_to_int(&[0xff]).unwrap(), U256::from(255));
        assert_eq!(big_endian_to_int(&[0x00, 0x00, 0xff]).unwrap(), U256::from(255));
        assert_eq!(big_endian_to_int(&[]).unwrap(), U256::zero());
        assert!(big_endian_to_int(&[0x01; 33]).is_err());
    }

    #[test]
    fn test_decode_int_rejects_leading_zero() {
        assert_eq!(decode_int(&[0x00, 0x01]), Err(PrimitiveError::LeadingZeros));
        assert_eq!(decode_int(&[0x01, 0x00]).unwrap(), U256::from(256));
    }

    #[test]
    fn test_int_to_big_endian_minimal() {
        assert!(int_to_big_endian(&U256::zero()).is_empty());
        assert_eq!(int_to_big_endian(&U256::from(0x0102)), vec![0x01, 0x02]);
    }

    #[test]
    fn test_pads() {
        assert_eq!(zpad(&[1, 2], 4), vec![0, 0, 1, 2]);
        assert_eq!(rpad(&[1, 2], 0, 4), vec![1, 2, 0, 0]);
        assert_eq!(lpad(&[1, 2, 3], 0xff, 2), vec![1, 2, 3]);
        assert_eq!(zunpad(&[0, 0, 5, 0]), &[5, 0]);
        assert_eq!(zpad_int(&U256::from(1), 16), {
            let mut v = vec![0u8; 15];
            v.push(1);
            v
        });
    }

    #[test]
    fn test_decode_hex() {
        assert_eq!(decode_hex("0xff00").unwrap(), vec![0xff, 0x00]);
        assert_eq!(decode_hex("FF").unwrap(), vec![0xff]);
        assert!(decode_hex("xxxx").is_err());
        assert!(decode_hex("\x00\x00").is_err());
        assert!(decode_hex("abc").is_err());
        assert_eq!(zpad_hex("ff", 4).unwrap(), vec![0, 0, 0, 0xff]);
    }

    #[test]
    fn test_read_word_bounds() {
        let data = [7u8; 40];
        assert!(read_word(&data, 8).is_some());
        assert!(read_word(&data, 9).is_none());
        assert!(read_word(&data, usize::MAX).is_none());
    }

    #[test]
    fn test_word_to_usize() {
        assert_eq!(word_to_usize(&U256::from(64)), Some(64));
        assert_eq!(word_to_usize(&(U256::one() << 64)), None);
    }
}
