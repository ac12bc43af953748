//! Signed 256-bit integer

use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use primitive_types::U256;

use crate::PrimitiveError;

/// Signed 256-bit integer in sign-magnitude form
///
/// Zero is never negative, so derived equality is numeric equality.
/// The magnitude may exceed `2^255`; callers range-check with
/// [`I256::fits_bits`] before narrowing to a two's-complement word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256([0; 4]),
        negative: false,
    };

    /// Create a new I256
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Absolute value
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Sign (true if negative)
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value is representable as a two's-complement integer of `bits` bits
    pub fn fits_bits(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        if self.negative {
            // -2^(bits-1) is the smallest value
            self.abs <= U256::one() << (bits - 1)
        } else {
            self.abs.bits() < bits
        }
    }

    /// Encode as a 256-bit two's-complement word (`2^256 + value` when negative)
    pub fn to_twos_complement(&self) -> U256 {
        if self.negative {
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            self.abs
        }
    }

    /// Interpret a 256-bit word as two's complement
    pub fn from_twos_complement(word: U256) -> Self {
        if word.bit(255) {
            Self::new((!word).overflowing_add(U256::one()).0, true)
        } else {
            Self::new(word, false)
        }
    }
}

impl Neg for I256 {
    type Output = I256;

    fn neg(self) -> I256 {
        I256::new(self.abs, !self.negative)
    }
}

impl From<U256> for I256 {
    fn from(abs: U256) -> Self {
        I256::new(abs, false)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        I256::from_i128(value as i128)
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        I256::from_i128(value)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// Parses `[-]digits` or `[-]0x<hex>`
impl FromStr for I256 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrimitiveError::InvalidInteger(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let abs = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            Some(hex) if !hex.is_empty() => U256::from_str_radix(hex, 16).map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
            None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                U256::from_dec_str(digits).map_err(|_| invalid())?
            }
            None => return Err(invalid()),
        };
        Ok(I256::new(abs, negative))
    }
}
