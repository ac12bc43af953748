//! Exact rationals for fixed-point arguments

use std::fmt;
use std::str::FromStr;

use abikit_primitives::{I256, U256, U512};

use crate::AbiError;

/// Exact rational `±num / (2^pow2 · 5^pow5)`
///
/// Every binary float and every finite decimal literal has this form, so
/// fixed-point values never go through float rounding. The representation
/// is kept reduced: `num` is odd whenever `pow2 > 0`, not a multiple of 5
/// whenever `pow5 > 0`, and zero is never negative. Derived equality is
/// therefore numeric equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Real {
    negative: bool,
    num: U256,
    pow2: u32,
    pow5: u32,
}

impl Real {
    /// Zero
    pub const ZERO: Real = Real {
        negative: false,
        num: U256([0; 4]),
        pow2: 0,
        pow5: 0,
    };

    fn reduced(negative: bool, mut num: U256, mut pow2: u32, mut pow5: u32) -> Self {
        if num.is_zero() {
            return Real::ZERO;
        }
        let shift = num.trailing_zeros().min(pow2);
        num = num >> shift as usize;
        pow2 -= shift;
        let five = U256::from(5);
        while pow5 > 0 {
            let (q, r) = num.div_mod(five);
            if !r.is_zero() {
                break;
            }
            num = q;
            pow5 -= 1;
        }
        Real {
            negative,
            num,
            pow2,
            pow5,
        }
    }

    /// An integer value
    pub fn from_int(value: I256) -> Self {
        Real::reduced(value.is_negative(), value.abs(), 0, 0)
    }

    /// `scaled / 2^frac_bits`, the inverse of the fixed-point encoding
    pub fn from_scaled(scaled: I256, frac_bits: u32) -> Self {
        Real::reduced(scaled.is_negative(), scaled.abs(), frac_bits, 0)
    }

    /// The exact value of a finite float
    pub fn from_f64(value: f64) -> Result<Self, AbiError> {
        if !value.is_finite() {
            return Err(AbiError::Encoding(format!("Non-finite real value: {}", value)));
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let exponent = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1u64 << 52) - 1);
        let (mantissa, exp) = if exponent == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), exponent - 1075)
        };
        if exp >= 0 {
            let width = 64 - mantissa.leading_zeros() as i32;
            if width + exp > 256 {
                return Err(AbiError::ValueOutOfBounds(format!(
                    "Real value too large: {}",
                    value
                )));
            }
            Ok(Real::reduced(negative, U256::from(mantissa) << exp as usize, 0, 0))
        } else {
            Ok(Real::reduced(negative, U256::from(mantissa), exp.unsigned_abs(), 0))
        }
    }

    /// Sign
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// `round(self * 2^frac_bits)`, rounding halves away from zero
    pub fn scale(&self, frac_bits: u32) -> Result<I256, AbiError> {
        let out_of_bounds = || {
            AbiError::ValueOutOfBounds(format!(
                "{} scaled by 2^{} exceeds 256 bits",
                self, frac_bits
            ))
        };
        let shift = i64::from(frac_bits) - i64::from(self.pow2);
        let mut numerator = U512::from(self.num);
        let mut denominator = match pow5_u512(self.pow5) {
            Some(d) => d,
            // 5^pow5 > 2^512 > 2 * numerator: rounds to zero
            None => return Ok(I256::ZERO),
        };
        if shift >= 0 {
            if numerator.bits() as i64 + shift > 511 {
                return Err(out_of_bounds());
            }
            numerator = numerator << shift as usize;
        } else {
            let shift = shift.unsigned_abs();
            if denominator.bits() as u64 + shift > 511 {
                return Ok(I256::ZERO);
            }
            denominator = denominator << shift as usize;
        }

        let (mut quotient, remainder) = numerator.div_mod(denominator);
        if remainder >= denominator - remainder {
            quotient += U512::one();
        }
        let abs = U256::try_from(quotient).map_err(|_| out_of_bounds())?;
        Ok(I256::new(abs, self.negative))
    }

    /// Nearest float; lossy for values that need more than 53 bits
    pub fn to_f64(&self) -> f64 {
        let magnitude = self
            .num
            .0
            .iter()
            .rev()
            .fold(0.0f64, |acc, &limb| acc * 18446744073709551616.0 + limb as f64);
        let value = magnitude
            / 2f64.powi(self.pow2.min(2000) as i32)
            / 5f64.powi(self.pow5.min(2000) as i32);
        if self.negative {
            -value
        } else {
            value
        }
    }

    /// Digits of `self * 10^k` with `k` the decimal places needed, if they fit in 512 bits
    fn decimal_digits(&self) -> Option<(String, usize)> {
        let places = self.pow2.max(self.pow5);
        let two = shl_u512(U512::one(), places - self.pow2)?;
        let five = pow5_u512(places - self.pow5)?;
        let digits = U512::from(self.num).checked_mul(two)?.checked_mul(five)?;
        Some((digits.to_string(), places as usize))
    }
}

fn pow5_u512(exp: u32) -> Option<U512> {
    let five = U512::from(5);
    (0..exp).try_fold(U512::one(), |acc, _| acc.checked_mul(five))
}

fn shl_u512(value: U512, shift: u32) -> Option<U512> {
    if value.bits() as u64 + u64::from(shift) > 512 {
        return None;
    }
    Some(value << shift as usize)
}

impl From<I256> for Real {
    fn from(value: I256) -> Self {
        Real::from_int(value)
    }
}

impl From<i64> for Real {
    fn from(value: i64) -> Self {
        Real::from_int(I256::from(value))
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((digits, places)) = self.decimal_digits() else {
            return write!(f, "{}", self.to_f64());
        };
        if self.negative {
            f.write_str("-")?;
        }
        if places == 0 {
            return f.write_str(&digits);
        }
        let padded = format!("{:0>width$}", digits, width = places + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - places);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

/// Parses decimal literals: `125.125`, `-1`, `.5`, `1e3`, `2.5E-2`
impl FromStr for Real {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AbiError::Encoding(format!("Invalid decimal literal: {}", s));
        let too_large = || AbiError::ValueOutOfBounds(format!("Decimal literal too large: {}", s));

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(at) => {
                let exp: i64 = rest[at + 1..].parse().map_err(|_| invalid())?;
                (&rest[..at], exp)
            }
            None => (rest, 0),
        };
        let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let frac_digits = frac_digits.trim_end_matches('0');
        if int_digits.is_empty() && frac_digits.is_empty() && !mantissa.contains('0') {
            return Err(invalid());
        }

        let ten = U256::from(10);
        let mut num = U256::zero();
        for byte in int_digits.bytes().chain(frac_digits.bytes()) {
            if !byte.is_ascii_digit() {
                return Err(invalid());
            }
            num = num
                .checked_mul(ten)
                .and_then(|n| n.checked_add(U256::from(byte - b'0')))
                .ok_or_else(too_large)?;
        }

        let exponent = exponent
            .checked_sub(frac_digits.len() as i64)
            .ok_or_else(invalid)?;
        if exponent >= 0 {
            let exponent = u32::try_from(exponent).map_err(|_| too_large())?;
            for _ in 0..exponent {
                if num.is_zero() {
                    break;
                }
                num = num.checked_mul(ten).ok_or_else(too_large)?;
            }
            Ok(Real::reduced(negative, num, 0, 0))
        } else {
            let places = u32::try_from(exponent.unsigned_abs()).map_err(|_| invalid())?;
            Ok(Real::reduced(negative, num, places, places))
        }
    }
}
