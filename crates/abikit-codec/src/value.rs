//! ABI values

use abikit_primitives::{Address, I256, U256};

use crate::Real;

/// A value to encode, or a decoded one
///
/// Byte-valued types (`bytes`, `bytes<N>`, `hash<N>`, `address`) accept
/// either raw [`Value::Bytes`] or a hex [`Value::String`] with optional
/// `0x` prefix; `string` takes the text itself.
///
/// Equality is numeric across `Uint`, `Int` and `Fixed`, so `Uint(1)`,
/// `Int(1)` and `Fixed(1)` are the same value.
#[derive(Debug, Clone)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// Non-negative integer
    Uint(U256),
    /// Signed integer
    Int(I256),
    /// Fixed-point number
    Fixed(Real),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// UTF-8 text, or hex for byte-valued types
    String(String),
    /// 20-byte address
    Address(Address),
    /// Array elements, outermost dimension first
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the value's shape, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Fixed(_) => "fixed",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Address(_) => "address",
            Value::Array(_) => "array",
        }
    }

    /// Integer content of `Uint` / `Int` values
    pub fn as_int(&self) -> Option<I256> {
        match self {
            Value::Uint(u) => Some(I256::from(*u)),
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric content of `Uint` / `Int` / `Fixed` values
    pub fn as_real(&self) -> Option<Real> {
        match self {
            Value::Fixed(r) => Some(*r),
            other => other.as_int().map(Real::from_int),
        }
    }

    /// Array elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Address(a), Value::Address(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => match (self.as_real(), other.as_real()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(U256::from(n))
    }
}

impl From<u128> for Value {
    fn from(n: u128) -> Self {
        Value::Uint(U256::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(I256::from(n))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::Int(I256::from(n))
    }
}

impl From<U256> for Value {
    fn from(n: U256) -> Self {
        Value::Uint(n)
    }
}

impl From<I256> for Value {
    fn from(n: I256) -> Self {
        Value::Int(n)
    }
}

impl From<Real> for Value {
    fn from(r: Real) -> Self {
        Value::Fixed(r)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Address> for Value {
    fn from(addr: Address) -> Self {
        Value::Address(addr)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
