//! # abikit-codec
//!
//! Ethereum contract ABI encoding and decoding.
//!
//! ## Features
//!
//! - **Type**: parser for signatures such as `uint256`, `bytes32[3]`, `fixed128x128[]`
//! - **Primitive codec**: one 32-byte word per scalar, length-prefixed `bytes`/`string`
//! - **Head-tail layout**: argument lists and nested arrays with offset words
//! - **Strict decoding**: offsets, lengths and padding are validated against the buffer
//!
//! ## Quick Start
//!
//! ```rust
//! use abikit_codec::{decode_abi_str, encode_abi_str, Value};
//!
//! let values = vec![
//!     Value::from(5u64),
//!     Value::Bytes(vec![1, 2]),
//!     Value::from(vec![Value::from("a"), Value::from("bc")]),
//! ];
//! let types = ["uint256", "bytes", "string[]"];
//!
//! let encoded = encode_abi_str(&types, &values).unwrap();
//! assert_eq!(encoded.len() % 32, 0);
//!
//! let decoded = decode_abi_str(&types, &encoded).unwrap();
//! assert_eq!(decoded, values);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;
mod encode;
mod error;
mod primitive;
mod real;
mod types;
mod value;

pub use decode::{decode_abi, decode_abi_str, decode_type};
pub use encode::{encode_abi, encode_abi_str, encode_type};
pub use error::AbiError;
pub use primitive::{decode_primitive, encode_primitive};
pub use real::Real;
pub use types::{BaseType, Sub, Type, MAX_ARRAY_DEPTH};
pub use value::Value;

pub use abikit_primitives::{utils, Address, I256, U256, WORD_SIZE};
