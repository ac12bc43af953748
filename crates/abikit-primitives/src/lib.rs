//! # abikit-primitives
//!
//! Primitive types for the abikit ABI codec.
//!
//! This crate provides the fixed-width integers, addresses and byte helpers
//! that the codec is built on. Everything here is pure and allocation-light.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod int;
pub mod utils;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use int::I256;

// Re-export primitive-types for the unsigned words
pub use primitive_types::{U256, U512};

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// One ABI word
pub type Word = [u8; WORD_SIZE];
