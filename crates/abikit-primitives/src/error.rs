//! Common error types for primitives

use thiserror::Error;
use crate::address::AddressError;

/// Primitive operation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Integer does not fit in 256 bits
    #[error("integer too large: {0} significant bytes")]
    IntegerOverflow(usize),

    /// Big-endian integer with a leading zero byte
    #[error("no leading zero bytes allowed for integers")]
    LeadingZeros,

    /// Unparseable integer literal
    #[error("invalid integer literal: {0}")]
    InvalidInteger(String),
}
