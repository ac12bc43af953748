//! Codec error types

use abikit_primitives::PrimitiveError;
use thiserror::Error;

/// ABI codec error
///
/// Every operation either returns a complete result or one of these; no
/// partial output is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Malformed or unrecognized type signature
    #[error("Parse error: {0}")]
    Parse(String),

    /// Value outside the representable range of its type
    #[error("Value out of bounds: {0}")]
    ValueOutOfBounds(String),

    /// Arity mismatch or value of the wrong shape for its type
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Truncated buffer, or an offset/length pointing outside it
    #[error("Decoding error: {0}")]
    Decoding(String),
}

impl AbiError {
    pub(crate) fn encoding(e: PrimitiveError) -> Self {
        AbiError::Encoding(e.to_string())
    }
}
