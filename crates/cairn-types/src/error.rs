use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown codec tag: {0:#04x}")]
    UnknownCodec(u8),

    #[error("unknown hash code: {0:#04x}")]
    UnknownHashCode(u8),
}
