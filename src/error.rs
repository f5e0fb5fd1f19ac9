//! Error taxonomy for the codec runtime.
//!
//! Mirrors the four failure classes of the ASN.1 runtime this crate
//! generalizes: capacity/underflow, length-determinant violations,
//! discriminant errors, and value-constraint violations. Each variant
//! carries the bit offset at which the failure was observed, the way
//! the teacher's `EncodeError`/`DecodeError` carry a `buffer_index`.

use thiserror::Error;

/// ABI-stable numeric codes, kept identical to the C runtime's
/// `ERR_*` defines so a future FFI boundary can still surface them.
pub mod code {
    pub const INSUFFICIENT_DATA: i32 = 101;
    pub const INCORRECT_STREAM: i32 = 102;
    pub const BAD_CHOICE: i32 = 103;
    pub const BAD_ENUM: i32 = 104;
    pub const NO_MEM: i32 = 105;
    pub const BAD_LENGTH: i32 = 106;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Not enough bits remain in the input stream to satisfy a read.
    #[error("insufficient data: needed {needed} more bit(s) at bit offset {bit_offset}")]
    InsufficientData { bit_offset: u64, needed: u64 },

    /// Not enough room remains in the output buffer to satisfy a write.
    #[error("no capacity: needed {needed} more bit(s) at bit offset {bit_offset}")]
    NoCapacity { bit_offset: u64, needed: u64 },

    /// The decoded stream is structurally inconsistent (e.g. a
    /// constraint violated, or a field value outside its declared
    /// range).
    #[error("incorrect stream at bit offset {bit_offset}: {message}")]
    IncorrectStream { bit_offset: u64, message: String },

    /// A CHOICE discriminant did not match any declared alternative.
    #[error("bad choice discriminant {tag} at bit offset {bit_offset}")]
    BadChoice { bit_offset: u64, tag: u64 },

    /// An ENUMERATED value did not match any declared tag.
    #[error("bad enumerated value {value} at bit offset {bit_offset}")]
    BadEnum { bit_offset: u64, value: i64 },

    /// A length determinant declared a size the schema forbids, or
    /// one the remaining buffer cannot satisfy.
    #[error("bad length determinant {length} at bit offset {bit_offset}: {reason}")]
    BadLength {
        bit_offset: u64,
        length: u64,
        reason: String,
    },
}

impl CodecError {
    /// Maps this error back to the ABI-stable integer code of §6.
    pub fn code(&self) -> i32 {
        match self {
            CodecError::InsufficientData { .. } => code::INSUFFICIENT_DATA,
            CodecError::NoCapacity { .. } => code::NO_MEM,
            CodecError::IncorrectStream { .. } => code::INCORRECT_STREAM,
            CodecError::BadChoice { .. } => code::BAD_CHOICE,
            CodecError::BadEnum { .. } => code::BAD_ENUM,
            CodecError::BadLength { .. } => code::BAD_LENGTH,
        }
    }

    pub fn bit_offset(&self) -> u64 {
        match self {
            CodecError::InsufficientData { bit_offset, .. }
            | CodecError::NoCapacity { bit_offset, .. }
            | CodecError::IncorrectStream { bit_offset, .. }
            | CodecError::BadChoice { bit_offset, .. }
            | CodecError::BadEnum { bit_offset, .. }
            | CodecError::BadLength { bit_offset, .. } => *bit_offset,
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
