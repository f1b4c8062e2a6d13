//! Codec error taxonomy.
//!
//! Codec errors are never recovered locally: silently coercing or truncating
//! a value would corrupt the wire format, so every error surfaces to the
//! immediate caller. All variants are `Clone` so memoized failures can fan
//! out to every waiter of a shared computation.

use thiserror::Error;

/// Errors produced while encoding or decoding against a parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The number of supplied values does not match the schema length.
    #[error("schema mismatch: expected {expected} values, got {got}")]
    SchemaMismatch { expected: usize, got: usize },

    /// A value's runtime shape does not match its declared type. The index
    /// names the offending top-level parameter.
    #[error("type mismatch at parameter {index}: expected {expected}, found {found}")]
    TypeMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// A value is outside the representable range of its declared type.
    #[error("value out of range at parameter {index}: {value} does not fit {ty}")]
    EncodingRange {
        index: usize,
        ty: String,
        value: String,
    },

    /// The input buffer ended before the declared schema was satisfied.
    #[error("decoding truncated at offset {offset}: needed {needed} bytes, {available} available")]
    DecodingTruncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The input bytes are not a canonical encoding of the declared schema
    /// (bad padding, invalid boolean word, invalid UTF-8, oversized offset).
    #[error("invalid encoding at offset {offset}: {reason}")]
    DecodingInvalid { offset: usize, reason: String },
}
