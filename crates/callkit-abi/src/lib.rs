//! ABI codec and selector derivation.
//!
//! This crate provides:
//! - [`encode`]/[`decode`]: the type codec — canonical head/tail encoding of
//!   typed values against a parameter schema
//! - [`signature`]: canonical signature rendering and selector derivation
//! - [`descriptor`]: the immutable [`CallableDescriptor`] combining a
//!   selector with input/output schemas
//!
//! Everything here is pure and synchronous: no I/O, no suspension points.
//! That keeps the codec unit-testable without any scheduler, and isolates
//! the async work (parameter resolution, bytecode fetches) in the
//! `callkit-prepare` and `callkit-detect` crates.
//!
//! # Wire format
//!
//! Encoding uses the two-region head/tail layout: static-width types are
//! written in place in a fixed-size head, one or more 32-byte words per
//! parameter; dynamic types (strings, byte sequences, dynamic arrays) write
//! a byte offset in the head pointing into a trailing tail region holding a
//! length prefix and the payload, right-padded to word boundaries. Static
//! parameters can therefore be read without scanning variable-length data.

pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod signature;

pub use decode::decode;
pub use descriptor::CallableDescriptor;
pub use encode::{encode, encode_with_selector};
pub use signature::{canonical_signature, derive_selector};

// Re-export the data model so callers can depend on this crate alone.
pub use callkit_types::{Address, CodecError, Param, ParamType, Selector, Value, I256, U256};
