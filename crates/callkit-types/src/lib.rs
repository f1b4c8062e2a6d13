//! Shared types for the evm-callkit workspace.
//!
//! This crate provides the foundational ABI data model used across the
//! workspace crates, breaking circular dependency chains:
//! - [`param_type`]: the closed set of ABI parameter types ([`ParamType`], [`Param`])
//! - [`type_parsing`]: canonical type-string parsing (`"uint256"`, `"(address,uint256)[]"`)
//! - [`value`]: runtime values carried through encoding ([`Value`])
//! - [`selector`]: the 4-byte function selector newtype ([`Selector`])
//! - [`error`]: the codec error taxonomy ([`CodecError`])
//!
//! Everything here is pure data: no I/O, no async, no hashing. Selector
//! derivation lives in `callkit-abi`.

pub mod error;
pub mod param_type;
pub mod selector;
pub mod type_parsing;
pub mod value;

pub use error::CodecError;
pub use param_type::{Param, ParamType};
pub use selector::Selector;
pub use type_parsing::parse_param_type;
pub use value::Value;

// Re-export the primitive types callers need to build values, so downstream
// crates don't have to depend on alloy-primitives directly.
pub use alloy_primitives::{Address, I256, U256};
