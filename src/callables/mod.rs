//! Ready-made callable builders.
//!
//! Each submodule follows the same per-callable pattern: a selector constant
//! (cross-checked against [`derive_selector`](callkit_abi::derive_selector)
//! in tests), schema constructors, a typed params struct carrying
//! [`CallOverrides`](callkit_prepare::CallOverrides), `encode_*` helpers, an
//! `is_*_supported` probe against a [`MethodDetector`](callkit_detect::MethodDetector),
//! and builders returning a [`PreparedCall`](callkit_prepare::PreparedCall)
//! from either static params or a deferred async producer.

pub mod erc20;
pub mod vault;
