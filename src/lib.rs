//! evm-callkit: typed contract-call builder and ABI codec for EVM-style
//! targets.
//!
//! The workspace splits into small crates, re-exported here:
//! - [`callkit_types`]: the ABI data model (types, values, selectors, errors)
//! - [`callkit_abi`]: the codec (head/tail encoding) and selector derivation
//! - [`callkit_detect`]: bytecode-based method support detection
//! - [`callkit_prepare`]: async parameter resolution and lazy call preparation
//!
//! The [`callables`] module contains ready-made builders for common callables
//! (ERC-20 transfer/approve/balanceOf, vault deposit), each following the
//! same pattern: a selector constant, typed params, encode helpers, a support
//! probe, and a builder returning a [`PreparedCall`].
//!
//! # Example
//!
//! ```
//! use evm_callkit::callables::erc20;
//! use evm_callkit::{Address, U256};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let call = erc20::transfer(erc20::TransferParams {
//!     to: Address::repeat_byte(0x11),
//!     amount: U256::from(100u64),
//!     overrides: Default::default(),
//! });
//! let payload = call.encoded_payload().await?;
//! assert_eq!(&payload[..4], erc20::TRANSFER_SELECTOR.as_bytes());
//! # Ok(())
//! # }
//! ```

pub mod callables;

pub use callkit_abi::{
    canonical_signature, decode, derive_selector, encode, encode_with_selector,
    CallableDescriptor,
};
pub use callkit_detect::{contains_selector, DetectError, MethodDetector, TargetHandle};
pub use callkit_prepare::{
    prepare, CallError, CallOverrides, CallParams, ParamResolver, ParamSource, PreparedCall,
    ResolveError, SharedOnce,
};
pub use callkit_types::{
    parse_param_type, Address, CodecError, Param, ParamType, Selector, Value, I256, U256,
};
