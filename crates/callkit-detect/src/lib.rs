//! Method support detection.
//!
//! Answers "does this deployed target implement this selector?" by
//! inspecting the target's runtime bytecode, before a caller commits to
//! building the call.
//!
//! This crate provides:
//! - [`TargetHandle`]: the external-collaborator trait for deployed targets
//!   (a stable identity plus a bytecode accessor)
//! - [`MethodDetector`]: per-target detection with single-flight memoization
//!   per `(target, selector)` pair
//!
//! Detection distinguishes a definite "unsupported" (`Ok(false)`) from
//! "cannot be determined" ([`DetectError::Indeterminate`], e.g. an
//! undeployed target or an opaque proxy) so callers can refuse to proceed
//! instead of mistaking "unknown" for "no".

pub mod detector;

pub use detector::{contains_selector, MethodDetector};

use thiserror::Error;

use callkit_types::Selector;

/// Errors from method support detection.
///
/// Variants are `Clone` because cached detection outcomes fan out to every
/// waiter of the memoized computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// The target exposes no inspectable bytecode, so support cannot be
    /// determined. Deliberately distinct from `Ok(false)`.
    #[error("cannot determine support for {selector} on target {target}: no inspectable bytecode")]
    Indeterminate { target: String, selector: Selector },

    /// Fetching the target's bytecode failed.
    #[error("failed to fetch bytecode for target {target}: {reason}")]
    TargetUnreachable { target: String, reason: String },
}

/// A deployed remote entity whose callable surface can be inspected.
///
/// Implementations live with the transport layer; this crate only requires
/// a stable identity (used for memoization keys and diagnostics) and a
/// bytecode accessor. `Ok(None)` means the target has no inspectable
/// bytecode — not yet deployed, or hidden behind an opaque proxy.
#[async_trait::async_trait]
pub trait TargetHandle: Send + Sync {
    /// A stable identity for this target (e.g. a chain id + address pair).
    fn target_id(&self) -> String;

    /// Fetch the target's runtime bytecode, or `None` if it has none.
    async fn bytecode(&self) -> anyhow::Result<Option<Vec<u8>>>;
}
