//! Lazy call preparation.
//!
//! This crate composes the codec with asynchronous parameter resolution:
//! - [`once`]: [`SharedOnce`], the single-evaluation memoized future
//! - [`resolver`]: [`ParamSource`] / [`ParamResolver`] — static or deferred
//!   parameter bundles behind a resolve-once accessor
//! - [`prepared`]: [`prepare`] and [`PreparedCall`] — the immutable,
//!   encode-on-demand call descriptor handed to transport code
//!
//! Constructing a [`PreparedCall`] performs no I/O and no encoding; both
//! happen on first access and are memoized, so every internal stage
//! (payload encoding, override extraction) observes the same resolved
//! bundle.

pub mod once;
pub mod prepared;
pub mod resolver;

pub use once::SharedOnce;
pub use prepared::{prepare, CallError, PreparedCall};
pub use resolver::{CallOverrides, CallParams, ParamResolver, ParamSource, ResolveError};
