//! The prepared call: immutable, lazily encoded, ready for transport.

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use callkit_abi::CallableDescriptor;
use callkit_types::{CodecError, Selector, U256};

use crate::once::SharedOnce;
use crate::resolver::{ParamResolver, ParamSource, ResolveError};

/// Errors surfaced by a [`PreparedCall`].
///
/// Resolver and codec failures pass through unchanged in kind; nothing is
/// wrapped in a way that loses the original error.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    /// Encoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Parameter resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// An immutable descriptor of a remote call, with encode-on-demand
/// semantics.
///
/// Produced by [`prepare`]; owned by the caller until handed to a transport
/// collaborator, which reads [`encoded_payload`](PreparedCall::encoded_payload)
/// and the override accessors. The only interior state is the memoized
/// resolution/encoding cache: the parameter producer runs at most once, and
/// `encoded_payload` and `value_override` observe the same resolved bundle
/// even when invoked concurrently.
pub struct PreparedCall {
    descriptor: Arc<CallableDescriptor>,
    resolver: ParamResolver,
    payload: SharedOnce<Result<Vec<u8>, CallError>>,
}

/// Compose a callable descriptor with a parameter source into a
/// [`PreparedCall`].
///
/// Constructing the call performs no I/O and no encoding; both are deferred
/// to first access.
pub fn prepare(descriptor: CallableDescriptor, source: ParamSource) -> PreparedCall {
    let descriptor = Arc::new(descriptor);
    let resolver = ParamResolver::new(source);

    let payload = {
        let descriptor = descriptor.clone();
        let resolver = resolver.clone();
        SharedOnce::new(async move {
            let params = resolver.resolve().await?;
            let payload = descriptor.encode_call(&params.values)?;
            trace!(selector = %descriptor.selector(), bytes = payload.len(), "encoded call payload");
            Ok(payload)
        })
    };

    PreparedCall {
        descriptor,
        resolver,
        payload,
    }
}

impl PreparedCall {
    /// The full calldata payload: the descriptor's selector followed by the
    /// encoded parameters. Memoized; repeated calls return identical bytes.
    pub async fn encoded_payload(&self) -> Result<Vec<u8>, CallError> {
        self.payload.wait().await
    }

    /// The native value (amount) override from the resolved bundle, if any.
    pub async fn value_override(&self) -> Result<Option<U256>, CallError> {
        Ok(self.resolver.resolve().await?.overrides.value)
    }

    /// The gas override from the resolved bundle, if any.
    pub async fn gas_override(&self) -> Result<Option<u64>, CallError> {
        Ok(self.resolver.resolve().await?.overrides.gas)
    }

    /// The callable's selector.
    pub fn selector(&self) -> Selector {
        self.descriptor.selector()
    }

    /// The callable descriptor this call was prepared from.
    pub fn descriptor(&self) -> &CallableDescriptor {
        &self.descriptor
    }
}
