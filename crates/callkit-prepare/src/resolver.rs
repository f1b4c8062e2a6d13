//! Asynchronous parameter resolution with a single-evaluation contract.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tracing::trace;

use callkit_types::{Value, U256};

use crate::once::SharedOnce;

/// Call-level overrides carried alongside the positional parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOverrides {
    /// Native value (amount) to attach to the call.
    pub value: Option<U256>,
    /// Gas limit override for the transport layer.
    pub gas: Option<u64>,
}

/// A resolved parameter bundle: positional values plus overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallParams {
    /// Positional parameter values, in schema order.
    pub values: Vec<Value>,
    /// Optional overrides.
    pub overrides: CallOverrides,
}

impl CallParams {
    /// A bundle with the given values and no overrides.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            values,
            overrides: CallOverrides::default(),
        }
    }

    /// Attach a value (amount) override.
    pub fn with_value(mut self, value: U256) -> Self {
        self.overrides.value = Some(value);
        self
    }

    /// Attach a gas override.
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.overrides.gas = Some(gas);
        self
    }
}

/// Failure of the deferred parameter producer, propagated verbatim to every
/// waiter. The resolver never retries.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The producer itself failed; the original error is shared unchanged.
    #[error("parameter producer failed: {0:#}")]
    Producer(Arc<anyhow::Error>),
}

/// Where a call's parameters come from: a concrete bundle, or a deferred
/// asynchronous producer.
///
/// An explicit tagged variant at the API boundary — callers state which case
/// they mean instead of the library sniffing runtime shapes. Parameter
/// production may perform external lookups (derived addresses, computed
/// signatures), which is why deferred producers get the single-evaluation
/// guarantee of [`ParamResolver`].
pub enum ParamSource {
    /// A concrete, already-resolved bundle.
    Static(CallParams),
    /// A deferred producer, executed at most once.
    Deferred(BoxFuture<'static, anyhow::Result<CallParams>>),
}

impl ParamSource {
    /// A source holding concrete values with no overrides.
    pub fn from_values(values: Vec<Value>) -> Self {
        ParamSource::Static(CallParams::from_values(values))
    }

    /// A deferred source. The producer runs at most once, on first resolve.
    pub fn deferred<F, Fut>(producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<CallParams>> + Send + 'static,
    {
        ParamSource::Deferred(async move { producer().await }.boxed())
    }
}

impl From<CallParams> for ParamSource {
    fn from(params: CallParams) -> Self {
        ParamSource::Static(params)
    }
}

impl fmt::Debug for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSource::Static(params) => f.debug_tuple("Static").field(params).finish(),
            ParamSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Memoized accessor over a [`ParamSource`].
///
/// However many times [`resolve`](ParamResolver::resolve) is called, the
/// underlying producer executes at most once; all callers — including
/// concurrent ones issued before the first resolution completes — receive
/// the same eventual bundle or the same error.
#[derive(Clone)]
pub struct ParamResolver {
    shared: SharedOnce<Result<Arc<CallParams>, ResolveError>>,
}

impl ParamResolver {
    /// Wrap a parameter source. Performs no work until first resolve.
    pub fn new(source: ParamSource) -> Self {
        let fut: BoxFuture<'static, Result<Arc<CallParams>, ResolveError>> = match source {
            ParamSource::Static(params) => {
                let params = Arc::new(params);
                async move { Ok(params) }.boxed()
            }
            ParamSource::Deferred(producer) => async move {
                trace!("running deferred parameter producer");
                producer
                    .await
                    .map(Arc::new)
                    .map_err(|e| ResolveError::Producer(Arc::new(e)))
            }
            .boxed(),
        };
        Self {
            shared: SharedOnce::new(fut),
        }
    }

    /// The resolved bundle, produced at most once and shared thereafter.
    pub async fn resolve(&self) -> Result<Arc<CallParams>, ResolveError> {
        self.shared.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_static_source_resolves() {
        let resolver = ParamResolver::new(ParamSource::from_values(vec![Value::from(7u64)]));
        let params = resolver.resolve().await.unwrap();
        assert_eq!(params.values, vec![Value::from(7u64)]);
        assert_eq!(params.overrides.value, None);
    }

    #[tokio::test]
    async fn test_producer_runs_exactly_once_under_concurrency() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let resolver = ParamResolver::new(ParamSource::deferred(move || async move {
            counted.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(CallParams::from_values(vec![Value::from(1u64)]))
        }));

        let (a, b, c) = tokio::join!(resolver.resolve(), resolver.resolve(), resolver.resolve());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Later callers hit the memoized bundle, not the producer.
        resolver.resolve().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_producer_failure_propagates_to_all_waiters() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let resolver = ParamResolver::new(ParamSource::deferred(move || async move {
            counted.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("lookup failed")
        }));

        let (a, b) = tokio::join!(resolver.resolve(), resolver.resolve());
        let a = a.unwrap_err();
        let b = b.unwrap_err();
        assert!(a.to_string().contains("lookup failed"));
        assert!(b.to_string().contains("lookup failed"));

        // No automatic retry: the failure is memoized.
        assert!(resolver.resolve().await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_overrides_carried_through() {
        let params = CallParams::from_values(vec![]).with_value(U256::from(10u64)).with_gas(21000);
        let resolver = ParamResolver::new(params.clone().into());
        let resolved = resolver.resolve().await.unwrap();
        assert_eq!(*resolved, params);
    }
}
