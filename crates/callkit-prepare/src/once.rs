//! Single-evaluation memoized futures.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};

/// A future that runs at most once, fanning its (cloneable) output out to
/// every waiter.
///
/// The wrapped future starts executing on the first poll of any waiter;
/// callers that awaited before completion all observe the same eventual
/// value, including failures. There is no cancellation primitive: a waiter
/// that abandons a pending [`wait`](SharedOnce::wait) leaves the memoized
/// computation in place for the next waiter to drive to completion, which
/// avoids inconsistent partial memoization state.
#[derive(Clone)]
pub struct SharedOnce<T: Clone> {
    inner: Shared<BoxFuture<'static, T>>,
}

impl<T: Clone + Send + 'static> SharedOnce<T> {
    /// Wrap a future. Nothing executes until the first wait.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            inner: fut.boxed().shared(),
        }
    }

    /// Await the memoized result.
    pub async fn wait(&self) -> T {
        self.inner.clone().await
    }
}
