//! Per-target method detection with single-flight memoization.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, trace};

use callkit_types::Selector;

use crate::{DetectError, TargetHandle};

type BytecodeFuture = Shared<BoxFuture<'static, Result<Option<Arc<Vec<u8>>>, DetectError>>>;
type DetectFuture = Shared<BoxFuture<'static, Result<bool, DetectError>>>;

/// Detects whether a target implements given selectors, caching results for
/// the detector's lifetime.
///
/// The target's bytecode is fetched at most once per detector, shared by all
/// selector queries. Each `(target, selector)` outcome — including failures —
/// is memoized with single-flight semantics: concurrent duplicate queries
/// await the same in-flight computation instead of triggering redundant work.
///
/// Target bytecode is treated as immutable for the detector's lifetime; if a
/// target can be redeployed, construct a fresh detector. The cache is scoped
/// to this object, never process-wide.
pub struct MethodDetector<T: TargetHandle + 'static> {
    target: Arc<T>,
    bytecode: BytecodeFuture,
    results: Mutex<HashMap<Selector, DetectFuture>>,
}

impl<T: TargetHandle + 'static> MethodDetector<T> {
    /// Wrap a target handle. Performs no I/O; the bytecode fetch happens on
    /// the first detection query.
    pub fn new(target: T) -> Self {
        let target = Arc::new(target);
        let bytecode = {
            let target = target.clone();
            async move {
                let id = target.target_id();
                debug!(target_id = %id, "fetching target bytecode");
                match target.bytecode().await {
                    Ok(Some(code)) => Ok(Some(Arc::new(code))),
                    Ok(None) => Ok(None),
                    Err(e) => Err(DetectError::TargetUnreachable {
                        target: id,
                        reason: format!("{e:#}"),
                    }),
                }
            }
            .boxed()
            .shared()
        };
        Self {
            target,
            bytecode,
            results: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the target implements `selector`.
    ///
    /// Returns [`DetectError::Indeterminate`] when the target has no
    /// inspectable bytecode and [`DetectError::TargetUnreachable`] when the
    /// bytecode fetch fails; neither is ever coerced to `Ok(false)`.
    pub async fn is_supported(&self, selector: Selector) -> Result<bool, DetectError> {
        let fut = {
            let mut results = self.results.lock();
            if let Some(existing) = results.get(&selector) {
                trace!(%selector, "detection cache hit");
                existing.clone()
            } else {
                let bytecode = self.bytecode.clone();
                let id = self.target.target_id();
                let fut = async move {
                    match bytecode.await? {
                        Some(code) => {
                            let supported = contains_selector(&code, selector);
                            debug!(target_id = %id, %selector, supported, "detection computed");
                            Ok(supported)
                        }
                        None => Err(DetectError::Indeterminate {
                            target: id,
                            selector,
                        }),
                    }
                }
                .boxed()
                .shared();
                results.insert(selector, fut.clone());
                fut
            }
        };
        fut.await
    }

    /// The wrapped target handle.
    pub fn target(&self) -> &T {
        &self.target
    }
}

/// Whether `code` contains `selector` as a contiguous byte subsequence.
///
/// A standard dispatcher embeds each supported selector as a PUSH4
/// immediate, so presence of the 4-byte pattern is the support signal.
pub fn contains_selector(code: &[u8], selector: Selector) -> bool {
    code.windows(4).any(|w| w == selector.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TRANSFER: Selector = Selector::new([0xa9, 0x05, 0x9c, 0xbb]);
    const APPROVE: Selector = Selector::new([0x09, 0x5e, 0xa7, 0xb3]);

    /// Synthetic dispatcher bytecode embedding the transfer selector as a
    /// PUSH4 immediate.
    fn dispatcher_code() -> Vec<u8> {
        let mut code = vec![0x60, 0x80, 0x60, 0x40, 0x52];
        code.push(0x63);
        code.extend_from_slice(TRANSFER.as_bytes());
        code.extend_from_slice(&[0x14, 0x61, 0x00, 0x57]);
        code
    }

    struct FakeTarget {
        code: Option<Vec<u8>>,
        fail: bool,
        fetches: AtomicUsize,
    }

    impl FakeTarget {
        fn deployed(code: Vec<u8>) -> Self {
            Self {
                code: Some(code),
                fail: false,
                fetches: AtomicUsize::new(0),
            }
        }

        fn undeployed() -> Self {
            Self {
                code: None,
                fail: false,
                fetches: AtomicUsize::new(0),
            }
        }

        fn unreachable() -> Self {
            Self {
                code: None,
                fail: true,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl TargetHandle for FakeTarget {
        fn target_id(&self) -> String {
            "1:0x0000000000000000000000000000000000000001".to_string()
        }

        async fn bytecode(&self) -> anyhow::Result<Option<Vec<u8>>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self.code.clone())
        }
    }

    #[test]
    fn test_contains_selector() {
        assert!(contains_selector(&dispatcher_code(), TRANSFER));
        assert!(!contains_selector(&dispatcher_code(), APPROVE));
        assert!(!contains_selector(&[], TRANSFER));
    }

    #[tokio::test]
    async fn test_detects_supported_and_unsupported() {
        let detector = MethodDetector::new(FakeTarget::deployed(dispatcher_code()));
        assert_eq!(detector.is_supported(TRANSFER).await, Ok(true));
        assert_eq!(detector.is_supported(APPROVE).await, Ok(false));
    }

    #[tokio::test]
    async fn test_bytecode_fetched_once() {
        let detector = MethodDetector::new(FakeTarget::deployed(dispatcher_code()));
        detector.is_supported(TRANSFER).await.unwrap();
        detector.is_supported(TRANSFER).await.unwrap();
        detector.is_supported(APPROVE).await.unwrap();
        assert_eq!(detector.target().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_one_fetch() {
        let detector = Arc::new(MethodDetector::new(FakeTarget::deployed(dispatcher_code())));
        let (a, b, c) = tokio::join!(
            detector.is_supported(TRANSFER),
            detector.is_supported(TRANSFER),
            detector.is_supported(APPROVE),
        );
        assert_eq!(a, Ok(true));
        assert_eq!(b, Ok(true));
        assert_eq!(c, Ok(false));
        assert_eq!(detector.target().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_bytecode_is_indeterminate() {
        let detector = MethodDetector::new(FakeTarget::undeployed());
        let err = detector.is_supported(TRANSFER).await.unwrap_err();
        assert!(matches!(err, DetectError::Indeterminate { selector, .. } if selector == TRANSFER));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_unreachable_and_cached() {
        let detector = MethodDetector::new(FakeTarget::unreachable());
        let first = detector.is_supported(TRANSFER).await.unwrap_err();
        assert!(matches!(first, DetectError::TargetUnreachable { .. }));

        // The failure is memoized like a success; no second fetch.
        let second = detector.is_supported(TRANSFER).await.unwrap_err();
        assert_eq!(first, second);
        assert_eq!(detector.target().fetches.load(Ordering::SeqCst), 1);
    }
}
