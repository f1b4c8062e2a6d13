//! Vault callables: payable `deposit`, exercising the value override.

use std::future::Future;

use callkit_abi::CallableDescriptor;
use callkit_detect::{DetectError, MethodDetector, TargetHandle};
use callkit_prepare::{prepare, CallOverrides, CallParams, ParamSource, PreparedCall};
use callkit_types::{CodecError, Param, ParamType, Selector, Value, U256};

/// Selector of `deposit(uint256)`.
pub const DEPOSIT_SELECTOR: Selector = Selector::new([0xb6, 0xb5, 0x5f, 0x25]);

/// Descriptor for `deposit(uint256 amount)`.
pub fn deposit_descriptor() -> CallableDescriptor {
    CallableDescriptor::with_selector(
        DEPOSIT_SELECTOR,
        vec![Param::new("amount", ParamType::Uint(256))],
        vec![],
    )
}

/// Parameters for the `deposit` callable.
///
/// `deposit` is payable; set `overrides.value` to attach native value to the
/// call alongside the encoded amount.
#[derive(Debug, Clone, Default)]
pub struct DepositParams {
    pub amount: U256,
    pub overrides: CallOverrides,
}

impl From<DepositParams> for CallParams {
    fn from(p: DepositParams) -> Self {
        CallParams {
            values: vec![Value::Uint(p.amount)],
            overrides: p.overrides,
        }
    }
}

/// Encode the full `deposit` calldata: selector plus parameters.
pub fn encode_deposit(params: &DepositParams) -> Result<Vec<u8>, CodecError> {
    deposit_descriptor().encode_call(&[Value::Uint(params.amount)])
}

/// Whether the target implements `deposit(uint256)`.
pub async fn is_deposit_supported<T: TargetHandle + 'static>(
    detector: &MethodDetector<T>,
) -> Result<bool, DetectError> {
    detector.is_supported(DEPOSIT_SELECTOR).await
}

/// Build a prepared `deposit` call from concrete parameters.
pub fn deposit(params: DepositParams) -> PreparedCall {
    prepare(deposit_descriptor(), ParamSource::Static(params.into()))
}

/// Build a prepared `deposit` call whose parameters are produced
/// asynchronously.
pub fn deposit_deferred<F, Fut>(producer: F) -> PreparedCall
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<DepositParams>> + Send + 'static,
{
    prepare(
        deposit_descriptor(),
        ParamSource::deferred(move || async move { Ok(producer().await?.into()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit_abi::derive_selector;

    #[test]
    fn test_selector_constant_matches_derivation() {
        assert_eq!(
            derive_selector("deposit", deposit_descriptor().inputs()),
            DEPOSIT_SELECTOR
        );
    }

    #[tokio::test]
    async fn test_value_override_rides_along() {
        let call = deposit(DepositParams {
            amount: U256::from(1_000u64),
            overrides: CallOverrides {
                value: Some(U256::from(1_000u64)),
                gas: None,
            },
        });

        let payload = call.encoded_payload().await.unwrap();
        assert_eq!(&payload[..4], DEPOSIT_SELECTOR.as_bytes());
        assert_eq!(call.value_override().await.unwrap(), Some(U256::from(1_000u64)));
    }
}
