//! ERC-20 callables: `transfer`, `approve`, `balanceOf`.

use std::future::Future;

use callkit_abi::CallableDescriptor;
use callkit_detect::{DetectError, MethodDetector, TargetHandle};
use callkit_prepare::{prepare, CallOverrides, CallParams, ParamSource, PreparedCall};
use callkit_types::{Address, CodecError, Param, ParamType, Selector, Value, U256};

/// Selector of `transfer(address,uint256)`.
pub const TRANSFER_SELECTOR: Selector = Selector::new([0xa9, 0x05, 0x9c, 0xbb]);
/// Selector of `approve(address,uint256)`.
pub const APPROVE_SELECTOR: Selector = Selector::new([0x09, 0x5e, 0xa7, 0xb3]);
/// Selector of `balanceOf(address)`.
pub const BALANCE_OF_SELECTOR: Selector = Selector::new([0x70, 0xa0, 0x82, 0x31]);

fn spender_amount_inputs(first_name: &str) -> Vec<Param> {
    vec![
        Param::new(first_name, ParamType::Address),
        Param::new("amount", ParamType::Uint(256)),
    ]
}

/// Descriptor for `transfer(address to, uint256 amount) -> (bool)`.
pub fn transfer_descriptor() -> CallableDescriptor {
    CallableDescriptor::with_selector(
        TRANSFER_SELECTOR,
        spender_amount_inputs("to"),
        vec![Param::new("success", ParamType::Bool)],
    )
}

/// Descriptor for `approve(address spender, uint256 amount) -> (bool)`.
pub fn approve_descriptor() -> CallableDescriptor {
    CallableDescriptor::with_selector(
        APPROVE_SELECTOR,
        spender_amount_inputs("spender"),
        vec![Param::new("success", ParamType::Bool)],
    )
}

/// Descriptor for `balanceOf(address owner) -> (uint256)`.
pub fn balance_of_descriptor() -> CallableDescriptor {
    CallableDescriptor::with_selector(
        BALANCE_OF_SELECTOR,
        vec![Param::new("owner", ParamType::Address)],
        vec![Param::new("balance", ParamType::Uint(256))],
    )
}

/// Parameters for the `transfer` callable.
#[derive(Debug, Clone, Default)]
pub struct TransferParams {
    pub to: Address,
    pub amount: U256,
    pub overrides: CallOverrides,
}

impl From<TransferParams> for CallParams {
    fn from(p: TransferParams) -> Self {
        CallParams {
            values: vec![Value::Address(p.to), Value::Uint(p.amount)],
            overrides: p.overrides,
        }
    }
}

/// Parameters for the `approve` callable.
#[derive(Debug, Clone, Default)]
pub struct ApproveParams {
    pub spender: Address,
    pub amount: U256,
    pub overrides: CallOverrides,
}

impl From<ApproveParams> for CallParams {
    fn from(p: ApproveParams) -> Self {
        CallParams {
            values: vec![Value::Address(p.spender), Value::Uint(p.amount)],
            overrides: p.overrides,
        }
    }
}

/// Encode the parameters for `transfer` (no selector prefix).
pub fn encode_transfer_params(params: &TransferParams) -> Result<Vec<u8>, CodecError> {
    callkit_abi::encode(
        transfer_descriptor().inputs(),
        &[Value::Address(params.to), Value::Uint(params.amount)],
    )
}

/// Encode the full `transfer` calldata: selector plus parameters.
pub fn encode_transfer(params: &TransferParams) -> Result<Vec<u8>, CodecError> {
    transfer_descriptor().encode_call(&[Value::Address(params.to), Value::Uint(params.amount)])
}

/// Whether the target implements `transfer(address,uint256)`.
pub async fn is_transfer_supported<T: TargetHandle + 'static>(
    detector: &MethodDetector<T>,
) -> Result<bool, DetectError> {
    detector.is_supported(TRANSFER_SELECTOR).await
}

/// Whether the target implements `approve(address,uint256)`.
pub async fn is_approve_supported<T: TargetHandle + 'static>(
    detector: &MethodDetector<T>,
) -> Result<bool, DetectError> {
    detector.is_supported(APPROVE_SELECTOR).await
}

/// Whether the target implements `balanceOf(address)`.
pub async fn is_balance_of_supported<T: TargetHandle + 'static>(
    detector: &MethodDetector<T>,
) -> Result<bool, DetectError> {
    detector.is_supported(BALANCE_OF_SELECTOR).await
}

/// Build a prepared `transfer` call from concrete parameters.
pub fn transfer(params: TransferParams) -> PreparedCall {
    prepare(transfer_descriptor(), ParamSource::Static(params.into()))
}

/// Build a prepared `transfer` call whose parameters are produced
/// asynchronously. The producer runs at most once, on first access.
pub fn transfer_deferred<F, Fut>(producer: F) -> PreparedCall
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<TransferParams>> + Send + 'static,
{
    prepare(
        transfer_descriptor(),
        ParamSource::deferred(move || async move { Ok(producer().await?.into()) }),
    )
}

/// Build a prepared `approve` call from concrete parameters.
pub fn approve(params: ApproveParams) -> PreparedCall {
    prepare(approve_descriptor(), ParamSource::Static(params.into()))
}

/// Build a prepared `balanceOf` call.
pub fn balance_of(owner: Address) -> PreparedCall {
    prepare(
        balance_of_descriptor(),
        ParamSource::from_values(vec![Value::Address(owner)]),
    )
}

/// Decode a `balanceOf` return payload into the balance.
pub fn decode_balance_of_result(data: &[u8]) -> Result<U256, CodecError> {
    let values = balance_of_descriptor().decode_output(data)?;
    // Output schema is exactly one uint256.
    Ok(values[0].as_uint().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit_abi::derive_selector;

    #[test]
    fn test_selector_constants_match_derivation() {
        assert_eq!(
            derive_selector("transfer", transfer_descriptor().inputs()),
            TRANSFER_SELECTOR
        );
        assert_eq!(
            derive_selector("approve", approve_descriptor().inputs()),
            APPROVE_SELECTOR
        );
        assert_eq!(
            derive_selector("balanceOf", balance_of_descriptor().inputs()),
            BALANCE_OF_SELECTOR
        );
    }

    #[test]
    fn test_encode_transfer_layout() {
        let params = TransferParams {
            to: Address::repeat_byte(0x11),
            amount: U256::from(100u64),
            overrides: CallOverrides::default(),
        };

        let body = encode_transfer_params(&params).unwrap();
        assert_eq!(body.len(), 64);

        let full = encode_transfer(&params).unwrap();
        assert_eq!(&full[..4], TRANSFER_SELECTOR.as_bytes());
        assert_eq!(&full[4..], &body[..]);
    }

    #[test]
    fn test_decode_balance_of_result() {
        let mut word = [0u8; 32];
        word[31] = 42;
        assert_eq!(decode_balance_of_result(&word).unwrap(), U256::from(42u64));
    }
}
