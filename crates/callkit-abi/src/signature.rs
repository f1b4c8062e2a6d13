//! Canonical signature rendering and selector derivation.
//!
//! Stateless and deterministic: the same normalized signature text always
//! yields the same selector. Collision handling is the hash function's
//! contract, not ours.

use alloy_primitives::keccak256;
use callkit_types::{Param, Selector};

/// Render the canonical signature text for a callable:
/// `name(type1,type2,...)` using canonical type names.
///
/// Parameter names are not part of the signature; only the type sequence is.
///
/// # Examples
///
/// ```
/// use callkit_abi::canonical_signature;
/// use callkit_types::{Param, ParamType};
///
/// let inputs = [
///     Param::new("to", ParamType::Address),
///     Param::new("amount", ParamType::Uint(256)),
/// ];
/// assert_eq!(canonical_signature("transfer", &inputs), "transfer(address,uint256)");
/// ```
pub fn canonical_signature(name: &str, inputs: &[Param]) -> String {
    let types: Vec<String> = inputs.iter().map(|p| p.ty.canonical_name()).collect();
    format!("{}({})", name, types.join(","))
}

/// Derive the 4-byte selector for a callable: the first four bytes of
/// `keccak256` over the canonical signature text.
pub fn derive_selector(name: &str, inputs: &[Param]) -> Selector {
    let digest = keccak256(canonical_signature(name, inputs).as_bytes());
    Selector::new([digest[0], digest[1], digest[2], digest[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use callkit_types::ParamType;

    fn transfer_inputs() -> Vec<Param> {
        vec![
            Param::new("to", ParamType::Address),
            Param::new("amount", ParamType::Uint(256)),
        ]
    }

    #[test]
    fn test_known_selectors() {
        // Fixtures from widely deployed ERC-20 / vault interfaces.
        assert_eq!(
            derive_selector("transfer", &transfer_inputs()).to_string(),
            "0xa9059cbb"
        );
        assert_eq!(
            derive_selector(
                "approve",
                &[
                    Param::new("spender", ParamType::Address),
                    Param::new("amount", ParamType::Uint(256)),
                ]
            )
            .to_string(),
            "0x095ea7b3"
        );
        assert_eq!(
            derive_selector("balanceOf", &[Param::new("owner", ParamType::Address)]).to_string(),
            "0x70a08231"
        );
        assert_eq!(
            derive_selector("deposit", &[Param::new("amount", ParamType::Uint(256))]).to_string(),
            "0xb6b55f25"
        );
    }

    #[test]
    fn test_determinism() {
        let a = derive_selector("transfer", &transfer_inputs());
        let b = derive_selector("transfer", &transfer_inputs());
        assert_eq!(a, b);
    }

    #[test]
    fn test_names_do_not_affect_selector() {
        let renamed = vec![
            Param::new("recipient", ParamType::Address),
            Param::new("value", ParamType::Uint(256)),
        ];
        assert_eq!(
            derive_selector("transfer", &transfer_inputs()),
            derive_selector("transfer", &renamed)
        );
    }

    #[test]
    fn test_distinct_signatures_distinct_selectors() {
        let sigs = [
            ("transfer", vec![ParamType::Address, ParamType::Uint(256)]),
            ("transfer", vec![ParamType::Address, ParamType::Uint(128)]),
            ("transferFrom", vec![ParamType::Address, ParamType::Uint(256)]),
            ("transfer", vec![ParamType::Uint(256), ParamType::Address]),
        ];
        let selectors: Vec<Selector> = sigs
            .iter()
            .map(|(name, types)| {
                let params: Vec<Param> =
                    types.iter().map(|t| Param::new("p", t.clone())).collect();
                derive_selector(name, &params)
            })
            .collect();
        for i in 0..selectors.len() {
            for j in (i + 1)..selectors.len() {
                assert_ne!(selectors[i], selectors[j]);
            }
        }
    }
}
