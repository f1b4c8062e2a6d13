//! The immutable callable descriptor.

use serde::{Deserialize, Serialize};

use callkit_types::{CodecError, Param, Selector, Value};

use crate::decode::decode;
use crate::encode::encode_with_selector;
use crate::signature::derive_selector;

/// An immutable description of a callable: its selector, input schema, and
/// output schema (possibly empty).
///
/// Created once per callable definition and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableDescriptor {
    selector: Selector,
    inputs: Vec<Param>,
    outputs: Vec<Param>,
}

impl CallableDescriptor {
    /// Define a callable by name, deriving its selector from the canonical
    /// signature.
    pub fn new(name: &str, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        let selector = derive_selector(name, &inputs);
        Self {
            selector,
            inputs,
            outputs,
        }
    }

    /// Define a callable with a pre-derived selector constant. Generated-style
    /// callable modules use this and cross-check the constant in tests.
    pub fn with_selector(selector: Selector, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        Self {
            selector,
            inputs,
            outputs,
        }
    }

    /// The 4-byte selector.
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// The input parameter schema.
    pub fn inputs(&self) -> &[Param] {
        &self.inputs
    }

    /// The output parameter schema.
    pub fn outputs(&self) -> &[Param] {
        &self.outputs
    }

    /// Encode a full calldata payload for this callable:
    /// `selector ++ encode(inputs, values)`.
    pub fn encode_call(&self, values: &[Value]) -> Result<Vec<u8>, CodecError> {
        encode_with_selector(self.selector, &self.inputs, values)
    }

    /// Decode a return payload against the output schema.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Value>, CodecError> {
        decode(&self.outputs, data)
    }
}
