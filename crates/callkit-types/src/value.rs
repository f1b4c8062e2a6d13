//! Runtime values carried through the codec.

use alloy_primitives::{Address, I256, U256};

/// A runtime value conforming to some [`ParamType`](crate::ParamType).
///
/// `Array` is used for both fixed-size and dynamic arrays; the schema decides
/// which encoding applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer (any declared width up to 256 bits).
    Uint(U256),
    /// Signed integer.
    Int(I256),
    /// Boolean.
    Bool(bool),
    /// 20-byte account address.
    Address(Address),
    /// Fixed-length byte sequence; length is checked against the schema.
    FixedBytes(Vec<u8>),
    /// Dynamic byte sequence.
    Bytes(Vec<u8>),
    /// UTF-8 string.
    String(String),
    /// Array elements (fixed or dynamic per the schema).
    Array(Vec<Value>),
    /// Tuple / struct fields.
    Tuple(Vec<Value>),
}

impl Value {
    /// A short shape name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Address(_) => "address",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Extract an unsigned integer, if this value is one.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an address, if this value is one.
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Extract a bool, if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(U256::from(v))
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
