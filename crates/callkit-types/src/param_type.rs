//! ABI parameter types and schema entries.
//!
//! A schema is an ordered `&[Param]`. Order is significant: it fixes both the
//! selector derivation and the encoding order. Parameter names never affect
//! the wire format.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::type_parsing::parse_param_type;

/// The closed set of ABI parameter types.
///
/// Each type has either a fixed-width static encoding (one or more 32-byte
/// words written in place in the head region) or a dynamic encoding (a
/// 32-byte offset slot in the head pointing at length-prefixed payload in
/// the tail region).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(usize),
    /// Signed (two's complement) integer of the given bit width.
    Int(usize),
    /// Boolean, encoded as a full word holding 0 or 1.
    Bool,
    /// 20-byte account address, left-padded to a word.
    Address,
    /// Fixed-length byte sequence of 1..=32 bytes, right-padded to a word.
    FixedBytes(usize),
    /// Dynamic byte sequence.
    Bytes,
    /// Dynamic UTF-8 string.
    String,
    /// Fixed-size array: elements encoded contiguously, no length prefix.
    FixedArray(Box<ParamType>, usize),
    /// Dynamic array: length prefix followed by the elements.
    Array(Box<ParamType>),
    /// Tuple / struct: fields encoded as a nested sequence.
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Whether this type uses the dynamic (offset + tail) encoding.
    ///
    /// Fixed arrays and tuples are dynamic iff any element is dynamic.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(elem, _) => elem.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(|f| f.is_dynamic()),
            _ => false,
        }
    }

    /// Number of 32-byte words this type occupies in the head region of an
    /// enclosing sequence. Dynamic types occupy exactly one offset slot.
    pub fn head_words(&self) -> usize {
        if self.is_dynamic() {
            return 1;
        }
        match self {
            ParamType::FixedArray(elem, n) => elem.head_words() * n,
            ParamType::Tuple(fields) => fields.iter().map(|f| f.head_words()).sum(),
            _ => 1,
        }
    }

    /// The canonical ABI type name, as used in signature normalization.
    ///
    /// Examples: `uint256`, `address`, `bytes32`, `uint8[4]`, `string[]`,
    /// `(address,uint256)`.
    pub fn canonical_name(&self) -> String {
        match self {
            ParamType::Uint(bits) => format!("uint{}", bits),
            ParamType::Int(bits) => format!("int{}", bits),
            ParamType::Bool => "bool".to_string(),
            ParamType::Address => "address".to_string(),
            ParamType::FixedBytes(n) => format!("bytes{}", n),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::String => "string".to_string(),
            ParamType::FixedArray(elem, n) => format!("{}[{}]", elem.canonical_name(), n),
            ParamType::Array(elem) => format!("{}[]", elem.canonical_name()),
            ParamType::Tuple(fields) => {
                let names: Vec<String> = fields.iter().map(|f| f.canonical_name()).collect();
                format!("({})", names.join(","))
            }
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

// ParamType serializes as its canonical ABI type string, so schemas
// round-trip through the standard JSON ABI shape `{"type": "...", "name": "..."}`.
impl Serialize for ParamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical_name())
    }
}

impl<'de> Deserialize<'de> for ParamType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_param_type(&s).ok_or_else(|| D::Error::custom(format!("invalid ABI type: {}", s)))
    }
}

/// A single schema entry: a type plus a parameter name.
///
/// Two schemas with identical type sequences but different names are
/// wire-compatible but considered distinct contract surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter type.
    #[serde(rename = "type")]
    pub ty: ParamType,
    /// Parameter name (documentation only, never encoded).
    pub name: String,
}

impl Param {
    /// Create a schema entry.
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}
