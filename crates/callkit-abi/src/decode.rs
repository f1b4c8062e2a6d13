//! Schema-driven decoding from the canonical head/tail wire format.
//!
//! The decoder is strict: insufficient bytes fail with
//! [`CodecError::DecodingTruncated`], and non-canonical input (bad padding,
//! invalid boolean words, invalid UTF-8, offsets past the buffer) fails with
//! [`CodecError::DecodingInvalid`] rather than being coerced.

use alloy_primitives::{Address, I256, U256};
use callkit_types::{CodecError, Param, ParamType, Value};

/// Decode `data` against `schema`, reversing [`encode`](crate::encode).
///
/// Head slots are read in schema order; for dynamic types the offset is
/// followed into the tail, where a length prefix precedes the payload.
pub fn decode(schema: &[Param], data: &[u8]) -> Result<Vec<Value>, CodecError> {
    let types: Vec<&ParamType> = schema.iter().map(|p| &p.ty).collect();
    decode_sequence(&types, data, 0)
}

/// Decode a sequence of typed values whose head starts at `frame`.
///
/// Offsets read from the head are relative to `frame`, the start of the
/// enclosing sequence's encoding.
fn decode_sequence(
    types: &[&ParamType],
    data: &[u8],
    frame: usize,
) -> Result<Vec<Value>, CodecError> {
    let mut cursor = frame;
    let mut out = Vec::with_capacity(types.len());

    for ty in types {
        if ty.is_dynamic() {
            let offset = read_len_word(data, cursor)?;
            let at = frame.checked_add(offset).ok_or(CodecError::DecodingInvalid {
                offset: cursor,
                reason: "offset overflows".to_string(),
            })?;
            if at > data.len() {
                return Err(CodecError::DecodingInvalid {
                    offset: cursor,
                    reason: format!("offset {} past end of buffer ({})", offset, data.len()),
                });
            }
            out.push(decode_dynamic(ty, data, at)?);
            cursor += 32;
        } else {
            out.push(decode_static(ty, data, cursor)?);
            cursor += ty.head_words() * 32;
        }
    }

    Ok(out)
}

/// Decode a static-width value at `at`.
fn decode_static(ty: &ParamType, data: &[u8], at: usize) -> Result<Value, CodecError> {
    match ty {
        ParamType::Uint(bits) => {
            let word = read_word(data, at)?;
            let v = U256::from_be_bytes::<32>(word);
            if v.bit_len() > *bits {
                return Err(CodecError::DecodingInvalid {
                    offset: at,
                    reason: format!("value does not fit {}", ty.canonical_name()),
                });
            }
            Ok(Value::Uint(v))
        }
        ParamType::Int(bits) => {
            let word = read_word(data, at)?;
            if !crate::encode::signed_fits(&word, *bits) {
                return Err(CodecError::DecodingInvalid {
                    offset: at,
                    reason: format!("value does not fit {}", ty.canonical_name()),
                });
            }
            Ok(Value::Int(I256::from_be_bytes::<32>(word)))
        }
        ParamType::Bool => {
            let word = read_word(data, at)?;
            if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                return Err(CodecError::DecodingInvalid {
                    offset: at,
                    reason: "invalid boolean word".to_string(),
                });
            }
            Ok(Value::Bool(word[31] == 1))
        }
        ParamType::Address => {
            let word = read_word(data, at)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(CodecError::DecodingInvalid {
                    offset: at,
                    reason: "address word has non-zero padding".to_string(),
                });
            }
            Ok(Value::Address(Address::from_slice(&word[12..])))
        }
        ParamType::FixedBytes(n) => {
            let word = read_word(data, at)?;
            if word[*n..].iter().any(|b| *b != 0) {
                return Err(CodecError::DecodingInvalid {
                    offset: at,
                    reason: format!("{} word has non-zero padding", ty.canonical_name()),
                });
            }
            Ok(Value::FixedBytes(word[..*n].to_vec()))
        }
        ParamType::FixedArray(elem, n) => {
            let elem_types: Vec<&ParamType> = std::iter::repeat(&**elem).take(*n).collect();
            Ok(Value::Array(decode_sequence(&elem_types, data, at)?))
        }
        ParamType::Tuple(fields) => {
            let field_types: Vec<&ParamType> = fields.iter().collect();
            Ok(Value::Tuple(decode_sequence(&field_types, data, at)?))
        }
        // Dynamic types are routed to decode_dynamic by the caller.
        ParamType::Bytes | ParamType::String | ParamType::Array(_) => {
            unreachable!("dynamic type in static position")
        }
    }
}

/// Decode a dynamic value whose tail payload starts at `at`.
fn decode_dynamic(ty: &ParamType, data: &[u8], at: usize) -> Result<Value, CodecError> {
    match ty {
        ParamType::Bytes => Ok(Value::Bytes(read_length_prefixed(data, at)?)),
        ParamType::String => {
            let bytes = read_length_prefixed(data, at)?;
            let s = String::from_utf8(bytes).map_err(|_| CodecError::DecodingInvalid {
                offset: at,
                reason: "string payload is not valid UTF-8".to_string(),
            })?;
            Ok(Value::String(s))
        }
        ParamType::Array(elem) => {
            let len = read_len_word(data, at)?;
            // Bound the wire-supplied length before materializing anything:
            // every element occupies at least one word in the sequence, so a
            // length the remaining buffer cannot hold is truncated input.
            let remaining = data.len() - (at + 32);
            if len > remaining / 32 {
                return Err(CodecError::DecodingTruncated {
                    offset: at + 32,
                    needed: len.saturating_mul(32),
                    available: remaining,
                });
            }
            let elem_types: Vec<&ParamType> = std::iter::repeat(&**elem).take(len).collect();
            Ok(Value::Array(decode_sequence(&elem_types, data, at + 32)?))
        }
        ParamType::FixedArray(elem, n) => {
            let elem_types: Vec<&ParamType> = std::iter::repeat(&**elem).take(*n).collect();
            Ok(Value::Array(decode_sequence(&elem_types, data, at)?))
        }
        ParamType::Tuple(fields) => {
            let field_types: Vec<&ParamType> = fields.iter().collect();
            Ok(Value::Tuple(decode_sequence(&field_types, data, at)?))
        }
        _ => unreachable!("static type in dynamic position"),
    }
}

/// Read a length-prefixed payload: a length word at `at`, then that many
/// payload bytes.
fn read_length_prefixed(data: &[u8], at: usize) -> Result<Vec<u8>, CodecError> {
    let len = read_len_word(data, at)?;
    // read_len_word guarantees at + 32 <= data.len(), so this subtraction
    // cannot underflow and the comparison cannot overflow.
    let start = at + 32;
    if len > data.len() - start {
        return Err(CodecError::DecodingTruncated {
            offset: start,
            needed: len,
            available: data.len() - start,
        });
    }
    Ok(data[start..start + len].to_vec())
}

/// Read a 32-byte word at `at`.
fn read_word(data: &[u8], at: usize) -> Result<[u8; 32], CodecError> {
    if at + 32 > data.len() {
        return Err(CodecError::DecodingTruncated {
            offset: at,
            needed: 32,
            available: data.len().saturating_sub(at),
        });
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(&data[at..at + 32]);
    Ok(word)
}

/// Read a word that must fit in `usize` (offsets and lengths).
fn read_len_word(data: &[u8], at: usize) -> Result<usize, CodecError> {
    let word = read_word(data, at)?;
    let v = U256::from_be_bytes::<32>(word);
    usize::try_from(v).map_err(|_| CodecError::DecodingInvalid {
        offset: at,
        reason: "length word out of range".to_string(),
    })
}
