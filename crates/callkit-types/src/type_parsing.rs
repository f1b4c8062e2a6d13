//! Canonical type-string parsing.
//!
//! Parses ABI type names into [`ParamType`] values. This is the inverse of
//! [`ParamType::canonical_name`] and is what schema deserialization uses.
//!
//! Supports:
//! - Primitive types: `bool`, `address`, `string`, `bytes`, `bytesN`,
//!   `uintN`/`intN` (N a multiple of 8 in 8..=256; bare `uint`/`int` mean 256)
//! - Array suffixes: `T[]` and `T[k]`, applied left to right
//! - Tuples: `(T1,T2,...)`, nesting allowed

use crate::param_type::ParamType;

/// Parse a canonical ABI type string into a [`ParamType`].
///
/// Returns `None` for anything that is not a well-formed canonical type.
///
/// # Examples
///
/// ```
/// use callkit_types::{parse_param_type, ParamType};
///
/// assert_eq!(parse_param_type("uint256"), Some(ParamType::Uint(256)));
/// assert_eq!(
///     parse_param_type("address[]"),
///     Some(ParamType::Array(Box::new(ParamType::Address)))
/// );
/// ```
pub fn parse_param_type(type_str: &str) -> Option<ParamType> {
    let type_str = type_str.trim();

    // Peel array suffixes off the end first: for "uint8[4][]" the base is
    // "uint8[4]" and the outermost type is the dynamic array.
    if let Some(rest) = type_str.strip_suffix(']') {
        let open = find_matching_open_bracket(rest)?;
        let base = parse_param_type(&rest[..open])?;
        let len_str = &rest[open + 1..];
        return if len_str.is_empty() {
            Some(ParamType::Array(Box::new(base)))
        } else {
            let len: usize = len_str.parse().ok()?;
            if len == 0 {
                return None;
            }
            Some(ParamType::FixedArray(Box::new(base), len))
        };
    }

    // Tuples
    if let Some(inner) = type_str
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        let mut fields = vec![];
        for part in split_tuple_fields(inner) {
            fields.push(parse_param_type(part)?);
        }
        return Some(ParamType::Tuple(fields));
    }

    // Primitives
    match type_str {
        "bool" => return Some(ParamType::Bool),
        "address" => return Some(ParamType::Address),
        "string" => return Some(ParamType::String),
        "bytes" => return Some(ParamType::Bytes),
        "uint" => return Some(ParamType::Uint(256)),
        "int" => return Some(ParamType::Int(256)),
        _ => {}
    }

    if let Some(bits_str) = type_str.strip_prefix("uint") {
        let bits = parse_bit_width(bits_str)?;
        return Some(ParamType::Uint(bits));
    }
    if let Some(bits_str) = type_str.strip_prefix("int") {
        let bits = parse_bit_width(bits_str)?;
        return Some(ParamType::Int(bits));
    }
    if let Some(n_str) = type_str.strip_prefix("bytes") {
        let n: usize = n_str.parse().ok()?;
        if (1..=32).contains(&n) {
            return Some(ParamType::FixedBytes(n));
        }
    }

    None
}

/// Parse a declared integer bit width: a multiple of 8 in 8..=256.
fn parse_bit_width(s: &str) -> Option<usize> {
    let bits: usize = s.parse().ok()?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return None;
    }
    Some(bits)
}

/// Find the `[` that matches a trailing `]` already stripped from the input.
///
/// `s` is the type string without its final `]`; the match is the last `[`
/// whose bracket depth returns to zero at the end of `s`.
fn find_matching_open_bracket(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().rev() {
        match c {
            ']' => depth += 1,
            '[' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Split tuple fields respecting nested parentheses and brackets.
///
/// Given `"address,(uint256,bytes)[2],bool"`, returns
/// `["address", "(uint256,bytes)[2]", "bool"]` by tracking nesting depth.
fn split_tuple_fields(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    if s.is_empty() {
        return result;
    }

    let mut depth = 0;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    result.push(s[start..].trim());
    result
}
