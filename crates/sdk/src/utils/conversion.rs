//! Conversions between ABI values and domain types.
//!
//! ## Conversion Categories
//!
//! 1. **Scalars**: `uint`, `bool`, `address` results
//! 2. **Collections**: `uint[]` results, tuple fields
//! 3. **Addresses**: configuration strings ↔ `Address`

use armada_chain::{Address, DynSolValue, U256};

use crate::core::error::{Result, SdkError};
use crate::core::types::Faction;

// ============================================================================
// Scalars
// ============================================================================

pub fn to_u256(value: &DynSolValue, function: &str) -> Result<U256> {
    value
        .as_uint()
        .map(|(v, _)| v)
        .ok_or_else(|| SdkError::decode("non-uint value", function))
}

pub fn to_u64(value: &DynSolValue, function: &str) -> Result<u64> {
    let raw = to_u256(value, function)?;
    u64::try_from(raw).map_err(|_| SdkError::decode("out-of-range integer", function))
}

pub fn to_u32(value: &DynSolValue, function: &str) -> Result<u32> {
    let raw = to_u256(value, function)?;
    u32::try_from(raw).map_err(|_| SdkError::decode("out-of-range integer", function))
}

pub fn to_u8(value: &DynSolValue, function: &str) -> Result<u8> {
    let raw = to_u256(value, function)?;
    u8::try_from(raw).map_err(|_| SdkError::decode("out-of-range integer", function))
}

pub fn to_bool(value: &DynSolValue, function: &str) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| SdkError::decode("non-bool value", function))
}

/// Faction given either as an index or as a name.
pub fn to_faction(value: &DynSolValue, function: &str) -> Result<Faction> {
    if let Some(name) = value.as_str() {
        return Ok(Faction::from_name(name));
    }
    Ok(Faction::from_index(to_u64(value, function)?))
}

// ============================================================================
// Collections
// ============================================================================

/// Elements of an array or tuple result.
pub fn to_items<'a>(value: &'a DynSolValue, function: &str) -> Result<&'a [DynSolValue]> {
    value
        .as_array()
        .or_else(|| value.as_tuple())
        .ok_or_else(|| SdkError::decode("non-sequence value", function))
}

pub fn to_u256_list(value: &DynSolValue, function: &str) -> Result<Vec<U256>> {
    to_items(value, function)?
        .iter()
        .map(|item| to_u256(item, function))
        .collect()
}

/// Tuple field `index`, failing if the tuple is too short.
pub fn field<'a>(fields: &'a [DynSolValue], index: usize, function: &str) -> Result<&'a DynSolValue> {
    fields
        .get(index)
        .ok_or_else(|| SdkError::decode("short tuple", function))
}

// ============================================================================
// Addresses
// ============================================================================

/// Parse a configured address. Empty input is the zero placeholder.
pub fn parse_address(name: &str, raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Address::ZERO);
    }
    trimmed
        .parse::<Address>()
        .map_err(|e| SdkError::Configuration(format!("invalid {name} address {trimmed:?}: {e}")))
}

/// Whether an address is the all-zero placeholder.
pub fn is_placeholder(address: &Address) -> bool {
    *address == Address::ZERO
}
