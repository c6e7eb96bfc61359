//! Format guards.
//!
//! Typed conversions that mirror on-chain type widths. Each returns the
//! converted value so the facade encodes exactly what was checked.

use alloy::primitives::{hex, Address, Bytes, U256};

use crate::blockchain::types::{SdkError, SdkResult};

/// Parse a `0x`-prefixed, 20-byte hex address.
pub fn address(field: &str, value: &str) -> SdkResult<Address> {
    let digits = value.strip_prefix("0x").ok_or_else(|| {
        SdkError::Format(format!("{field}: address must start with 0x, got '{value}'"))
    })?;

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SdkError::Format(format!(
            "{field}: '{value}' is not a 20-byte hex address"
        )));
    }

    digits
        .parse()
        .map_err(|e| SdkError::Format(format!("{field}: {e}")))
}

/// Parse every address of a list, reporting the first bad index.
pub fn addresses<S: AsRef<str>>(field: &str, values: &[S]) -> SdkResult<Vec<Address>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| address(&format!("{field}[{i}]"), v.as_ref()))
        .collect()
}

/// Decode a `0x`-prefixed hex byte string.
pub fn hex_bytes(field: &str, value: &str) -> SdkResult<Bytes> {
    let digits = value.strip_prefix("0x").ok_or_else(|| {
        SdkError::Format(format!("{field}: byte string must start with 0x"))
    })?;

    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| SdkError::Format(format!("{field}: {e}")))
}

/// Narrow to `uint128`, rejecting values ≥ 2^128.
pub fn uint128(field: &str, value: U256) -> SdkResult<u128> {
    u128::try_from(value).map_err(|_| {
        SdkError::Format(format!("{field}: {value} does not fit in uint128"))
    })
}

/// Narrow to `uint32`, rejecting values ≥ 2^32.
pub fn uint32(field: &str, value: u64) -> SdkResult<u32> {
    u32::try_from(value)
        .map_err(|_| SdkError::Format(format!("{field}: {value} does not fit in uint32")))
}

/// Narrow a unix timestamp to the `uint32` the contracts store.
pub fn timestamp(field: &str, value: u64) -> SdkResult<u32> {
    u32::try_from(value).map_err(|_| {
        SdkError::Format(format!("{field}: timestamp {value} exceeds uint32 range"))
    })
}
