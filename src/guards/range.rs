//! Range guards.

use alloy::primitives::Address;

use crate::blockchain::types::{SdkError, SdkResult};

/// Require a strictly positive amount.
pub fn positive<T>(field: &str, value: T) -> SdkResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value > T::default() {
        Ok(())
    } else {
        Err(SdkError::Range(format!("{field} must be greater than 0, got {value}")))
    }
}

/// Reject the zero address where a real account is required.
pub fn non_zero_address(field: &str, value: Address) -> SdkResult<()> {
    if value.is_zero() {
        Err(SdkError::Range(format!("{field} must not be the zero address")))
    } else {
        Ok(())
    }
}

/// Require `value <= max`.
pub fn at_most<T>(field: &str, value: T, max: T) -> SdkResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value <= max {
        Ok(())
    } else {
        Err(SdkError::Range(format!("{field} must be at most {max}, got {value}")))
    }
}
