//! Cross-field guards.

use crate::blockchain::types::{SdkError, SdkResult};
use crate::config::constants::BPS_DENOMINATOR;

/// Soft cap must be strictly below hard cap.
pub fn caps_ordered(soft_cap: u128, hard_cap: u128) -> SdkResult<()> {
    if soft_cap < hard_cap {
        Ok(())
    } else {
        Err(SdkError::Constraint(
            "softCap must be less than hardCap".to_string(),
        ))
    }
}

/// `deadline` must lie in `(now, now + max_window]`.
pub fn deadline_window(field: &str, deadline: u64, now: u64, max_window: u64) -> SdkResult<()> {
    if deadline <= now {
        return Err(SdkError::Constraint(format!(
            "{field} must be in the future"
        )));
    }
    if deadline - now > max_window {
        return Err(SdkError::Constraint(format!(
            "{field} must be within {max_window} seconds from now"
        )));
    }
    Ok(())
}

/// `start` must not be more than `max_delay` seconds ahead of `now`.
pub fn start_window(field: &str, start: u64, now: u64, max_delay: u64) -> SdkResult<()> {
    if start.saturating_sub(now) > max_delay {
        Err(SdkError::Constraint(format!(
            "{field} must be within {max_delay} seconds from now"
        )))
    } else {
        Ok(())
    }
}

/// `earlier <= later`, e.g. cliff within duration.
pub fn not_after(earlier_field: &str, earlier: u64, later_field: &str, later: u64) -> SdkResult<()> {
    if earlier <= later {
        Ok(())
    } else {
        Err(SdkError::Constraint(format!(
            "{earlier_field} must not exceed {later_field}"
        )))
    }
}

/// Parallel lists must have the same length.
pub fn equal_lengths(left_field: &str, left: usize, right_field: &str, right: usize) -> SdkResult<()> {
    if left == right {
        Ok(())
    } else {
        Err(SdkError::Constraint(format!(
            "{left_field} and {right_field} must have the same length ({left} != {right})"
        )))
    }
}

/// Basis points must sum to exactly the denominator.
pub fn bps_sum(field: &str, bps: &[u16]) -> SdkResult<()> {
    let total: u64 = bps.iter().map(|b| u64::from(*b)).sum();
    if total == BPS_DENOMINATOR {
        Ok(())
    } else {
        Err(SdkError::Constraint(format!(
            "{field} must sum to {BPS_DENOMINATOR}, got {total}"
        )))
    }
}

/// A new commitment must not push the total past the hard cap.
pub fn within_cap(committed: u128, amount: u128, hard_cap: u128) -> SdkResult<()> {
    match committed.checked_add(amount) {
        Some(total) if total <= hard_cap => Ok(()),
        _ => Err(SdkError::Constraint(format!(
            "commitment of {amount} exceeds remaining capacity {}",
            hard_cap.saturating_sub(committed)
        ))),
    }
}
