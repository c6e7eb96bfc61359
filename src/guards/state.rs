//! State guards.
//!
//! Checks against remote state, queried fresh on every call. The pause
//! flag and role membership are common to every contract family, so they
//! use a shared access-control interface.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::binding::ContractBinding;
use crate::blockchain::types::{SdkError, SdkResult};
use crate::config::constants::Role;

sol! {
    /// Pause and role surface shared by all deployed contracts.
    interface IAccessControlled {
        function paused() external view returns (bool);
        function hasRole(bytes32 role, address account) external view returns (bool);
    }
}

/// Selectors every facade calls in addition to its own interface.
pub const SHARED_SELECTORS: [[u8; 4]; 2] = [
    IAccessControlled::pausedCall::SELECTOR,
    IAccessControlled::hasRoleCall::SELECTOR,
];

/// Whether the contract is paused.
pub async fn is_paused(binding: &ContractBinding) -> SdkResult<bool> {
    binding.query(IAccessControlled::pausedCall {}).await
}

/// Whether `account` holds `role`.
pub async fn has_role(binding: &ContractBinding, role: Role, account: Address) -> SdkResult<bool> {
    binding
        .query(IAccessControlled::hasRoleCall {
            role: role.id(),
            account,
        })
        .await
}

/// The contract must not be paused.
pub async fn not_paused(binding: &ContractBinding) -> SdkResult<()> {
    if is_paused(binding).await? {
        Err(SdkError::Precondition("contract is paused".to_string()))
    } else {
        Ok(())
    }
}

/// The acting identity must hold `role`.
///
/// Without a known identity the payload is signed elsewhere and the check is
/// left to the ledger.
pub async fn role(binding: &ContractBinding, role: Role) -> SdkResult<()> {
    let Some(caller) = binding.connection().caller() else {
        tracing::debug!(role = role.name(), "No caller identity; role check left to the ledger");
        return Ok(());
    };

    if has_role(binding, role, caller).await? {
        Ok(())
    } else {
        Err(SdkError::Precondition(format!(
            "{caller} does not hold {}",
            role.name()
        )))
    }
}

/// Generic precondition on fetched state.
pub fn require(condition: bool, reason: impl FnOnce() -> String) -> SdkResult<()> {
    if condition {
        Ok(())
    } else {
        Err(SdkError::Precondition(reason()))
    }
}

/// `id` must refer to an existing entity given the on-chain count.
pub fn exists(entity: &str, id: U256, count: U256) -> SdkResult<()> {
    require(id < count, || format!("{entity} {id} does not exist"))
}

/// When the acting identity is known it must equal `expected`.
pub fn caller_is(caller: Option<Address>, expected: Address, role: &str) -> SdkResult<()> {
    match caller {
        Some(caller) if caller != expected => Err(SdkError::Precondition(format!(
            "caller {caller} is not the {role} {expected}"
        ))),
        _ => Ok(()),
    }
}

/// The acting identity must be known.
pub fn caller_required(caller: Option<Address>) -> SdkResult<Address> {
    caller.ok_or_else(|| {
        SdkError::Precondition("operation requires a known caller identity".to_string())
    })
}
