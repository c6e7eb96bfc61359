//! Process-wide immutable constants shared by every facade.

use alloy::primitives::{keccak256, B256};
use std::str::FromStr;

use crate::blockchain::types::SdkError;
use crate::guards::format;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Largest page a pagination request may ask for.
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// Fixed liquidation fee applied on top of the repayment amount.
pub const LIQUIDATION_FEE_BPS: u64 = 500;

/// Upper bound on `apr_bps` for staking plans.
pub const MAX_PLAN_APR_BPS: u32 = 10_000;

/// How far in the future a pool funding deadline may be.
pub const MAX_POOL_FUNDING_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;

/// How far in the future a buyback swap deadline may be.
pub const MAX_SWAP_DEADLINE_SECS: u64 = 60 * 60;

/// How far in the future a vesting schedule may start.
pub const MAX_VESTING_START_DELAY_SECS: u64 = 365 * 24 * 60 * 60;

/// Access-control roles checked before privileged actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    DefaultAdmin,
    Admin,
    Operator,
}

impl Role {
    /// Role name as declared in the contracts.
    pub fn name(&self) -> &'static str {
        match self {
            Role::DefaultAdmin => "DEFAULT_ADMIN_ROLE",
            Role::Admin => "ADMIN_ROLE",
            Role::Operator => "OPERATOR_ROLE",
        }
    }

    /// On-chain role identifier.
    pub fn id(&self) -> B256 {
        match self {
            Role::DefaultAdmin => B256::ZERO,
            _ => keccak256(self.name().as_bytes()),
        }
    }

    const ALL: [Role; 3] = [Role::DefaultAdmin, Role::Admin, Role::Operator];
}

/// Accepts a role name (`ADMIN_ROLE`) or its `0x`-prefixed 32-byte id.
impl FromStr for Role {
    type Err = SdkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(role) = Role::ALL.into_iter().find(|r| r.name() == value) {
            return Ok(role);
        }

        let bytes = format::hex_bytes("role", value)?;
        if bytes.len() != 32 {
            return Err(SdkError::Format(format!(
                "role: expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let id = B256::from_slice(&bytes);
        Role::ALL
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| SdkError::Format(format!("role: unknown role id {id}")))
    }
}
