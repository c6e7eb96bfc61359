//! Domain facades over the deployed contract families.
//!
//! Each facade wraps one `ContractBinding` and exposes:
//! - direct queries (decoded into SDK types)
//! - paginated listings of indexed collections
//! - guarded actions returning a `Dispatch`

pub mod buyback;
pub mod lending_pool;
pub mod staking;
pub mod vesting;

use alloy::primitives::Address;
use alloy::sol_types::SolInterface;

use crate::blockchain::binding::ContractBinding;

pub use buyback::{Buyback, Share};
pub use lending_pool::{CreatePoolParams, LendingPool, LoanInfo, PoolInfo, PoolStatus};
pub use staking::{PlanInfo, StakeInfo, Staking};
pub use vesting::{CreateScheduleParams, ScheduleInfo, Vesting};

/// A typed client for one contract family.
pub trait Facade: Sized {
    /// Short name used in logs and configuration.
    const NAME: &'static str;

    /// Compile-time call surface the facade encodes against.
    type Interface: SolInterface;

    fn from_binding(binding: ContractBinding) -> Self;

    fn binding(&self) -> &ContractBinding;

    /// Address of the bound contract.
    fn address(&self) -> Address {
        self.binding().address()
    }
}
