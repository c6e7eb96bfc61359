//! Lending pool facade.
//!
//! Pools move `CREATED -> ACTIVE -> CLOSED -> ARCHIVED`, with an admin-only
//! emergency path `CREATED -> ARCHIVED`. The ledger enacts transitions; this
//! client only checks the current status before asking for one.

use alloy::primitives::{Address, U256};
use alloy::sol;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::blockchain::binding::{ContractBinding, Dispatch};
use crate::blockchain::types::{SdkError, SdkResult};
use crate::config::constants::{
    Role, BPS_DENOMINATOR, LIQUIDATION_FEE_BPS, MAX_POOL_FUNDING_WINDOW_SECS,
};
use crate::facades::Facade;
use crate::guards::{constraint, format, range, state, unix_now, GuardChain};
use crate::pagination::{count_to_u64, paginate, Page};

sol! {
    /// Lending pool factory and loan book.
    interface ILendingPool {
        struct Pool {
            uint256 id;
            address creator;
            uint128 softCap;
            uint128 hardCap;
            uint128 totalCommitted;
            uint32 deadline;
            uint32 minimumAPR;
            uint8 status;
            address[] collateralTokens;
        }

        struct Loan {
            uint256 id;
            uint256 poolId;
            address borrower;
            address collateralToken;
            uint128 principal;
            uint128 collateralAmount;
            uint32 startTime;
            uint32 dueTime;
            bool repaid;
            bool liquidated;
        }

        function lendingToken() external view returns (address);
        function poolCount() external view returns (uint256);
        function getPool(uint256 poolId) external view returns (Pool memory);
        function loanCount() external view returns (uint256);
        function getLoan(uint256 loanId) external view returns (Loan memory);
        function getRepaymentAmount(uint256 loanId) external view returns (uint256);

        function createPool(
            uint128 softCap,
            uint128 hardCap,
            uint32 deadline,
            uint32 minimumAPR,
            address[] collateralTokens
        ) external;
        function commit(uint256 poolId, uint128 amount) external;
        function activatePool(uint256 poolId) external;
        function closePool(uint256 poolId) external;
        function archivePool(uint256 poolId) external;
        function emergencyArchivePool(uint256 poolId) external;
        function borrow(
            uint256 poolId,
            uint128 amount,
            address collateralToken,
            uint128 collateralAmount
        ) external;
        function repay(uint256 loanId) external;
        function liquidate(uint256 loanId) external;
    }
}

/// Pool lifecycle status as stored on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolStatus {
    Created,
    Active,
    Closed,
    Archived,
}

impl TryFrom<u8> for PoolStatus {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PoolStatus::Created),
            1 => Ok(PoolStatus::Active),
            2 => Ok(PoolStatus::Closed),
            3 => Ok(PoolStatus::Archived),
            other => Err(SdkError::Abi(format!("unknown pool status {other}"))),
        }
    }
}

impl std::fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PoolStatus::Created => "CREATED",
            PoolStatus::Active => "ACTIVE",
            PoolStatus::Closed => "CLOSED",
            PoolStatus::Archived => "ARCHIVED",
        };
        f.write_str(name)
    }
}

/// A lending pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    pub id: U256,
    pub creator: Address,
    pub soft_cap: u128,
    pub hard_cap: u128,
    pub total_committed: u128,
    pub deadline: u32,
    pub minimum_apr: u32,
    pub status: PoolStatus,
    pub collateral_tokens: Vec<Address>,
}

impl TryFrom<ILendingPool::Pool> for PoolInfo {
    type Error = SdkError;

    fn try_from(pool: ILendingPool::Pool) -> Result<Self, Self::Error> {
        Ok(Self {
            id: pool.id,
            creator: pool.creator,
            soft_cap: pool.softCap,
            hard_cap: pool.hardCap,
            total_committed: pool.totalCommitted,
            deadline: pool.deadline,
            minimum_apr: pool.minimumAPR,
            status: PoolStatus::try_from(pool.status)?,
            collateral_tokens: pool.collateralTokens,
        })
    }
}

/// A loan drawn from a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanInfo {
    pub id: U256,
    pub pool_id: U256,
    pub borrower: Address,
    pub collateral_token: Address,
    pub principal: u128,
    pub collateral_amount: u128,
    pub start_time: u32,
    pub due_time: u32,
    pub repaid: bool,
    pub liquidated: bool,
}

impl LoanInfo {
    /// Neither repaid nor liquidated.
    pub fn is_open(&self) -> bool {
        !self.repaid && !self.liquidated
    }
}

impl From<ILendingPool::Loan> for LoanInfo {
    fn from(loan: ILendingPool::Loan) -> Self {
        Self {
            id: loan.id,
            pool_id: loan.poolId,
            borrower: loan.borrower,
            collateral_token: loan.collateralToken,
            principal: loan.principal,
            collateral_amount: loan.collateralAmount,
            start_time: loan.startTime,
            due_time: loan.dueTime,
            repaid: loan.repaid,
            liquidated: loan.liquidated,
        }
    }
}

/// Arguments of `create_pool`, before width checks.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePoolParams {
    pub soft_cap: U256,
    pub hard_cap: U256,
    /// Unix timestamp closing the funding phase.
    pub deadline: u64,
    pub minimum_apr: u64,
    pub collateral_tokens: Vec<String>,
}

/// Repayment plus the fixed liquidation fee.
pub fn apply_liquidation_fee(repayment: U256) -> U256 {
    repayment.saturating_mul(U256::from(BPS_DENOMINATOR + LIQUIDATION_FEE_BPS))
        / U256::from(BPS_DENOMINATOR)
}

fn expect_status(pool: &PoolInfo, expected: PoolStatus) -> SdkResult<()> {
    state::require(pool.status == expected, || {
        format!("pool {} is {}, expected {}", pool.id, pool.status, expected)
    })
}

/// Client for the lending pool contract.
#[derive(Debug)]
pub struct LendingPool {
    binding: ContractBinding,
    lending_token: OnceCell<Address>,
}

impl Facade for LendingPool {
    const NAME: &'static str = "lending_pool";
    type Interface = ILendingPool::ILendingPoolCalls;

    fn from_binding(binding: ContractBinding) -> Self {
        Self {
            binding,
            lending_token: OnceCell::new(),
        }
    }

    fn binding(&self) -> &ContractBinding {
        &self.binding
    }
}

impl LendingPool {
    // -----------
    // | Queries |
    // -----------

    pub async fn is_paused(&self) -> SdkResult<bool> {
        state::is_paused(&self.binding).await
    }

    pub async fn has_role(&self, role: Role, account: Address) -> SdkResult<bool> {
        state::has_role(&self.binding, role, account).await
    }

    /// Token lent and borrowed by every pool. Resolved once per facade.
    pub async fn lending_token(&self) -> SdkResult<Address> {
        self.lending_token
            .get_or_try_init(|| self.binding.query(ILendingPool::lendingTokenCall {}))
            .await
            .copied()
    }

    pub async fn pool_count(&self) -> SdkResult<U256> {
        self.binding.query(ILendingPool::poolCountCall {}).await
    }

    pub async fn get_pool(&self, pool_id: U256) -> SdkResult<PoolInfo> {
        let pool = self
            .binding
            .query(ILendingPool::getPoolCall { poolId: pool_id })
            .await?;
        PoolInfo::try_from(pool)
    }

    pub async fn get_pools(&self, offset: u64, limit: u64) -> SdkResult<Page<PoolInfo>> {
        paginate(
            offset,
            limit,
            async { count_to_u64(self.pool_count().await?) },
            |i| self.get_pool(U256::from(i)),
        )
        .await
    }

    pub async fn loan_count(&self) -> SdkResult<U256> {
        self.binding.query(ILendingPool::loanCountCall {}).await
    }

    pub async fn get_loan(&self, loan_id: U256) -> SdkResult<LoanInfo> {
        self.binding
            .query(ILendingPool::getLoanCall { loanId: loan_id })
            .await
            .map(LoanInfo::from)
    }

    pub async fn get_loans(&self, offset: u64, limit: u64) -> SdkResult<Page<LoanInfo>> {
        paginate(
            offset,
            limit,
            async { count_to_u64(self.loan_count().await?) },
            |i| self.get_loan(U256::from(i)),
        )
        .await
    }

    /// Principal plus interest accrued so far, as computed by the contract.
    pub async fn repayment_amount(&self, loan_id: U256) -> SdkResult<U256> {
        self.binding
            .query(ILendingPool::getRepaymentAmountCall { loanId: loan_id })
            .await
    }

    /// Amount a liquidator pays: the repayment amount plus the fixed fee.
    pub async fn liquidation_amount(&self, loan_id: U256) -> SdkResult<U256> {
        Ok(apply_liquidation_fee(self.repayment_amount(loan_id).await?))
    }

    // -----------
    // | Actions |
    // -----------

    pub async fn create_pool(&self, params: CreatePoolParams) -> SdkResult<Dispatch> {
        let soft_cap = format::uint128("softCap", params.soft_cap)?;
        let hard_cap = format::uint128("hardCap", params.hard_cap)?;
        let deadline = format::timestamp("deadline", params.deadline)?;
        let minimum_apr = format::uint32("minimumAPR", params.minimum_apr)?;
        let collateral_tokens = format::addresses("collateralTokens", &params.collateral_tokens)?;
        let now = unix_now();

        GuardChain::new("create_pool")
            .check("soft_cap_positive", || range::positive("softCap", soft_cap))
            .check("caps_ordered", || constraint::caps_ordered(soft_cap, hard_cap))
            .check("deadline_window", || {
                constraint::deadline_window(
                    "deadline",
                    params.deadline,
                    now,
                    MAX_POOL_FUNDING_WINDOW_SECS,
                )
            })
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .run()
            .await?;

        self.binding
            .act(ILendingPool::createPoolCall {
                softCap: soft_cap,
                hardCap: hard_cap,
                deadline,
                minimumAPR: minimum_apr,
                collateralTokens: collateral_tokens,
            })
            .await
    }

    /// Commit `amount` of the lending token to a pool still raising funds.
    pub async fn commit(&self, pool_id: U256, amount: U256) -> SdkResult<Dispatch> {
        let amount = format::uint128("amount", amount)?;
        let pool = OnceCell::new();

        GuardChain::new("commit")
            .check("amount_positive", || range::positive("amount", amount))
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("pool_exists", self.pool_exists(pool_id))
            .remote("pool_created", async {
                expect_status(self.cached_pool(&pool, pool_id).await?, PoolStatus::Created)
            })
            .remote("before_deadline", async {
                let pool = self.cached_pool(&pool, pool_id).await?;
                state::require(unix_now() < u64::from(pool.deadline), || {
                    format!("pool {pool_id} funding deadline has passed")
                })
            })
            .remote("within_hard_cap", async {
                let pool = self.cached_pool(&pool, pool_id).await?;
                constraint::within_cap(pool.total_committed, amount, pool.hard_cap)
            })
            .run()
            .await?;

        self.binding
            .act(ILendingPool::commitCall {
                poolId: pool_id,
                amount,
            })
            .await
    }

    pub async fn activate_pool(&self, pool_id: U256) -> SdkResult<Dispatch> {
        let pool = OnceCell::new();

        GuardChain::new("activate_pool")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .remote("pool_exists", self.pool_exists(pool_id))
            .remote("pool_created", async {
                expect_status(self.cached_pool(&pool, pool_id).await?, PoolStatus::Created)
            })
            .remote("soft_cap_reached", async {
                let pool = self.cached_pool(&pool, pool_id).await?;
                if pool.total_committed >= pool.soft_cap {
                    Ok(())
                } else {
                    Err(SdkError::Constraint(format!(
                        "pool {pool_id} has {} committed, below softCap {}",
                        pool.total_committed, pool.soft_cap
                    )))
                }
            })
            .run()
            .await?;

        self.binding
            .act(ILendingPool::activatePoolCall { poolId: pool_id })
            .await
    }

    pub async fn close_pool(&self, pool_id: U256) -> SdkResult<Dispatch> {
        self.transition("close_pool", pool_id, PoolStatus::Active, true)
            .await?;
        self.binding
            .act(ILendingPool::closePoolCall { poolId: pool_id })
            .await
    }

    pub async fn archive_pool(&self, pool_id: U256) -> SdkResult<Dispatch> {
        self.transition("archive_pool", pool_id, PoolStatus::Closed, true)
            .await?;
        self.binding
            .act(ILendingPool::archivePoolCall { poolId: pool_id })
            .await
    }

    /// Archive a pool that never activated. Allowed while paused.
    pub async fn emergency_archive_pool(&self, pool_id: U256) -> SdkResult<Dispatch> {
        self.transition("emergency_archive_pool", pool_id, PoolStatus::Created, false)
            .await?;
        self.binding
            .act(ILendingPool::emergencyArchivePoolCall { poolId: pool_id })
            .await
    }

    pub async fn borrow(
        &self,
        pool_id: U256,
        amount: U256,
        collateral_token: &str,
        collateral_amount: U256,
    ) -> SdkResult<Dispatch> {
        let amount = format::uint128("amount", amount)?;
        let collateral_token = format::address("collateralToken", collateral_token)?;
        let collateral_amount = format::uint128("collateralAmount", collateral_amount)?;
        let pool = OnceCell::new();

        GuardChain::new("borrow")
            .check("amount_positive", || range::positive("amount", amount))
            .check("collateral_positive", || {
                range::positive("collateralAmount", collateral_amount)
            })
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("pool_exists", self.pool_exists(pool_id))
            .remote("pool_active", async {
                expect_status(self.cached_pool(&pool, pool_id).await?, PoolStatus::Active)
            })
            .remote("collateral_accepted", async {
                let pool = self.cached_pool(&pool, pool_id).await?;
                state::require(pool.collateral_tokens.contains(&collateral_token), || {
                    format!("pool {pool_id} does not accept collateral {collateral_token}")
                })
            })
            .run()
            .await?;

        self.binding
            .act(ILendingPool::borrowCall {
                poolId: pool_id,
                amount,
                collateralToken: collateral_token,
                collateralAmount: collateral_amount,
            })
            .await
    }

    pub async fn repay(&self, loan_id: U256) -> SdkResult<Dispatch> {
        let loan = OnceCell::new();

        GuardChain::new("repay")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("loan_exists", self.loan_exists(loan_id))
            .remote("loan_open", async {
                let loan = self.cached_loan(&loan, loan_id).await?;
                state::require(loan.is_open(), || format!("loan {loan_id} is already settled"))
            })
            .remote("caller_is_borrower", async {
                let loan = self.cached_loan(&loan, loan_id).await?;
                state::caller_is(self.binding.connection().caller(), loan.borrower, "borrower")
            })
            .run()
            .await?;

        self.binding
            .act(ILendingPool::repayCall { loanId: loan_id })
            .await
    }

    pub async fn liquidate(&self, loan_id: U256) -> SdkResult<Dispatch> {
        let loan = OnceCell::new();

        GuardChain::new("liquidate")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("loan_exists", self.loan_exists(loan_id))
            .remote("loan_open", async {
                let loan = self.cached_loan(&loan, loan_id).await?;
                state::require(loan.is_open(), || format!("loan {loan_id} is already settled"))
            })
            .remote("past_due", async {
                let loan = self.cached_loan(&loan, loan_id).await?;
                state::require(unix_now() > u64::from(loan.due_time), || {
                    format!("loan {loan_id} is not past due")
                })
            })
            .run()
            .await?;

        self.binding
            .act(ILendingPool::liquidateCall { loanId: loan_id })
            .await
    }

    // -----------
    // | Helpers |
    // -----------

    /// Admin transition guarded on the current status.
    async fn transition(
        &self,
        operation: &'static str,
        pool_id: U256,
        expected: PoolStatus,
        check_pause: bool,
    ) -> SdkResult<()> {
        let mut chain = GuardChain::new(operation);
        if check_pause {
            chain = chain.remote("not_paused", state::not_paused(&self.binding));
        }
        chain
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .remote("pool_exists", self.pool_exists(pool_id))
            .remote("pool_status", async {
                expect_status(&self.get_pool(pool_id).await?, expected)
            })
            .run()
            .await
    }

    async fn pool_exists(&self, pool_id: U256) -> SdkResult<()> {
        state::exists("pool", pool_id, self.pool_count().await?)
    }

    async fn loan_exists(&self, loan_id: U256) -> SdkResult<()> {
        state::exists("loan", loan_id, self.loan_count().await?)
    }

    async fn cached_pool<'c>(
        &self,
        cell: &'c OnceCell<PoolInfo>,
        pool_id: U256,
    ) -> SdkResult<&'c PoolInfo> {
        cell.get_or_try_init(|| self.get_pool(pool_id)).await
    }

    async fn cached_loan<'c>(
        &self,
        cell: &'c OnceCell<LoanInfo>,
        loan_id: U256,
    ) -> SdkResult<&'c LoanInfo> {
        cell.get_or_try_init(|| self.get_loan(loan_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquidation_fee() {
        assert_eq!(apply_liquidation_fee(U256::from(10_000)), U256::from(10_500));
        assert_eq!(apply_liquidation_fee(U256::from(1_000_000)), U256::from(1_050_000));
        assert_eq!(apply_liquidation_fee(U256::ZERO), U256::ZERO);
    }

    #[test]
    fn test_status_decoding() {
        assert_eq!(PoolStatus::try_from(0).unwrap(), PoolStatus::Created);
        assert_eq!(PoolStatus::try_from(3).unwrap(), PoolStatus::Archived);
        assert!(PoolStatus::try_from(4).is_err());
        assert_eq!(PoolStatus::Active.to_string(), "ACTIVE");
    }
}
