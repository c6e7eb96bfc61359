//! Staking plans facade.

use alloy::primitives::{Address, U256};
use alloy::sol;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::blockchain::binding::{ContractBinding, Dispatch};
use crate::blockchain::types::SdkResult;
use crate::config::constants::{Role, MAX_PLAN_APR_BPS};
use crate::facades::Facade;
use crate::guards::{format, range, state, unix_now, GuardChain};
use crate::pagination::{count_to_u64, paginate, Page};

sol! {
    /// Fixed-term staking plans.
    interface IStaking {
        struct Plan {
            uint256 id;
            uint128 minStake;
            uint32 lockDuration;
            uint32 aprBps;
            bool active;
        }

        struct StakePosition {
            uint256 id;
            uint256 planId;
            address owner;
            uint128 amount;
            uint32 startTime;
            uint32 unlockTime;
            bool withdrawn;
        }

        function stakingToken() external view returns (address);
        function planCount() external view returns (uint256);
        function getPlan(uint256 planId) external view returns (Plan memory);
        function stakeCount() external view returns (uint256);
        function getStake(uint256 stakeId) external view returns (StakePosition memory);
        function pendingRewards(uint256 stakeId) external view returns (uint256);

        function createPlan(uint128 minStake, uint32 lockDuration, uint32 aprBps) external;
        function setPlanActive(uint256 planId, bool active) external;
        function stake(uint256 planId, uint128 amount) external;
        function withdraw(uint256 stakeId) external;
        function claimRewards(uint256 stakeId) external;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanInfo {
    pub id: U256,
    pub min_stake: u128,
    pub lock_duration: u32,
    pub apr_bps: u32,
    pub active: bool,
}

impl From<IStaking::Plan> for PlanInfo {
    fn from(plan: IStaking::Plan) -> Self {
        Self {
            id: plan.id,
            min_stake: plan.minStake,
            lock_duration: plan.lockDuration,
            apr_bps: plan.aprBps,
            active: plan.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StakeInfo {
    pub id: U256,
    pub plan_id: U256,
    pub owner: Address,
    pub amount: u128,
    pub start_time: u32,
    pub unlock_time: u32,
    pub withdrawn: bool,
}

impl From<IStaking::StakePosition> for StakeInfo {
    fn from(stake: IStaking::StakePosition) -> Self {
        Self {
            id: stake.id,
            plan_id: stake.planId,
            owner: stake.owner,
            amount: stake.amount,
            start_time: stake.startTime,
            unlock_time: stake.unlockTime,
            withdrawn: stake.withdrawn,
        }
    }
}

/// Client for the staking contract.
#[derive(Debug)]
pub struct Staking {
    binding: ContractBinding,
    staking_token: OnceCell<Address>,
}

impl Facade for Staking {
    const NAME: &'static str = "staking";
    type Interface = IStaking::IStakingCalls;

    fn from_binding(binding: ContractBinding) -> Self {
        Self {
            binding,
            staking_token: OnceCell::new(),
        }
    }

    fn binding(&self) -> &ContractBinding {
        &self.binding
    }
}

impl Staking {
    pub async fn is_paused(&self) -> SdkResult<bool> {
        state::is_paused(&self.binding).await
    }

    pub async fn has_role(&self, role: Role, account: Address) -> SdkResult<bool> {
        state::has_role(&self.binding, role, account).await
    }

    /// Token accepted by every plan. Resolved once per facade.
    pub async fn staking_token(&self) -> SdkResult<Address> {
        self.staking_token
            .get_or_try_init(|| self.binding.query(IStaking::stakingTokenCall {}))
            .await
            .copied()
    }

    pub async fn plan_count(&self) -> SdkResult<U256> {
        self.binding.query(IStaking::planCountCall {}).await
    }

    pub async fn get_plan(&self, plan_id: U256) -> SdkResult<PlanInfo> {
        self.binding
            .query(IStaking::getPlanCall { planId: plan_id })
            .await
            .map(PlanInfo::from)
    }

    pub async fn get_plans(&self, offset: u64, limit: u64) -> SdkResult<Page<PlanInfo>> {
        paginate(
            offset,
            limit,
            async { count_to_u64(self.plan_count().await?) },
            |i| self.get_plan(U256::from(i)),
        )
        .await
    }

    pub async fn stake_count(&self) -> SdkResult<U256> {
        self.binding.query(IStaking::stakeCountCall {}).await
    }

    pub async fn get_stake(&self, stake_id: U256) -> SdkResult<StakeInfo> {
        self.binding
            .query(IStaking::getStakeCall { stakeId: stake_id })
            .await
            .map(StakeInfo::from)
    }

    pub async fn get_stakes(&self, offset: u64, limit: u64) -> SdkResult<Page<StakeInfo>> {
        paginate(
            offset,
            limit,
            async { count_to_u64(self.stake_count().await?) },
            |i| self.get_stake(U256::from(i)),
        )
        .await
    }

    pub async fn pending_rewards(&self, stake_id: U256) -> SdkResult<U256> {
        self.binding
            .query(IStaking::pendingRewardsCall { stakeId: stake_id })
            .await
    }

    pub async fn create_plan(
        &self,
        min_stake: U256,
        lock_duration: u64,
        apr_bps: u64,
    ) -> SdkResult<Dispatch> {
        let min_stake = format::uint128("minStake", min_stake)?;
        let lock_duration = format::uint32("lockDuration", lock_duration)?;
        let apr_bps = format::uint32("aprBps", apr_bps)?;

        GuardChain::new("create_plan")
            .check("min_stake_positive", || range::positive("minStake", min_stake))
            .check("lock_duration_positive", || {
                range::positive("lockDuration", lock_duration)
            })
            .check("apr_bounded", || range::at_most("aprBps", apr_bps, MAX_PLAN_APR_BPS))
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .run()
            .await?;

        self.binding
            .act(IStaking::createPlanCall {
                minStake: min_stake,
                lockDuration: lock_duration,
                aprBps: apr_bps,
            })
            .await
    }

    pub async fn set_plan_active(&self, plan_id: U256, active: bool) -> SdkResult<Dispatch> {
        GuardChain::new("set_plan_active")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .remote("plan_exists", self.plan_exists(plan_id))
            .run()
            .await?;

        self.binding
            .act(IStaking::setPlanActiveCall {
                planId: plan_id,
                active,
            })
            .await
    }

    pub async fn stake(&self, plan_id: U256, amount: U256) -> SdkResult<Dispatch> {
        let amount = format::uint128("amount", amount)?;
        let plan = OnceCell::new();

        GuardChain::new("stake")
            .check("amount_positive", || range::positive("amount", amount))
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("plan_exists", self.plan_exists(plan_id))
            .remote("plan_active", async {
                let plan = self.cached_plan(&plan, plan_id).await?;
                state::require(plan.active, || format!("plan {plan_id} is not active"))
            })
            .remote("min_stake", async {
                let plan = self.cached_plan(&plan, plan_id).await?;
                state::require(amount >= plan.min_stake, || {
                    format!("amount {amount} is below plan minimum {}", plan.min_stake)
                })
            })
            .run()
            .await?;

        self.binding
            .act(IStaking::stakeCall {
                planId: plan_id,
                amount,
            })
            .await
    }

    pub async fn withdraw(&self, stake_id: U256) -> SdkResult<Dispatch> {
        let stake = OnceCell::new();

        GuardChain::new("withdraw")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("stake_exists", self.stake_exists(stake_id))
            .remote("not_withdrawn", async {
                let stake = self.cached_stake(&stake, stake_id).await?;
                state::require(!stake.withdrawn, || format!("stake {stake_id} already withdrawn"))
            })
            .remote("caller_is_owner", async {
                let stake = self.cached_stake(&stake, stake_id).await?;
                state::caller_is(self.binding.connection().caller(), stake.owner, "owner")
            })
            .remote("unlocked", async {
                let stake = self.cached_stake(&stake, stake_id).await?;
                state::require(unix_now() >= u64::from(stake.unlock_time), || {
                    format!("stake {stake_id} is locked until {}", stake.unlock_time)
                })
            })
            .run()
            .await?;

        self.binding
            .act(IStaking::withdrawCall { stakeId: stake_id })
            .await
    }

    pub async fn claim_rewards(&self, stake_id: U256) -> SdkResult<Dispatch> {
        let stake = OnceCell::new();

        GuardChain::new("claim_rewards")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("stake_exists", self.stake_exists(stake_id))
            .remote("not_withdrawn", async {
                let stake = self.cached_stake(&stake, stake_id).await?;
                state::require(!stake.withdrawn, || format!("stake {stake_id} already withdrawn"))
            })
            .remote("caller_is_owner", async {
                let stake = self.cached_stake(&stake, stake_id).await?;
                state::caller_is(self.binding.connection().caller(), stake.owner, "owner")
            })
            .remote("rewards_pending", async {
                let pending = self.pending_rewards(stake_id).await?;
                state::require(!pending.is_zero(), || {
                    format!("stake {stake_id} has no pending rewards")
                })
            })
            .run()
            .await?;

        self.binding
            .act(IStaking::claimRewardsCall { stakeId: stake_id })
            .await
    }

    async fn plan_exists(&self, plan_id: U256) -> SdkResult<()> {
        state::exists("plan", plan_id, self.plan_count().await?)
    }

    async fn stake_exists(&self, stake_id: U256) -> SdkResult<()> {
        state::exists("stake", stake_id, self.stake_count().await?)
    }

    async fn cached_plan<'c>(
        &self,
        cell: &'c OnceCell<PlanInfo>,
        plan_id: U256,
    ) -> SdkResult<&'c PlanInfo> {
        cell.get_or_try_init(|| self.get_plan(plan_id)).await
    }

    async fn cached_stake<'c>(
        &self,
        cell: &'c OnceCell<StakeInfo>,
        stake_id: U256,
    ) -> SdkResult<&'c StakeInfo> {
        cell.get_or_try_init(|| self.get_stake(stake_id)).await
    }
}
