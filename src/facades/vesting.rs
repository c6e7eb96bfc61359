//! Vesting schedules facade.

use alloy::primitives::{Address, U256};
use alloy::sol;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::blockchain::binding::{ContractBinding, Dispatch};
use crate::blockchain::types::SdkResult;
use crate::config::constants::{Role, MAX_VESTING_START_DELAY_SECS};
use crate::facades::Facade;
use crate::guards::{constraint, format, range, state, unix_now, GuardChain};
use crate::pagination::{count_to_u64, paginate, Page};

sol! {
    /// Linear vesting with a cliff.
    interface IVesting {
        struct Schedule {
            uint256 id;
            address beneficiary;
            uint128 totalAmount;
            uint128 released;
            uint32 start;
            uint32 cliff;
            uint32 duration;
            bool revocable;
            bool revoked;
        }

        function vestingToken() external view returns (address);
        function scheduleCount() external view returns (uint256);
        function getSchedule(uint256 scheduleId) external view returns (Schedule memory);
        function releasable(uint256 scheduleId) external view returns (uint256);

        function createSchedule(
            address beneficiary,
            uint128 amount,
            uint32 start,
            uint32 cliff,
            uint32 duration,
            bool revocable
        ) external;
        function release(uint256 scheduleId) external;
        function revoke(uint256 scheduleId) external;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleInfo {
    pub id: U256,
    pub beneficiary: Address,
    pub total_amount: u128,
    pub released: u128,
    pub start: u32,
    /// Seconds after `start` before anything vests.
    pub cliff: u32,
    pub duration: u32,
    pub revocable: bool,
    pub revoked: bool,
}

impl From<IVesting::Schedule> for ScheduleInfo {
    fn from(schedule: IVesting::Schedule) -> Self {
        Self {
            id: schedule.id,
            beneficiary: schedule.beneficiary,
            total_amount: schedule.totalAmount,
            released: schedule.released,
            start: schedule.start,
            cliff: schedule.cliff,
            duration: schedule.duration,
            revocable: schedule.revocable,
            revoked: schedule.revoked,
        }
    }
}

/// Arguments of `create_schedule`, before width checks.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleParams {
    pub beneficiary: String,
    pub amount: U256,
    pub start: u64,
    pub cliff: u64,
    pub duration: u64,
    pub revocable: bool,
}

/// Client for the vesting contract.
#[derive(Debug)]
pub struct Vesting {
    binding: ContractBinding,
    vesting_token: OnceCell<Address>,
}

impl Facade for Vesting {
    const NAME: &'static str = "vesting";
    type Interface = IVesting::IVestingCalls;

    fn from_binding(binding: ContractBinding) -> Self {
        Self {
            binding,
            vesting_token: OnceCell::new(),
        }
    }

    fn binding(&self) -> &ContractBinding {
        &self.binding
    }
}

impl Vesting {
    pub async fn is_paused(&self) -> SdkResult<bool> {
        state::is_paused(&self.binding).await
    }

    pub async fn has_role(&self, role: Role, account: Address) -> SdkResult<bool> {
        state::has_role(&self.binding, role, account).await
    }

    pub async fn vesting_token(&self) -> SdkResult<Address> {
        self.vesting_token
            .get_or_try_init(|| self.binding.query(IVesting::vestingTokenCall {}))
            .await
            .copied()
    }

    pub async fn schedule_count(&self) -> SdkResult<U256> {
        self.binding.query(IVesting::scheduleCountCall {}).await
    }

    pub async fn get_schedule(&self, schedule_id: U256) -> SdkResult<ScheduleInfo> {
        self.binding
            .query(IVesting::getScheduleCall {
                scheduleId: schedule_id,
            })
            .await
            .map(ScheduleInfo::from)
    }

    pub async fn get_schedules(&self, offset: u64, limit: u64) -> SdkResult<Page<ScheduleInfo>> {
        paginate(
            offset,
            limit,
            async { count_to_u64(self.schedule_count().await?) },
            |i| self.get_schedule(U256::from(i)),
        )
        .await
    }

    /// Vested but not yet released, as computed by the contract.
    pub async fn releasable(&self, schedule_id: U256) -> SdkResult<U256> {
        self.binding
            .query(IVesting::releasableCall {
                scheduleId: schedule_id,
            })
            .await
    }

    pub async fn create_schedule(&self, params: CreateScheduleParams) -> SdkResult<Dispatch> {
        let beneficiary = format::address("beneficiary", &params.beneficiary)?;
        let amount = format::uint128("amount", params.amount)?;
        let start = format::timestamp("start", params.start)?;
        let cliff = format::uint32("cliff", params.cliff)?;
        let duration = format::uint32("duration", params.duration)?;
        let now = unix_now();

        GuardChain::new("create_schedule")
            .check("beneficiary_non_zero", || {
                range::non_zero_address("beneficiary", beneficiary)
            })
            .check("amount_positive", || range::positive("amount", amount))
            .check("duration_positive", || range::positive("duration", duration))
            .check("cliff_within_duration", || {
                constraint::not_after("cliff", params.cliff, "duration", params.duration)
            })
            .check("start_window", || {
                constraint::start_window("start", params.start, now, MAX_VESTING_START_DELAY_SECS)
            })
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .run()
            .await?;

        self.binding
            .act(IVesting::createScheduleCall {
                beneficiary,
                amount,
                start,
                cliff,
                duration,
                revocable: params.revocable,
            })
            .await
    }

    pub async fn release(&self, schedule_id: U256) -> SdkResult<Dispatch> {
        GuardChain::new("release")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("schedule_exists", self.schedule_exists(schedule_id))
            .remote("not_revoked", async {
                let schedule = self.get_schedule(schedule_id).await?;
                state::require(!schedule.revoked, || {
                    format!("schedule {schedule_id} is revoked")
                })
            })
            .remote("releasable", async {
                let amount = self.releasable(schedule_id).await?;
                state::require(!amount.is_zero(), || {
                    format!("schedule {schedule_id} has nothing to release")
                })
            })
            .run()
            .await?;

        self.binding
            .act(IVesting::releaseCall {
                scheduleId: schedule_id,
            })
            .await
    }

    pub async fn revoke(&self, schedule_id: U256) -> SdkResult<Dispatch> {
        let schedule = OnceCell::new();

        GuardChain::new("revoke")
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .remote("schedule_exists", self.schedule_exists(schedule_id))
            .remote("revocable", async {
                let schedule = self.cached_schedule(&schedule, schedule_id).await?;
                state::require(schedule.revocable, || {
                    format!("schedule {schedule_id} is not revocable")
                })
            })
            .remote("not_revoked", async {
                let schedule = self.cached_schedule(&schedule, schedule_id).await?;
                state::require(!schedule.revoked, || {
                    format!("schedule {schedule_id} is already revoked")
                })
            })
            .run()
            .await?;

        self.binding
            .act(IVesting::revokeCall {
                scheduleId: schedule_id,
            })
            .await
    }

    async fn schedule_exists(&self, schedule_id: U256) -> SdkResult<()> {
        state::exists("schedule", schedule_id, self.schedule_count().await?)
    }

    async fn cached_schedule<'c>(
        &self,
        cell: &'c OnceCell<ScheduleInfo>,
        schedule_id: U256,
    ) -> SdkResult<&'c ScheduleInfo> {
        cell.get_or_try_init(|| self.get_schedule(schedule_id)).await
    }
}
