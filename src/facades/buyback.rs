//! Buyback facade.
//!
//! An operator swaps treasury funds for the buyback token; proceeds are
//! split between recipients by a basis-point distribution that must always
//! sum to exactly 10,000.

use alloy::primitives::{Address, U256};
use alloy::sol;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::blockchain::binding::{ContractBinding, Dispatch};
use crate::blockchain::types::SdkResult;
use crate::config::constants::{Role, MAX_SWAP_DEADLINE_SECS};
use crate::facades::Facade;
use crate::guards::{constraint, format, range, state, unix_now, GuardChain};

sol! {
    /// Token buyback and distribution.
    interface IBuyback {
        function buybackToken() external view returns (address);
        function getDistribution() external view returns (address[] memory recipients, uint16[] memory bps);
        function totalBoughtBack() external view returns (uint256);
        function claimable(address account) external view returns (uint256);

        function setDistribution(address[] recipients, uint16[] bps) external;
        function executeBuyback(uint128 amountIn, uint128 minAmountOut, uint32 deadline) external;
        function claim() external;
    }
}

/// One recipient's share of buyback proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
    pub recipient: Address,
    pub bps: u16,
}

/// Client for the buyback contract.
#[derive(Debug)]
pub struct Buyback {
    binding: ContractBinding,
    buyback_token: OnceCell<Address>,
}

impl Facade for Buyback {
    const NAME: &'static str = "buyback";
    type Interface = IBuyback::IBuybackCalls;

    fn from_binding(binding: ContractBinding) -> Self {
        Self {
            binding,
            buyback_token: OnceCell::new(),
        }
    }

    fn binding(&self) -> &ContractBinding {
        &self.binding
    }
}

impl Buyback {
    pub async fn is_paused(&self) -> SdkResult<bool> {
        state::is_paused(&self.binding).await
    }

    pub async fn has_role(&self, role: Role, account: Address) -> SdkResult<bool> {
        state::has_role(&self.binding, role, account).await
    }

    /// Token bought back. Resolved once per facade.
    pub async fn buyback_token(&self) -> SdkResult<Address> {
        self.buyback_token
            .get_or_try_init(|| self.binding.query(IBuyback::buybackTokenCall {}))
            .await
            .copied()
    }

    pub async fn distribution(&self) -> SdkResult<Vec<Share>> {
        let dist = self.binding.query(IBuyback::getDistributionCall {}).await?;
        Ok(dist
            .recipients
            .into_iter()
            .zip(dist.bps)
            .map(|(recipient, bps)| Share { recipient, bps })
            .collect())
    }

    pub async fn total_bought_back(&self) -> SdkResult<U256> {
        self.binding.query(IBuyback::totalBoughtBackCall {}).await
    }

    pub async fn claimable(&self, account: &str) -> SdkResult<U256> {
        let account = format::address("account", account)?;
        self.claimable_of(account).await
    }

    pub async fn set_distribution<S: AsRef<str>>(
        &self,
        recipients: &[S],
        bps: &[u16],
    ) -> SdkResult<Dispatch> {
        let recipients = format::addresses("recipients", recipients)?;

        GuardChain::new("set_distribution")
            .check("recipients_present", || range::positive("recipients.len", recipients.len()))
            .check("lengths_match", || {
                constraint::equal_lengths("recipients", recipients.len(), "bps", bps.len())
            })
            .check("recipients_non_zero", || {
                recipients
                    .iter()
                    .try_for_each(|r| range::non_zero_address("recipient", *r))
            })
            .check("bps_sum", || constraint::bps_sum("bps", bps))
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("admin_role", state::role(&self.binding, Role::Admin))
            .run()
            .await?;

        self.binding
            .act(IBuyback::setDistributionCall {
                recipients,
                bps: bps.to_vec(),
            })
            .await
    }

    /// Swap `amount_in` for the buyback token, reverting below `min_amount_out`.
    pub async fn execute_buyback(
        &self,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> SdkResult<Dispatch> {
        let amount_in = format::uint128("amountIn", amount_in)?;
        let min_amount_out = format::uint128("minAmountOut", min_amount_out)?;
        let deadline_ts = format::timestamp("deadline", deadline)?;
        let now = unix_now();

        GuardChain::new("execute_buyback")
            .check("amount_in_positive", || range::positive("amountIn", amount_in))
            .check("deadline_window", || {
                constraint::deadline_window("deadline", deadline, now, MAX_SWAP_DEADLINE_SECS)
            })
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("operator_role", state::role(&self.binding, Role::Operator))
            .run()
            .await?;

        self.binding
            .act(IBuyback::executeBuybackCall {
                amountIn: amount_in,
                minAmountOut: min_amount_out,
                deadline: deadline_ts,
            })
            .await
    }

    /// Claim the caller's accumulated share.
    pub async fn claim(&self) -> SdkResult<Dispatch> {
        let caller = self.binding.connection().caller();

        GuardChain::new("claim")
            .check("caller_known", || state::caller_required(caller).map(|_| ()))
            .remote("not_paused", state::not_paused(&self.binding))
            .remote("has_claimable", async {
                let account = state::caller_required(caller)?;
                let amount = self.claimable_of(account).await?;
                state::require(!amount.is_zero(), || format!("{account} has nothing to claim"))
            })
            .run()
            .await?;

        self.binding.act(IBuyback::claimCall {}).await
    }

    async fn claimable_of(&self, account: Address) -> SdkResult<U256> {
        self.binding
            .query(IBuyback::claimableCall { account })
            .await
    }
}
