//! Shared fixtures for integration tests: an in-memory ledger that answers
//! calls per contract address and records everything it is asked.

#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolInterface};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use contract_sdk::blockchain::{LedgerRpc, ReceiptStatus, SdkError, SdkResult, Wallet};
use contract_sdk::config::Role;
use contract_sdk::facades::buyback::IBuyback;
use contract_sdk::facades::lending_pool::ILendingPool;
use contract_sdk::facades::staking::IStaking;
use contract_sdk::facades::vesting::IVesting;
use contract_sdk::guards::state::IAccessControlled;
use contract_sdk::provider::{AssistedProvider, RpcConnector, SelfProvider};

/// First Anvil development key.
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// Address of `TEST_PRIVATE_KEY`.
pub const SIGNER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const OTHER: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

pub const LENDING_POOL: Address = address!("00000000000000000000000000000000000000a1");
pub const STAKING: Address = address!("00000000000000000000000000000000000000a2");
pub const BUYBACK: Address = address!("00000000000000000000000000000000000000a3");
pub const VESTING: Address = address!("00000000000000000000000000000000000000a4");
pub const TOKEN: Address = address!("00000000000000000000000000000000000000b1");
pub const COLLATERAL: Address = address!("00000000000000000000000000000000000000c1");

pub const CHAIN_ID: u64 = 31337;
/// Block every mocked transaction is mined in.
pub const MINED_AT: u64 = 100;

pub type Handler = Box<dyn Fn(&[u8]) -> Result<Vec<u8>, String> + Send + Sync>;

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn hex_address(address: Address) -> String {
    format!("{address:#x}")
}

/// In-memory ledger.
pub struct MockLedger {
    handlers: Mutex<HashMap<Address, Handler>>,
    calls: Mutex<Vec<(Address, [u8; 4])>>,
    sent: Mutex<Vec<TransactionRequest>>,
    block: AtomicU64,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handlers: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            block: AtomicU64::new(MINED_AT + 1),
        })
    }

    /// Answer calls to `address` with `handler`.
    pub fn mount(&self, address: Address, handler: Handler) {
        self.handlers.lock().unwrap().insert(address, handler);
    }

    pub fn set_block(&self, block: u64) {
        self.block.store(block, Ordering::SeqCst);
    }

    /// Number of read calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn selectors(&self) -> Vec<[u8; 4]> {
        self.calls.lock().unwrap().iter().map(|(_, s)| *s).collect()
    }

    pub fn called(&self, selector: [u8; 4]) -> bool {
        self.selectors().contains(&selector)
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn hash_of(index: usize) -> TxHash {
        B256::with_last_byte(index as u8 + 1)
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn call(&self, tx: TransactionRequest) -> SdkResult<Bytes> {
        let to = tx
            .to
            .and_then(|kind| kind.to().copied())
            .ok_or_else(|| SdkError::Rpc("call without target".to_string()))?;
        let data = tx.input.input().cloned().unwrap_or_default();
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .unwrap_or_default();

        self.calls.lock().unwrap().push((to, selector));

        let handlers = self.handlers.lock().unwrap();
        let handler = handlers
            .get(&to)
            .ok_or_else(|| SdkError::Rpc(format!("no contract at {to}")))?;
        handler(&data).map(Bytes::from).map_err(SdkError::Reverted)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> SdkResult<TxHash> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(Self::hash_of(sent.len() - 1))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> SdkResult<Option<ReceiptStatus>> {
        let count = self.sent.lock().unwrap().len();
        let known = (0..count).any(|i| Self::hash_of(i) == hash);
        Ok(known.then_some(ReceiptStatus {
            block_number: Some(MINED_AT),
            success: true,
        }))
    }

    async fn block_number(&self) -> SdkResult<u64> {
        Ok(self.block.load(Ordering::SeqCst))
    }

    async fn chain_id(&self) -> SdkResult<u64> {
        Ok(CHAIN_ID)
    }
}

/// Hands out the shared mock ledger and counts transports built.
pub struct MockConnector {
    ledger: Arc<MockLedger>,
    connects: AtomicU32,
    signing_connects: AtomicU32,
}

impl MockConnector {
    pub fn new(ledger: Arc<MockLedger>) -> Arc<Self> {
        Arc::new(Self {
            ledger,
            connects: AtomicU32::new(0),
            signing_connects: AtomicU32::new(0),
        })
    }

    pub fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn signing_connects(&self) -> u32 {
        self.signing_connects.load(Ordering::SeqCst)
    }
}

impl RpcConnector for MockConnector {
    fn connect(&self, wallet: Option<&Wallet>) -> SdkResult<Arc<dyn LedgerRpc>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if wallet.is_some() {
            self.signing_connects.fetch_add(1, Ordering::SeqCst);
        }
        Ok(self.ledger.clone() as Arc<dyn LedgerRpc>)
    }
}

pub fn assisted(connector: &Arc<MockConnector>) -> AssistedProvider {
    AssistedProvider::with_connector(connector.clone())
}

pub fn signing(connector: &Arc<MockConnector>) -> SelfProvider {
    let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
    SelfProvider::with_connector(connector.clone(), wallet)
}

/// Calldata of the `index`-th broadcast transaction.
pub fn sent_input(ledger: &MockLedger, index: usize) -> Bytes {
    ledger.sent()[index].input.input().cloned().unwrap()
}

// ------------------
// | Access control |
// ------------------

/// Pause flag and role grants shared by every mocked contract.
#[derive(Debug, Clone, Default)]
pub struct Access {
    pub paused: bool,
    pub roles: Vec<(Role, Address)>,
}

impl Access {
    pub fn granting(role: Role, account: Address) -> Self {
        Self {
            paused: false,
            roles: vec![(role, account)],
        }
    }

    fn answer(&self, data: &[u8]) -> Option<Vec<u8>> {
        use IAccessControlled::IAccessControlledCalls as Calls;

        match Calls::abi_decode(data).ok()? {
            Calls::paused(_) => Some(IAccessControlled::pausedCall::abi_encode_returns(
                &self.paused,
            )),
            Calls::hasRole(call) => {
                let held = self
                    .roles
                    .iter()
                    .any(|(role, account)| role.id() == call.role && *account == call.account);
                Some(IAccessControlled::hasRoleCall::abi_encode_returns(&held))
            }
        }
    }
}

fn at<T>(items: &[T], id: U256) -> Result<&T, String> {
    usize::try_from(id)
        .ok()
        .and_then(|i| items.get(i))
        .ok_or_else(|| format!("index {id} out of bounds"))
}

// ----------------
// | Lending pool |
// ----------------

pub struct LendingState {
    pub access: Access,
    pub pools: Vec<ILendingPool::Pool>,
    pub loans: Vec<ILendingPool::Loan>,
    pub repayment: U256,
}

impl LendingState {
    pub fn new(access: Access) -> Self {
        Self {
            access,
            pools: Vec::new(),
            loans: Vec::new(),
            repayment: U256::ZERO,
        }
    }
}

pub fn pool(id: u64, status: u8, soft_cap: u128, hard_cap: u128, committed: u128) -> ILendingPool::Pool {
    ILendingPool::Pool {
        id: U256::from(id),
        creator: SIGNER,
        softCap: soft_cap,
        hardCap: hard_cap,
        totalCommitted: committed,
        deadline: (now() + 86_400) as u32,
        minimumAPR: 500,
        status,
        collateralTokens: vec![COLLATERAL],
    }
}

pub fn loan(id: u64, borrower: Address, due_time: u32) -> ILendingPool::Loan {
    ILendingPool::Loan {
        id: U256::from(id),
        poolId: U256::ZERO,
        borrower,
        collateralToken: COLLATERAL,
        principal: 1_000,
        collateralAmount: 2_000,
        startTime: due_time.saturating_sub(86_400),
        dueTime: due_time,
        repaid: false,
        liquidated: false,
    }
}

pub fn mount_lending_pool(ledger: &MockLedger, state: Arc<Mutex<LendingState>>) {
    ledger.mount(
        LENDING_POOL,
        Box::new(move |data| {
            use ILendingPool::ILendingPoolCalls as Calls;

            let state = state.lock().unwrap();
            if let Some(out) = state.access.answer(data) {
                return Ok(out);
            }

            Ok(match Calls::abi_decode(data).map_err(|e| e.to_string())? {
                Calls::lendingToken(_) => ILendingPool::lendingTokenCall::abi_encode_returns(&TOKEN),
                Calls::poolCount(_) => {
                    ILendingPool::poolCountCall::abi_encode_returns(&U256::from(state.pools.len()))
                }
                Calls::getPool(call) => {
                    ILendingPool::getPoolCall::abi_encode_returns(at(&state.pools, call.poolId)?)
                }
                Calls::loanCount(_) => {
                    ILendingPool::loanCountCall::abi_encode_returns(&U256::from(state.loans.len()))
                }
                Calls::getLoan(call) => {
                    ILendingPool::getLoanCall::abi_encode_returns(at(&state.loans, call.loanId)?)
                }
                Calls::getRepaymentAmount(_) => {
                    ILendingPool::getRepaymentAmountCall::abi_encode_returns(&state.repayment)
                }
                _ => return Err("not a view method".to_string()),
            })
        }),
    );
}

// -----------
// | Staking |
// -----------

pub struct StakingState {
    pub access: Access,
    pub plans: Vec<IStaking::Plan>,
    pub stakes: Vec<IStaking::StakePosition>,
    pub pending: U256,
}

pub fn plan(id: u64, min_stake: u128, active: bool) -> IStaking::Plan {
    IStaking::Plan {
        id: U256::from(id),
        minStake: min_stake,
        lockDuration: 3_600,
        aprBps: 1_200,
        active,
    }
}

pub fn stake(id: u64, owner: Address, unlock_time: u32, withdrawn: bool) -> IStaking::StakePosition {
    IStaking::StakePosition {
        id: U256::from(id),
        planId: U256::ZERO,
        owner,
        amount: 5_000,
        startTime: unlock_time.saturating_sub(3_600),
        unlockTime: unlock_time,
        withdrawn,
    }
}

pub fn mount_staking(ledger: &MockLedger, state: Arc<Mutex<StakingState>>) {
    ledger.mount(
        STAKING,
        Box::new(move |data| {
            use IStaking::IStakingCalls as Calls;

            let state = state.lock().unwrap();
            if let Some(out) = state.access.answer(data) {
                return Ok(out);
            }

            Ok(match Calls::abi_decode(data).map_err(|e| e.to_string())? {
                Calls::stakingToken(_) => IStaking::stakingTokenCall::abi_encode_returns(&TOKEN),
                Calls::planCount(_) => {
                    IStaking::planCountCall::abi_encode_returns(&U256::from(state.plans.len()))
                }
                Calls::getPlan(call) => {
                    IStaking::getPlanCall::abi_encode_returns(at(&state.plans, call.planId)?)
                }
                Calls::stakeCount(_) => {
                    IStaking::stakeCountCall::abi_encode_returns(&U256::from(state.stakes.len()))
                }
                Calls::getStake(call) => {
                    IStaking::getStakeCall::abi_encode_returns(at(&state.stakes, call.stakeId)?)
                }
                Calls::pendingRewards(_) => {
                    IStaking::pendingRewardsCall::abi_encode_returns(&state.pending)
                }
                _ => return Err("not a view method".to_string()),
            })
        }),
    );
}

// -----------
// | Buyback |
// -----------

pub struct BuybackState {
    pub access: Access,
    pub recipients: Vec<Address>,
    pub bps: Vec<u16>,
    pub claimable: U256,
}

pub fn mount_buyback(ledger: &MockLedger, state: Arc<Mutex<BuybackState>>) {
    ledger.mount(
        BUYBACK,
        Box::new(move |data| {
            use IBuyback::IBuybackCalls as Calls;

            let state = state.lock().unwrap();
            if let Some(out) = state.access.answer(data) {
                return Ok(out);
            }

            Ok(match Calls::abi_decode(data).map_err(|e| e.to_string())? {
                Calls::buybackToken(_) => IBuyback::buybackTokenCall::abi_encode_returns(&TOKEN),
                Calls::getDistribution(_) => {
                    IBuyback::getDistributionCall::abi_encode_returns(&IBuyback::getDistributionReturn {
                        recipients: state.recipients.clone(),
                        bps: state.bps.clone(),
                    })
                }
                Calls::totalBoughtBack(_) => {
                    IBuyback::totalBoughtBackCall::abi_encode_returns(&U256::from(42))
                }
                Calls::claimable(_) => IBuyback::claimableCall::abi_encode_returns(&state.claimable),
                _ => return Err("not a view method".to_string()),
            })
        }),
    );
}

// -----------
// | Vesting |
// -----------

pub struct VestingState {
    pub access: Access,
    pub schedules: Vec<IVesting::Schedule>,
    pub releasable: U256,
}

pub fn schedule(id: u64, revocable: bool, revoked: bool) -> IVesting::Schedule {
    IVesting::Schedule {
        id: U256::from(id),
        beneficiary: OTHER,
        totalAmount: 12_000,
        released: 0,
        start: now() as u32,
        cliff: 600,
        duration: 3_600,
        revocable,
        revoked,
    }
}

pub fn mount_vesting(ledger: &MockLedger, state: Arc<Mutex<VestingState>>) {
    ledger.mount(
        VESTING,
        Box::new(move |data| {
            use IVesting::IVestingCalls as Calls;

            let state = state.lock().unwrap();
            if let Some(out) = state.access.answer(data) {
                return Ok(out);
            }

            Ok(match Calls::abi_decode(data).map_err(|e| e.to_string())? {
                Calls::vestingToken(_) => IVesting::vestingTokenCall::abi_encode_returns(&TOKEN),
                Calls::scheduleCount(_) => {
                    IVesting::scheduleCountCall::abi_encode_returns(&U256::from(state.schedules.len()))
                }
                Calls::getSchedule(call) => {
                    IVesting::getScheduleCall::abi_encode_returns(at(&state.schedules, call.scheduleId)?)
                }
                Calls::releasable(_) => IVesting::releasableCall::abi_encode_returns(&state.releasable),
                _ => return Err("not a view method".to_string()),
            })
        }),
    );
}
