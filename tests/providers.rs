//! Provider wrappers: construction, transport ownership, dual-mode dispatch.

mod common;

use alloy::json_abi::JsonAbi;
use alloy::primitives::U256;
use common::*;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contract_sdk::blockchain::{ConfirmationStatus, SdkError};
use contract_sdk::config::{NetworkConfig, Role};
use contract_sdk::facades::{Buyback, Facade, LendingPool};
use contract_sdk::{AssistedProvider, ErrorKind, SelfProvider};

fn lending_fixture() -> (Arc<MockLedger>, Arc<MockConnector>) {
    let ledger = MockLedger::new();
    let mut state = LendingState::new(Access::granting(Role::Admin, SIGNER));
    state.pools = (0..3).map(|i| pool(i, 1, 100, 200, 150)).collect();
    mount_lending_pool(&ledger, Arc::new(Mutex::new(state)));
    let connector = MockConnector::new(ledger.clone());
    (ledger, connector)
}

#[tokio::test]
async fn test_assisted_and_self_queries_agree() {
    let (_ledger, connector) = lending_fixture();
    let address = hex_address(LENDING_POOL);

    let read: LendingPool = assisted(&connector).connect(&address).unwrap();
    let write: LendingPool = signing(&connector).connect(&address).unwrap();

    assert_eq!(read.pool_count().await.unwrap(), write.pool_count().await.unwrap());
    assert_eq!(
        read.get_pool(U256::from(2)).await.unwrap(),
        write.get_pool(U256::from(2)).await.unwrap()
    );
    assert_eq!(
        read.get_pools(0, 10).await.unwrap(),
        write.get_pools(0, 10).await.unwrap()
    );
}

#[tokio::test]
async fn test_each_facade_gets_its_own_transport() {
    let (_ledger, connector) = lending_fixture();
    let address = hex_address(LENDING_POOL);

    let _a: LendingPool = assisted(&connector).connect(&address).unwrap();
    let _b: LendingPool = assisted(&connector).connect(&address).unwrap();
    let c: LendingPool = signing(&connector).connect(&address).unwrap();

    assert_eq!(connector.connects(), 3);
    assert_eq!(connector.signing_connects(), 1);
    assert_eq!(c.address(), LENDING_POOL);
    assert_eq!(c.binding().connection().signer(), Some(SIGNER));
}

#[tokio::test]
async fn test_submitted_transaction_confirms() {
    let (ledger, connector) = lending_fixture();
    let pools: LendingPool = signing(&connector)
        .connect(&hex_address(LENDING_POOL))
        .unwrap();

    let dispatch = pools.close_pool(U256::ZERO).await.unwrap();
    let tx = dispatch.submitted().unwrap();

    ledger.set_block(MINED_AT + 2);
    let status = tx
        .wait_for_confirmation(2, Duration::from_millis(5), 5)
        .await
        .unwrap();
    assert_eq!(status, ConfirmationStatus::Confirmed { block_number: MINED_AT });

    let network = NetworkConfig {
        confirmation_blocks: 1,
        poll_interval_ms: 5,
        confirmation_timeout_secs: 5,
        ..NetworkConfig::default()
    };
    assert!(matches!(
        tx.wait_configured(&network).await.unwrap(),
        ConfirmationStatus::Confirmed { .. }
    ));
}

#[tokio::test]
async fn test_confirmation_times_out_below_depth() {
    let (ledger, connector) = lending_fixture();
    let pools: LendingPool = signing(&connector)
        .connect(&hex_address(LENDING_POOL))
        .unwrap();

    let dispatch = pools.close_pool(U256::ZERO).await.unwrap();
    ledger.set_block(MINED_AT);

    let err = dispatch
        .submitted()
        .unwrap()
        .wait_for_confirmation(3, Duration::from_millis(5), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::ConfirmationTimeout(3)));
}

#[tokio::test]
async fn test_zero_poll_interval_still_confirms() {
    let (ledger, connector) = lending_fixture();
    let pools: LendingPool = signing(&connector)
        .connect(&hex_address(LENDING_POOL))
        .unwrap();

    let dispatch = pools.close_pool(U256::ZERO).await.unwrap();
    ledger.set_block(MINED_AT + 1);

    let status = dispatch
        .submitted()
        .unwrap()
        .wait_for_confirmation(1, Duration::ZERO, 1)
        .await
        .unwrap();
    assert_eq!(status, ConfirmationStatus::Confirmed { block_number: MINED_AT });
}

#[tokio::test]
async fn test_deep_confirmation_count_saturates() {
    let (ledger, connector) = lending_fixture();
    let pools: LendingPool = signing(&connector)
        .connect(&hex_address(LENDING_POOL))
        .unwrap();

    let dispatch = pools.close_pool(U256::ZERO).await.unwrap();
    ledger.set_block(MINED_AT + u64::from(u32::MAX) + 5);

    let status = dispatch
        .submitted()
        .unwrap()
        .wait_for_confirmation(u32::MAX, Duration::from_millis(5), 1)
        .await
        .unwrap();
    assert_eq!(status, ConfirmationStatus::Confirmed { block_number: MINED_AT });
}

#[test]
fn test_confirmation_timeout_message_names_depth() {
    let err = SdkError::ConfirmationTimeout(3);
    assert_eq!(
        err.to_string(),
        "Transaction not confirmed to depth 3 within the timeout"
    );
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn test_chain_id_verification() {
    let (_ledger, connector) = lending_fixture();
    let pools: LendingPool = assisted(&connector)
        .connect(&hex_address(LENDING_POOL))
        .unwrap();

    let connection = pools.binding().connection();
    assert!(connection.verify_chain_id(CHAIN_ID).await.is_ok());
    let err = connection.verify_chain_id(1).await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::ChainMismatch { expected: 1, actual: CHAIN_ID }
    ));
}

#[test]
fn test_interface_override_must_cover_facade() {
    let (_ledger, connector) = lending_fixture();

    let partial = JsonAbi::parse(["function poolCount() external view returns (uint256)"]).unwrap();
    let err = assisted(&connector)
        .with_interface(partial)
        .connect::<LendingPool>(&hex_address(LENDING_POOL))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("missing selectors"));
    assert_eq!(connector.connects(), 0);

    let complete = JsonAbi::parse([
        "function buybackToken() external view returns (address)",
        "function getDistribution() external view returns (address[] recipients, uint16[] bps)",
        "function totalBoughtBack() external view returns (uint256)",
        "function claimable(address account) external view returns (uint256)",
        "function setDistribution(address[] recipients, uint16[] bps) external",
        "function executeBuyback(uint128 amountIn, uint128 minAmountOut, uint32 deadline) external",
        "function claim() external",
        "function paused() external view returns (bool)",
        "function hasRole(bytes32 role, address account) external view returns (bool)",
    ])
    .unwrap();
    let buyback = assisted(&connector)
        .with_interface(complete)
        .connect::<Buyback>(&hex_address(BUYBACK));
    assert!(buyback.is_ok());
}

#[test]
fn test_construction_errors() {
    let err = AssistedProvider::new("ftp://localhost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let err = SelfProvider::new("http://localhost:8545", "0xnot-a-key").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Credential);

    let provider = SelfProvider::new("http://localhost:8545", TEST_PRIVATE_KEY).unwrap();
    assert_eq!(provider.wallet().address(), SIGNER);
}
