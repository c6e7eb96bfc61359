//! Contract binding: an address and its interface over one connection.
//!
//! # Responsibilities
//! - Encode typed calls against the compile-time ABI and decode results
//! - Populate pending actions for state-changing methods
//! - Dispatch: sign-and-broadcast when a credential is present, otherwise
//!   hand the unsigned payload back to the caller
//! - Check a runtime ABI override against the methods a facade calls

use alloy::json_abi::JsonAbi;
use alloy::network::TransactionBuilder;
use alloy::primitives::{hex, Address, Bytes};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolInterface};
use std::collections::HashSet;

use crate::blockchain::connection::Connection;
use crate::blockchain::transaction::SubmittedTx;
use crate::blockchain::types::{SdkError, SdkResult};
use crate::observability::metrics;

/// An encoded state-changing call that has not been signed.
#[derive(Debug, Clone)]
pub struct PendingAction {
    /// Solidity signature of the target method.
    pub method: &'static str,
    /// ABI-encoded call data.
    pub calldata: Bytes,
    /// Populated transaction (`to`, `input`, and `from` when known).
    pub tx: TransactionRequest,
}

/// Outcome of dispatching a pending action.
#[derive(Debug)]
pub enum Dispatch {
    /// Signed and broadcast by the SDK.
    Submitted(SubmittedTx),
    /// Returned for the caller to sign out-of-band.
    Unsigned(PendingAction),
}

impl Dispatch {
    /// The submitted transaction, if the action was broadcast.
    pub fn submitted(&self) -> Option<&SubmittedTx> {
        match self {
            Dispatch::Submitted(tx) => Some(tx),
            Dispatch::Unsigned(_) => None,
        }
    }

    /// The unsigned payload, if the action was handed back.
    pub fn unsigned(&self) -> Option<&PendingAction> {
        match self {
            Dispatch::Submitted(_) => None,
            Dispatch::Unsigned(action) => Some(action),
        }
    }
}

/// Typed call surface of one deployed contract.
#[derive(Debug)]
pub struct ContractBinding {
    address: Address,
    connection: Connection,
}

impl ContractBinding {
    /// Bind `address` to an exclusively owned connection.
    pub fn new(address: Address, connection: Connection) -> Self {
        Self {
            address,
            connection,
        }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Run a read-only method and decode its return value.
    pub async fn query<C: SolCall>(&self, call: C) -> SdkResult<C::Return> {
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(call.abi_encode());

        tracing::debug!(contract = %self.address, method = C::SIGNATURE, "Query");

        let data = self.connection.call(tx).await?;
        C::abi_decode_returns(&data).map_err(SdkError::abi)
    }

    /// Encode a state-changing method into a pending action.
    pub fn prepare<C: SolCall>(&self, call: C) -> PendingAction {
        let calldata = Bytes::from(call.abi_encode());
        let mut tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(calldata.clone());
        if let Some(from) = self.connection.caller() {
            tx = tx.with_from(from);
        }

        PendingAction {
            method: C::SIGNATURE,
            calldata,
            tx,
        }
    }

    /// Sign and broadcast the action, or return it unsigned.
    pub async fn dispatch(&self, action: PendingAction) -> SdkResult<Dispatch> {
        if !self.connection.can_sign() {
            tracing::info!(
                contract = %self.address,
                method = action.method,
                "No credential; returning unsigned transaction"
            );
            metrics::record_dispatch("unsigned");
            return Ok(Dispatch::Unsigned(action));
        }

        let method = action.method;
        let hash = self.connection.send(action.tx).await?;
        tracing::info!(
            contract = %self.address,
            method,
            tx_hash = %hash,
            "Transaction submitted"
        );
        metrics::record_dispatch("submitted");

        Ok(Dispatch::Submitted(SubmittedTx::new(
            hash,
            self.connection.clone(),
        )))
    }

    /// Prepare and dispatch in one step.
    pub async fn act<C: SolCall>(&self, call: C) -> SdkResult<Dispatch> {
        self.dispatch(self.prepare(call)).await
    }
}

/// Check that `abi` declares every function of `I` plus `extra` selectors.
pub fn verify_interface<I: SolInterface>(abi: &JsonAbi, extra: &[[u8; 4]]) -> SdkResult<()> {
    let declared: HashSet<[u8; 4]> = abi.functions().map(|f| f.selector().0).collect();

    let missing: Vec<String> = (0..I::COUNT)
        .filter_map(I::selector_at)
        .chain(extra.iter().copied())
        .filter(|selector| !declared.contains(selector))
        .map(|selector| format!("0x{}", hex::encode(selector)))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SdkError::Format(format!(
            "interface description for {} is missing selectors: {}",
            I::NAME,
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol;

    sol! {
        interface ICounter {
            function count() external view returns (uint256);
            function increment(uint256 by) external;
        }
    }

    #[test]
    fn test_verify_interface_accepts_complete_abi() {
        let abi = JsonAbi::parse([
            "function count() external view returns (uint256)",
            "function increment(uint256 by) external",
            "function extra() external",
        ])
        .unwrap();
        assert!(verify_interface::<ICounter::ICounterCalls>(&abi, &[]).is_ok());
    }

    #[test]
    fn test_verify_interface_reports_missing_selector() {
        let abi = JsonAbi::parse(["function count() external view returns (uint256)"]).unwrap();
        let err = verify_interface::<ICounter::ICounterCalls>(&abi, &[]).unwrap_err();
        let expected = format!("0x{}", hex::encode(ICounter::incrementCall::SELECTOR));
        assert!(err.to_string().contains(&expected));
        assert_eq!(err.kind(), crate::blockchain::ErrorKind::Format);
    }
}
