//! Connection handle: one RPC transport plus the identity acting through it.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;

use crate::blockchain::client::LedgerRpc;
use crate::blockchain::types::{ChainId, ReceiptStatus, SdkError, SdkResult};

/// Read or signing channel to the ledger.
///
/// The signer is present only when the transport was built with a credential.
/// The caller is the identity state guards check against: the signer when
/// present, otherwise an address declared by an assisted caller.
#[derive(Clone)]
pub struct Connection {
    rpc: Arc<dyn LedgerRpc>,
    signer: Option<Address>,
    caller: Option<Address>,
}

impl Connection {
    /// Read-only connection.
    pub fn read_only(rpc: Arc<dyn LedgerRpc>) -> Self {
        Self {
            rpc,
            signer: None,
            caller: None,
        }
    }

    /// Signing connection; `signer` must be the address of the transport's key.
    pub fn signing(rpc: Arc<dyn LedgerRpc>, signer: Address) -> Self {
        Self {
            rpc,
            signer: Some(signer),
            caller: Some(signer),
        }
    }

    /// Declare the identity that will sign unsigned payloads out-of-band.
    ///
    /// Ignored when a signer is present.
    pub fn with_caller(mut self, caller: Address) -> Self {
        if self.signer.is_none() {
            self.caller = Some(caller);
        }
        self
    }

    /// Address of the signing credential, if any.
    pub fn signer(&self) -> Option<Address> {
        self.signer
    }

    /// Identity actions are performed as, if known.
    pub fn caller(&self) -> Option<Address> {
        self.caller
    }

    /// Whether actions are signed and broadcast by this connection.
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }

    /// Perform a read query.
    pub async fn call(&self, tx: TransactionRequest) -> SdkResult<Bytes> {
        self.rpc.call(tx).await
    }

    /// Sign and broadcast a transaction.
    pub async fn send(&self, tx: TransactionRequest) -> SdkResult<TxHash> {
        if self.signer.is_none() {
            return Err(SdkError::Wallet(
                "connection holds no signing credential".to_string(),
            ));
        }
        self.rpc.send_transaction(tx).await
    }

    /// Receipt of a submitted transaction, if mined.
    pub async fn receipt(&self, hash: TxHash) -> SdkResult<Option<ReceiptStatus>> {
        self.rpc.transaction_receipt(hash).await
    }

    /// Latest block number.
    pub async fn block_number(&self) -> SdkResult<u64> {
        self.rpc.block_number().await
    }

    /// Get the chain ID from the RPC.
    pub async fn chain_id(&self) -> SdkResult<ChainId> {
        self.rpc.chain_id().await.map(ChainId)
    }

    /// Verify the connected chain ID matches the expected one.
    pub async fn verify_chain_id(&self, expected: u64) -> SdkResult<()> {
        let chain_id = self.chain_id().await?;
        if chain_id.0 != expected {
            return Err(SdkError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("signer", &self.signer)
            .field("caller", &self.caller)
            .finish_non_exhaustive()
    }
}
