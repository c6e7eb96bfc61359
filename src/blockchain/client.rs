//! JSON-RPC client seam.
//!
//! # Responsibilities
//! - Define the minimal RPC surface the SDK needs (`LedgerRpc`)
//! - Implement it over an alloy HTTP provider, with or without a wallet
//! - Bound every request by the configured timeout
//!
//! # Design Decisions
//! - Single attempt per request: no retry, no failover, no backoff
//! - Errors from the node are surfaced verbatim as `SdkError::Rpc`

use alloy::primitives::{Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::blockchain::types::{ReceiptStatus, SdkError, SdkResult};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// The network operations a connection performs against the ledger.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Execute a read-only call and return the raw return data.
    async fn call(&self, tx: TransactionRequest) -> SdkResult<Bytes>;

    /// Sign (if the transport holds a credential) and broadcast a transaction.
    async fn send_transaction(&self, tx: TransactionRequest) -> SdkResult<TxHash>;

    /// Fetch the receipt of a transaction, if mined.
    async fn transaction_receipt(&self, hash: TxHash) -> SdkResult<Option<ReceiptStatus>>;

    /// Latest block number.
    async fn block_number(&self) -> SdkResult<u64>;

    /// Chain id reported by the node.
    async fn chain_id(&self) -> SdkResult<u64>;
}

/// alloy-backed HTTP transport.
pub struct HttpRpc {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: Url,
    timeout_secs: u64,
}

impl HttpRpc {
    /// Build a transport for `endpoint`.
    ///
    /// With a wallet the provider signs transactions locally and fills nonce,
    /// gas and chain id before broadcasting.
    pub fn connect(endpoint: &Url, timeout_secs: u64, wallet: Option<&Wallet>) -> Self {
        let provider = match wallet {
            Some(wallet) => Arc::new(
                ProviderBuilder::new()
                    .wallet(wallet.ethereum_wallet())
                    .connect_http(endpoint.clone()),
            ) as Arc<dyn Provider + Send + Sync>,
            None => Arc::new(ProviderBuilder::new().connect_http(endpoint.clone()))
                as Arc<dyn Provider + Send + Sync>,
        };

        tracing::debug!(
            rpc_url = %endpoint,
            signing = wallet.is_some(),
            "RPC transport created"
        );

        Self {
            provider,
            endpoint: endpoint.clone(),
            timeout_secs,
        }
    }

    async fn bounded<T, E, F>(&self, method: &'static str, fut: F) -> SdkResult<T>
    where
        E: std::fmt::Display,
        F: Future<Output = Result<T, E>>,
    {
        match timeout(Duration::from_secs(self.timeout_secs), fut).await {
            Ok(Ok(result)) => {
                metrics::record_rpc_call(method, "ok");
                Ok(result)
            }
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "RPC error");
                metrics::record_rpc_call(method, "error");
                Err(SdkError::rpc(e))
            }
            Err(_) => {
                tracing::warn!(method, timeout_secs = self.timeout_secs, "RPC timeout");
                metrics::record_rpc_call(method, "timeout");
                Err(SdkError::Timeout(self.timeout_secs))
            }
        }
    }
}

#[async_trait]
impl LedgerRpc for HttpRpc {
    async fn call(&self, tx: TransactionRequest) -> SdkResult<Bytes> {
        self.bounded("eth_call", async { self.provider.call(tx).await })
            .await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> SdkResult<TxHash> {
        self.bounded("eth_sendTransaction", async {
            self.provider
                .send_transaction(tx)
                .await
                .map(|pending| *pending.tx_hash())
        })
        .await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> SdkResult<Option<ReceiptStatus>> {
        let receipt = self
            .bounded("eth_getTransactionReceipt", async {
                self.provider.get_transaction_receipt(hash).await
            })
            .await?;

        Ok(receipt.map(|r| ReceiptStatus {
            block_number: r.block_number,
            success: r.status(),
        }))
    }

    async fn block_number(&self) -> SdkResult<u64> {
        self.bounded("eth_blockNumber", async { self.provider.get_block_number().await })
            .await
    }

    async fn chain_id(&self) -> SdkResult<u64> {
        self.bounded("eth_chainId", async { self.provider.get_chain_id().await })
            .await
    }
}

impl std::fmt::Debug for HttpRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRpc")
            .field("rpc_url", &self.endpoint.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
