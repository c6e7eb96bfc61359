//! Submitted transaction handle and confirmation monitoring.

use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::connection::Connection;
use crate::blockchain::types::{ConfirmationStatus, SdkError, SdkResult};
use crate::config::schema::NetworkConfig;

/// Shortest delay between receipt polls.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A broadcast transaction that can be polled for confirmation.
#[derive(Debug, Clone)]
pub struct SubmittedTx {
    hash: TxHash,
    connection: Connection,
}

impl SubmittedTx {
    pub(crate) fn new(hash: TxHash, connection: Connection) -> Self {
        Self { hash, connection }
    }

    /// Transaction hash.
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Wait for the transaction to reach `required_confirmations`.
    ///
    /// # Arguments
    /// * `required_confirmations` - Block depth required on top of inclusion
    /// * `poll_interval` - Delay between receipt polls, at least 1 ms
    /// * `timeout_secs` - Maximum time to wait for confirmation
    pub async fn wait_for_confirmation(
        &self,
        required_confirmations: u32,
        poll_interval: Duration,
        timeout_secs: u64,
    ) -> SdkResult<ConfirmationStatus> {
        let timeout_duration = Duration::from_secs(timeout_secs);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval.max(MIN_POLL_INTERVAL));

            loop {
                ticker.tick().await;

                let receipt = match self.connection.receipt(self.hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %self.hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.success {
                    return Ok(ConfirmationStatus::Failed(
                        "Transaction reverted".to_string(),
                    ));
                }

                let current_block = self.connection.block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                let confirmations =
                    u32::try_from(current_block.saturating_sub(tx_block)).unwrap_or(u32::MAX);

                if confirmations >= required_confirmations {
                    return Ok(ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %self.hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(SdkError::ConfirmationTimeout(required_confirmations)),
        }
    }

    /// Wait using the depth, poll interval and timeout of `network`.
    pub async fn wait_configured(&self, network: &NetworkConfig) -> SdkResult<ConfirmationStatus> {
        self.wait_for_confirmation(
            network.confirmation_blocks,
            Duration::from_millis(network.poll_interval_ms),
            network.confirmation_timeout_secs,
        )
        .await
    }
}
