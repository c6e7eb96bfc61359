//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! The signing credential is deliberately absent: it is read from the
//! environment only.

use serde::{Deserialize, Serialize};

/// Root configuration for the SDK and its CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SdkConfig {
    /// Ledger endpoint settings.
    pub network: NetworkConfig,

    /// Deployed contract addresses.
    pub contracts: ContractsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for a submitted transaction, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
        }
    }
}

/// Addresses of the deployed contracts. Unset entries are simply unavailable.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractsConfig {
    pub lending_pool: Option<String>,
    pub staking: Option<String>,
    pub buyback: Option<String>,
    pub vesting: Option<String>,
}

impl ContractsConfig {
    /// Configured entries as `(name, address)` pairs.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("lending_pool", &self.lending_pool),
            ("staking", &self.staking),
            ("buyback", &self.buyback),
            ("vesting", &self.vesting),
        ]
        .into_iter()
        .filter_map(|(name, addr)| addr.as_deref().map(|a| (name, a)))
        .collect()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "contract_sdk=info".to_string(),
        }
    }
}
