//! Entry points: build a facade bound to a deployed contract.
//!
//! # Data Flow
//! ```text
//! AssistedProvider (no credential) ─┐
//!                                   ├→ address format guard
//! SelfProvider (private key) ───────┘  → optional interface check
//!                                      → RpcConnector::connect (fresh transport)
//!                                      → Connection → ContractBinding → Facade
//! ```
//!
//! # Design Decisions
//! - Every facade gets its own transport; bindings never share a connection
//! - The two providers differ only in whether a wallet is threaded through
//! - A malformed address is rejected before any transport is built

pub mod assisted;
pub mod signing;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use std::sync::Arc;
use url::Url;

use crate::blockchain::binding::verify_interface;
use crate::blockchain::client::{HttpRpc, LedgerRpc};
use crate::blockchain::types::{SdkError, SdkResult};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::NetworkConfig;
use crate::facades::Facade;
use crate::guards::{format, state};

pub use assisted::AssistedProvider;
pub use signing::SelfProvider;

/// Builds a transport for one binding.
pub trait RpcConnector: Send + Sync {
    /// Open a new transport, signing with `wallet` when given.
    fn connect(&self, wallet: Option<&Wallet>) -> SdkResult<Arc<dyn LedgerRpc>>;
}

/// HTTP JSON-RPC connector.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    endpoint: Url,
    timeout_secs: u64,
}

impl HttpConnector {
    /// Connector for `endpoint` with the default request timeout.
    pub fn new(endpoint: &str) -> SdkResult<Self> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            timeout_secs: NetworkConfig::default().rpc_timeout_secs,
        })
    }

    /// Connector for the configured network.
    pub fn from_config(network: &NetworkConfig) -> SdkResult<Self> {
        Ok(Self::new(&network.rpc_url)?.with_timeout(network.rpc_timeout_secs))
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl RpcConnector for HttpConnector {
    fn connect(&self, wallet: Option<&Wallet>) -> SdkResult<Arc<dyn LedgerRpc>> {
        Ok(Arc::new(HttpRpc::connect(
            &self.endpoint,
            self.timeout_secs,
            wallet,
        )))
    }
}

fn parse_endpoint(endpoint: &str) -> SdkResult<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| SdkError::Format(format!("invalid endpoint '{endpoint}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SdkError::Format(format!(
            "unsupported endpoint scheme '{other}'"
        ))),
    }
}

/// Validate a contract address and, when given, the interface override.
fn resolve<F: Facade>(address: &str, interface: Option<&JsonAbi>) -> SdkResult<Address> {
    let address = format::address("address", address)?;
    if let Some(abi) = interface {
        verify_interface::<F::Interface>(abi, &state::SHARED_SELECTORS)?;
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::ErrorKind;

    #[test]
    fn test_endpoint_parsing() {
        assert!(HttpConnector::new("http://localhost:8545").is_ok());
        assert!(HttpConnector::new("https://rpc.example.org").is_ok());

        let err = HttpConnector::new("not a url").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = HttpConnector::new("ws://localhost:8546").unwrap_err();
        assert!(err.to_string().contains("unsupported endpoint scheme"));
    }

    #[test]
    fn test_from_config_uses_timeout() {
        let network = NetworkConfig {
            rpc_timeout_secs: 3,
            ..NetworkConfig::default()
        };
        let connector = HttpConnector::from_config(&network).unwrap();
        assert_eq!(connector.timeout_secs, 3);
        assert_eq!(connector.endpoint().as_str(), "http://localhost:8545/");
    }
}
