//! Credentialed provider. Actions are signed and broadcast.

use alloy::json_abi::JsonAbi;
use std::sync::Arc;

use crate::blockchain::binding::ContractBinding;
use crate::blockchain::connection::Connection;
use crate::blockchain::types::SdkResult;
use crate::blockchain::wallet::Wallet;
use crate::facades::Facade;
use crate::provider::{resolve, HttpConnector, RpcConnector};

/// Builds facades that act as the wallet's address.
#[derive(Clone)]
pub struct SelfProvider {
    connector: Arc<dyn RpcConnector>,
    wallet: Wallet,
    interface: Option<JsonAbi>,
}

impl SelfProvider {
    /// Provider over an HTTP endpoint with a hex private key.
    pub fn new(endpoint: &str, private_key: &str) -> SdkResult<Self> {
        let connector = Arc::new(HttpConnector::new(endpoint)?);
        Ok(Self::with_connector(connector, Wallet::from_private_key(private_key)?))
    }

    /// Provider whose key is read from `CONTRACT_SDK_PRIVATE_KEY`.
    pub fn from_env(endpoint: &str) -> SdkResult<Self> {
        let connector = Arc::new(HttpConnector::new(endpoint)?);
        Ok(Self::with_connector(connector, Wallet::from_env()?))
    }

    pub fn with_connector(connector: Arc<dyn RpcConnector>, wallet: Wallet) -> Self {
        Self {
            connector,
            wallet,
            interface: None,
        }
    }

    pub fn with_interface(mut self, abi: JsonAbi) -> Self {
        self.interface = Some(abi);
        self
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Bind facade `F` to the contract at `address`.
    pub fn connect<F: Facade>(&self, address: &str) -> SdkResult<F> {
        let address = resolve::<F>(address, self.interface.as_ref())?;

        let rpc = self.connector.connect(Some(&self.wallet))?;
        let connection = Connection::signing(rpc, self.wallet.address());

        tracing::debug!(
            facade = F::NAME,
            contract = %address,
            signer = %self.wallet.address(),
            "Signing facade connected"
        );

        Ok(F::from_binding(ContractBinding::new(address, connection)))
    }
}

impl std::fmt::Debug for SelfProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelfProvider")
            .field("wallet", &self.wallet)
            .field("interface_override", &self.interface.is_some())
            .finish()
    }
}
