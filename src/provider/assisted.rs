//! Read-only provider. Actions come back as unsigned payloads.

use alloy::json_abi::JsonAbi;
use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::binding::ContractBinding;
use crate::blockchain::connection::Connection;
use crate::blockchain::types::SdkResult;
use crate::facades::Facade;
use crate::provider::{resolve, HttpConnector, RpcConnector};

/// Builds facades without a signing credential.
#[derive(Clone)]
pub struct AssistedProvider {
    connector: Arc<dyn RpcConnector>,
    caller: Option<Address>,
    interface: Option<JsonAbi>,
}

impl AssistedProvider {
    /// Provider over an HTTP endpoint.
    pub fn new(endpoint: &str) -> SdkResult<Self> {
        Ok(Self::with_connector(Arc::new(HttpConnector::new(endpoint)?)))
    }

    /// Provider over a custom transport.
    pub fn with_connector(connector: Arc<dyn RpcConnector>) -> Self {
        Self {
            connector,
            caller: None,
            interface: None,
        }
    }

    /// Declare who will sign the returned payloads.
    ///
    /// Enables role and ownership guards and sets `from` on pending actions.
    pub fn with_caller(mut self, caller: Address) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Override the interface description the facades are checked against.
    pub fn with_interface(mut self, abi: JsonAbi) -> Self {
        self.interface = Some(abi);
        self
    }

    /// Bind facade `F` to the contract at `address`.
    pub fn connect<F: Facade>(&self, address: &str) -> SdkResult<F> {
        let address = resolve::<F>(address, self.interface.as_ref())?;

        let mut connection = Connection::read_only(self.connector.connect(None)?);
        if let Some(caller) = self.caller {
            connection = connection.with_caller(caller);
        }

        tracing::debug!(
            facade = F::NAME,
            contract = %address,
            caller = ?self.caller,
            "Assisted facade connected"
        );

        Ok(F::from_binding(ContractBinding::new(address, connection)))
    }
}

impl std::fmt::Debug for AssistedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistedProvider")
            .field("caller", &self.caller)
            .field("interface_override", &self.interface.is_some())
            .finish()
    }
}
