//! Client SDK for the lending, staking, buyback and vesting contracts.
//!
//! ```text
//! caller → provider (assisted | self)
//!        → facade method
//!        → guards (format → range → constraint → state)
//!        → ContractBinding (query | prepare + dispatch)
//!        → Connection → LedgerRpc → ledger
//! ```

pub mod blockchain;
pub mod config;
pub mod facades;
pub mod guards;
pub mod observability;
pub mod pagination;
pub mod provider;

pub use blockchain::{Dispatch, ErrorKind, PendingAction, SdkError, SdkResult, SubmittedTx};
pub use config::schema::SdkConfig;
pub use facades::{Buyback, Facade, LendingPool, Staking, Vesting};
pub use pagination::Page;
pub use provider::{AssistedProvider, SelfProvider};
