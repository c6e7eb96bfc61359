//! Ledger plumbing.
//!
//! # Data Flow
//! ```text
//! credential (string or CONTRACT_SDK_PRIVATE_KEY)
//!     → wallet.rs (key parsing, address)
//!     → client.rs (RPC transport, optionally signing)
//!     → connection.rs (transport + acting identity)
//!     → binding.rs (typed query / prepare / dispatch)
//!     → transaction.rs (confirmation polling)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - No retries: a failed request is reported to the caller as-is

pub mod binding;
pub mod client;
pub mod connection;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use binding::{ContractBinding, Dispatch, PendingAction};
pub use client::{HttpRpc, LedgerRpc};
pub use connection::Connection;
pub use transaction::SubmittedTx;
pub use types::{ChainId, ConfirmationStatus, ErrorKind, ReceiptStatus, SdkError, SdkResult};
pub use wallet::Wallet;
