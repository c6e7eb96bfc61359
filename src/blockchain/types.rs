//! Error taxonomy and ledger-facing types.

use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Coarse classification of every error the SDK can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed address, byte string or value width. Client-side.
    Format,
    /// Out-of-bounds numeric or index input. Client-side.
    Range,
    /// Remote state does not satisfy a required guard.
    Precondition,
    /// Cross-field business rule violated.
    Constraint,
    /// RPC failure or ledger revert, surfaced verbatim.
    Remote,
    /// Signing credential could not be loaded or used.
    Credential,
}

/// Errors that can occur during SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Malformed input detected before any network call.
    #[error("Format error: {0}")]
    Format(String),

    /// Numeric or index input out of bounds.
    #[error("Range error: {0}")]
    Range(String),

    /// Remote state does not allow the operation.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Individually valid inputs that are jointly invalid.
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// A guard of an operation's validation chain rejected the call.
    #[error("{operation}: guard `{guard}` rejected the call: {source}")]
    Guard {
        operation: &'static str,
        guard: &'static str,
        #[source]
        source: Box<SdkError>,
    },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Ledger response could not be decoded against the interface.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed to depth {0} within the timeout")]
    ConfirmationTimeout(u32),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl SdkError {
    /// Classify the error, looking through guard wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::Format(_) => ErrorKind::Format,
            SdkError::Range(_) => ErrorKind::Range,
            SdkError::Precondition(_) => ErrorKind::Precondition,
            SdkError::Constraint(_) => ErrorKind::Constraint,
            SdkError::Guard { source, .. } => source.kind(),
            SdkError::Wallet(_) => ErrorKind::Credential,
            SdkError::Rpc(_)
            | SdkError::Timeout(_)
            | SdkError::Abi(_)
            | SdkError::Reverted(_)
            | SdkError::ConfirmationTimeout(_)
            | SdkError::ChainMismatch { .. } => ErrorKind::Remote,
        }
    }

    /// True for failures classified by the client itself.
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            SdkError::Format(_)
                | SdkError::Range(_)
                | SdkError::Precondition(_)
                | SdkError::Constraint(_)
        )
    }

    /// Name of the guard that rejected the call, if any.
    pub fn guard(&self) -> Option<&'static str> {
        match self {
            SdkError::Guard { guard, .. } => Some(*guard),
            _ => None,
        }
    }

    pub(crate) fn rpc(e: impl std::fmt::Display) -> Self {
        SdkError::Rpc(e.to_string())
    }

    pub(crate) fn abi(e: impl std::fmt::Display) -> Self {
        SdkError::Abi(e.to_string())
    }
}

/// Result type for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction was mined but reverted.
    Failed(String),
}

/// Minimal view of a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptStatus {
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Whether execution succeeded.
    pub success: bool,
}
