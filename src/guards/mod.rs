//! Validation pipeline.
//!
//! # Data Flow
//! ```text
//! facade action inputs
//!     → format.rs (typed conversion: addresses, widths, hex)
//!     → GuardChain:
//!         range.rs       (positivity, non-zero)
//!         constraint.rs  (cross-field rules, time windows)
//!         state.rs       (pause flag, roles, entity status; one query each)
//!     → ContractBinding::act
//! ```
//!
//! # Design Decisions
//! - Guards run strictly in declared order and stop at the first failure
//! - A guard after the failing one is never polled
//! - Every client-side guard is declared before any state guard, so a bad
//!   input never costs a network round trip
//! - State guards query fresh on every call; values one guard fetches are
//!   shared with later guards of the same chain through a local `OnceCell`

pub mod constraint;
pub mod format;
pub mod range;
pub mod state;

use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::blockchain::types::{SdkError, SdkResult};
use crate::observability::metrics;

/// Ordered list of guards protecting one operation.
pub struct GuardChain<'a> {
    operation: &'static str,
    guards: Vec<(&'static str, BoxFuture<'a, SdkResult<()>>)>,
}

impl<'a> GuardChain<'a> {
    /// Start an empty chain for `operation`.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            guards: Vec::new(),
        }
    }

    /// Append a client-side guard.
    pub fn check<F>(mut self, name: &'static str, guard: F) -> Self
    where
        F: FnOnce() -> SdkResult<()> + Send + 'a,
    {
        self.guards.push((name, async move { guard() }.boxed()));
        self
    }

    /// Append a guard that needs remote state.
    pub fn remote<F>(mut self, name: &'static str, guard: F) -> Self
    where
        F: Future<Output = SdkResult<()>> + Send + 'a,
    {
        self.guards.push((name, guard.boxed()));
        self
    }

    /// Number of declared guards.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no guard was declared.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Evaluate the guards in order.
    ///
    /// Client-classified failures are wrapped in `SdkError::Guard`; remote
    /// errors raised while fetching guard context pass through unchanged.
    pub async fn run(self) -> SdkResult<()> {
        let operation = self.operation;

        for (guard, check) in self.guards {
            match check.await {
                Ok(()) => {}
                Err(e) if e.is_violation() => {
                    tracing::warn!(operation, guard, reason = %e, "Guard rejected call");
                    metrics::record_guard_rejection(operation, guard);
                    return Err(SdkError::Guard {
                        operation,
                        guard,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(operation, "All guards passed");
        Ok(())
    }
}

/// Current unix time from the local clock.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
