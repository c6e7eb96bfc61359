//! Metrics collection.
//!
//! # Metrics
//! - `sdk_rpc_calls_total` (counter): RPC requests by method, outcome
//! - `sdk_guard_rejections_total` (counter): guard failures by operation, guard
//! - `sdk_dispatch_total` (counter): actions by dispatch mode (submitted/unsigned)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no exporter is installed here,
//!   so the calls are no-ops unless the application installs a recorder

use metrics::counter;

/// Record the outcome of a single RPC request.
pub fn record_rpc_call(method: &'static str, outcome: &'static str) {
    counter!("sdk_rpc_calls_total", "method" => method, "outcome" => outcome).increment(1);
}

/// Record a guard rejecting an operation.
pub fn record_guard_rejection(operation: &'static str, guard: &'static str) {
    counter!("sdk_guard_rejections_total", "operation" => operation, "guard" => guard)
        .increment(1);
}

/// Record how an action was dispatched.
pub fn record_dispatch(mode: &'static str) {
    counter!("sdk_dispatch_total", "mode" => mode).increment(1);
}
