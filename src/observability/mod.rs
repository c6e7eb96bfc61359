//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! blockchain, guards, facades produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`operation`, `guard`, `method`, `contract`, `tx_hash`)
//! - Private keys and raw credentials are never recorded

pub mod logging;
pub mod metrics;
