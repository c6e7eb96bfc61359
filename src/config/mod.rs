//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SdkConfig (validated, immutable)
//!
//! constants.rs: role ids, bps denominator, limits and time windows
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Private keys never live in the file; see `blockchain::wallet`

pub mod constants;
pub mod loader;
pub mod schema;
pub mod validation;

pub use constants::Role;
pub use loader::{load_config, ConfigError};
pub use schema::{ContractsConfig, NetworkConfig, ObservabilityConfig, SdkConfig};
