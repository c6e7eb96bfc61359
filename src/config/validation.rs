//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, URL parses)
//! - Reject malformed contract addresses before any facade is built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SdkConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::SdkConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let network = &config.network;

    match network.rpc_url.parse::<url::Url>() {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => errors.push(
            ValidationError::new("network.rpc_url", format!("unsupported scheme '{}'", url.scheme())),
        ),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("network.rpc_url", e.to_string())),
    }

    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be > 0"));
    }
    if network.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new("network.confirmation_timeout_secs", "must be > 0"));
    }
    if network.poll_interval_ms == 0 {
        errors.push(ValidationError::new("network.poll_interval_ms", "must be > 0"));
    }

    for (name, addr) in config.contracts.entries() {
        if let Err(e) = addr.parse::<Address>() {
            errors.push(ValidationError::new(format!("contracts.{name}"), e.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SdkConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = SdkConfig::default();
        config.network.rpc_url = "ws://localhost:8546".into();
        config.network.rpc_timeout_secs = 0;
        config.contracts.vesting = Some("0x1234".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "contracts.vesting"));
        assert!(errors.iter().any(|e| e.field == "network.rpc_url"));
    }
}
