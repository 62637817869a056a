//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected and returned together rather than stopping at the first one.

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_format: unknown format '{0}' (expected 'pretty' or 'json')")]
    UnknownLogFormat(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let network = &config.network;

    for (field, value) in [
        ("network.rpc_url", &network.rpc_url),
        ("network.bridge_url", &network.bridge_url),
    ] {
        if value.parse::<url::Url>().is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if network.chain_id == 0 {
        errors.push(ValidationError::Zero("network.chain_id"));
    }
    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero("network.rpc_timeout_secs"));
    }
    if network.confirmation_blocks == 0 {
        errors.push(ValidationError::Zero("network.confirmation_blocks"));
    }
    if network.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::Zero("network.confirmation_timeout_secs"));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
