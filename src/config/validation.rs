//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, port valid)
//! - Check that every seed forms a usable host
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RegistryConfig → Result<(), Vec<ValidationError>>
//! - Runs before the registry starts its refresh loop

use crate::config::schema::RegistryConfig;
use crate::nodes::endpoint::{Node, Scheme};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("at least one seed address is required")]
    EmptySeeds,

    #[error("seed '{0}' is not a valid host")]
    InvalidSeed(String),

    #[error("port must be between 1 and 65535")]
    InvalidPort,

    #[error("refresh interval must be greater than zero")]
    ZeroRefreshInterval,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error("discovery path '{0}' must start with '/'")]
    InvalidDiscoveryPath(String),

    #[error("'{0}' is not a usable node URI")]
    InvalidUri(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let scheme = config.scheme.parse::<Scheme>().ok();
    if scheme.is_none() {
        errors.push(ValidationError::UnsupportedScheme(config.scheme.clone()));
    }

    if config.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if config.seeds.is_empty() {
        errors.push(ValidationError::EmptySeeds);
    }

    // Seed hosts can only be checked against a well-formed scheme and port.
    let probe_scheme = scheme.unwrap_or(Scheme::Http);
    let probe_port = config.port.max(1);
    for seed in &config.seeds {
        if Node::new(seed, probe_scheme, probe_port).is_none() {
            errors.push(ValidationError::InvalidSeed(seed.clone()));
        }
    }

    if config.refresh_interval_ms == 0 {
        errors.push(ValidationError::ZeroRefreshInterval);
    }

    if config.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if !config.discovery_path.starts_with('/') {
        errors.push(ValidationError::InvalidDiscoveryPath(config.discovery_path.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
