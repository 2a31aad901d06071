//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the registry.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::validation::ValidationError;
use crate::error::RegistryError;

/// Root configuration for a node registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Scheme every node is contacted with ("http" or "https").
    pub scheme: String,

    /// Initial node addresses, tried in order until discovery replaces them.
    pub seeds: Vec<String>,

    /// Port shared by every node.
    pub port: u16,

    /// Path of the discovery endpoint on each node.
    pub discovery_path: String,

    /// Delay between discovery cycles in milliseconds.
    pub refresh_interval_ms: u64,

    /// How long a node stays quarantined before the bad set is wiped.
    pub bad_nodes_reset_ms: u64,

    /// Deadline for a single discovery request in milliseconds.
    pub request_timeout_ms: u64,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            seeds: Vec::new(),
            port: 8080,
            discovery_path: "/localnodes".to_string(),
            refresh_interval_ms: 1_000,
            bad_nodes_reset_ms: 60 * 60 * 1_000,
            request_timeout_ms: 5_000,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Config for the given scheme, seeds and port, everything else defaulted.
    pub fn new<S: Into<String>>(scheme: &str, seeds: impl IntoIterator<Item = S>, port: u16) -> Self {
        Self {
            scheme: scheme.to_string(),
            seeds: seeds.into_iter().map(Into::into).collect(),
            port,
            ..Self::default()
        }
    }

    /// Derive scheme, single seed and port from a URI such as `http://10.0.0.1:8000`.
    ///
    /// A URI without an explicit port uses the scheme's well-known port.
    pub fn from_uri(uri: &str) -> Result<Self, RegistryError> {
        let invalid = || RegistryError::from(vec![ValidationError::InvalidUri(uri.to_string())]);

        let url = Url::parse(uri).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?;
        let port = url.port_or_known_default().ok_or_else(invalid)?;
        // Url keeps the brackets around IPv6 literals; seeds are bare hosts.
        let host = host.trim_start_matches('[').trim_end_matches(']');

        Ok(Self::new(url.scheme(), [host], port))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn bad_nodes_reset(&self) -> Duration {
        Duration::from_millis(self.bad_nodes_reset_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
