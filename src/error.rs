//! Error taxonomy for the node registry.
//!
//! Only `InvalidConfig` and `NoRuntime` ever reach a caller. The discovery
//! variants are produced inside the refresh loop, logged, and absorbed there.

use crate::config::validation::ValidationError;
use crate::nodes::discovery::ParseError;

/// Errors produced by the registry and its discovery cycle.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid registry configuration: {}", join(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("no tokio runtime available to run the refresh loop")]
    NoRuntime,

    #[error("failed to build the discovery HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("discovery request to {node} failed: {source}")]
    DiscoveryTransport {
        node: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("discovery request to {node} returned status {status}")]
    DiscoveryStatus {
        node: String,
        status: reqwest::StatusCode,
    },

    #[error("discovery response was malformed: {0}")]
    DiscoveryParse(#[from] ParseError),
}

impl RegistryError {
    /// Whether this failure should put the contacted node into quarantine.
    ///
    /// Transport and status failures do; a node that answered with a body we
    /// could not read is still reachable and stays eligible.
    pub fn marks_node_bad(&self) -> bool {
        matches!(
            self,
            RegistryError::DiscoveryTransport { .. } | RegistryError::DiscoveryStatus { .. }
        )
    }
}

impl From<Vec<ValidationError>> for RegistryError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RegistryError::InvalidConfig(errors)
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_lists_every_error() {
        let err = RegistryError::from(vec![
            ValidationError::EmptySeeds,
            ValidationError::InvalidPort,
        ]);
        let msg = err.to_string();
        assert!(msg.contains("seed"), "{}", msg);
        assert!(msg.contains("port"), "{}", msg);
        assert!(!err.marks_node_bad());
    }

    #[test]
    fn test_parse_failure_does_not_mark_bad() {
        let err = RegistryError::from(ParseError::MissingBrackets);
        assert!(!err.marks_node_bad());
    }
}
