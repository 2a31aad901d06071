//! Round-robin client-side load balancing over a self-refreshing list of live cluster nodes.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod nodes;
pub mod observability;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use nodes::{NodeRegistry, Scheme};
