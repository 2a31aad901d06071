//! Live node subsystem.
//!
//! # Data Flow
//! ```text
//! Caller → NodeRegistry::next_node()
//!     → live_set.rs (load snapshot, take node at cursor, advance)
//!     → host string / URL via endpoint.rs
//!
//! Refresher loop (registry.rs), once per interval:
//!     bad_set.rs expire if window elapsed
//!     → pick target with the same rotation callers use
//!     → discovery.rs GET /localnodes, parse body
//!     → subtract bad_set.rs
//!     → non-empty and different? swap in a new live_set.rs snapshot
//! ```
//!
//! # Design Decisions
//! - The live list is never empty; an unusable update keeps the old list
//! - Transport and status failures quarantine the node; parse failures do not
//! - Nothing from the refresh path ever surfaces to `next_node` callers

pub mod bad_set;
pub mod discovery;
pub mod endpoint;
pub mod live_set;
pub mod registry;

pub use endpoint::{Node, Scheme};
pub use registry::NodeRegistry;
