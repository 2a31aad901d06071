//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Refresh loop and selection path produce:
//!     → tracing events (loop lifecycle, list updates, quarantines)
//!     → metrics.rs (discovery outcomes, live/bad gauges)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//!     → Prometheus exporter installed by the binary (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers/exporters is the binary's job
//! - Metrics go through the `metrics` facade and are no-ops without a recorder

pub mod logging;
pub mod metrics;
