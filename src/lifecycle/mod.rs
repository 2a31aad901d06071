//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Start (NodeRegistry::start):
//!     Validate config → Build seed list → Subscribe to shutdown → Spawn refresh loop
//!
//! Stop (shutdown.rs):
//!     stop() or last handle dropped → broadcast → loop exits at its next await point
//!
//! Signals (signals.rs, binary only):
//!     SIGINT/SIGTERM → stop the registry → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
