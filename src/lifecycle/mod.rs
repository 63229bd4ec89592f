//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Decide chain source → Resolve bundles → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Health not serving → Stop accepting → Drain requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT/SIGHUP → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then certificates, then listeners
//! - Fail fast: configuration errors surface before any socket is opened
//! - Ordered shutdown: health first, then stop accept, then drain

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{ServiceState, Shutdown, ShutdownError};
pub use signals::SignalWatcher;
pub use startup::{prepare, run, Service, StartupError};
