//! Liveness reporting subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle (startup/shutdown)
//!     → state.rs (Serving / NotServing)
//!     → http GET /health (200 or 503)
//!     → external load balancer
//! ```
//!
//! # Design Decisions
//! - One process-wide status, not per endpoint
//! - Draining flips the status before the listener stops accepting

pub mod state;

pub use state::{HealthReporter, ServingStatus};
