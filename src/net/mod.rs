//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured address
//!     → listener.rs (parse, bind, fail fast)
//!     → tls.rs (optional rustls configuration)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Binding happens before serving so bind errors abort startup
//! - TLS is optional and handled transparently

pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError};
