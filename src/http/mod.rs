//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, one listener for both endpoints)
//!     → GET /health → health reporter
//!     → POST /publisher/v1/chain → publisher facade
//!     → Send to client
//! ```

pub mod server;

pub use server::{build_router, AppState, ChainRequest, HttpServer, CT_USER_AGENT};
