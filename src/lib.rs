//! CT submission publisher.
//!
//! Resolves the certificate chains that accompany Certificate Transparency
//! submissions and serves them, with a liveness endpoint, until stopped.
//!
//! # Architecture Overview
//!
//! ```text
//!   config (TOML/JSON) + CLI overrides
//!          │
//!          ▼
//!   ┌─────────────┐    ┌──────────────┐    ┌──────────────┐
//!   │   config    │───▶│    chain     │───▶│  publisher   │
//!   │ validation  │    │  resolver    │    │   facade     │
//!   └─────────────┘    └──────────────┘    └──────┬───────┘
//!                                                 │
//!                                                 ▼
//!   ┌─────────────┐    ┌──────────────┐    ┌──────────────┐
//!   │  lifecycle  │───▶│     net      │───▶│     http     │
//!   │ signals/    │    │  listener    │    │ /health      │
//!   │ shutdown    │    │  + tls       │    │ /publisher   │
//!   └─────────────┘    └──────────────┘    └──────────────┘
//! ```

// Core subsystems
pub mod chain;
pub mod config;
pub mod http;
pub mod net;
pub mod publisher;

// Cross-cutting concerns
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use config::PublisherConfig;
pub use error::Error;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
