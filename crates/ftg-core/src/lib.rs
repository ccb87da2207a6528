//! # ftg-core
//!
//! Core crate for the FTG futures trading gateway, providing:
//!
//! - **Types** (`types`) — event kinds, decoded event payloads, fixed-width
//!   engine request records, bounded field marshaling
//! - **Configuration** (`config`) — JSON config deserialization
//! - **Error types** (`error`) — domain-specific `GatewayError` via thiserror
//! - **CPU affinity** (`cpu_affinity`) — thread-to-core pinning for the
//!   session event loop
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod cpu_affinity;
pub mod error;
pub mod logging;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
