//! Typed error definitions for the FTG gateway.
//!
//! Provides [`GatewayError`] for domain-specific errors that are more
//! informative than plain `anyhow::Error` strings. All variants implement
//! `std::error::Error` via `thiserror`, so they integrate seamlessly with
//! `anyhow::Result` at the runner boundary.

use thiserror::Error;

/// Domain-specific errors for the FTG gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// Session worker thread could not be created.
    #[error("thread error: {0}")]
    Thread(String),

    /// Engine connection object could not be created or wired.
    #[error("engine error: {0}")]
    Engine(String),

    /// Callback runtime is gone while the session still needed it.
    #[error("runtime error: {0}")]
    Runtime(String),
}
