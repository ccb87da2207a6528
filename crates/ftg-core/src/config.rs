//! Configuration parsing for the FTG gateway.
//!
//! The runner reads its settings from a single JSON config file. The top-level
//! structure contains logging metadata and a `sessions` array where each entry
//! describes one trader session.
//!
//! # Example config
//!
//! ```json
//! {
//!   "gateway": { "module_name": "ftg", "log_path": "/tmp/ftg-log" },
//!   "sessions": [{
//!     "label": "sim-a",
//!     "flow_path": "/tmp/flow/",
//!     "front_addr": "tcp://127.0.0.1:17001",
//!     "queue_depth": 8192,
//!     "worker_cpu_core": 2
//!   }]
//! }
//! ```

use serde::Deserialize;

/// Default bound of the session event queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 8192;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Module metadata (name, log path).
    pub gateway: Option<ModuleMeta>,

    /// Array of session configs — one per trader session.
    pub sessions: Vec<SessionConfig>,
}

/// Module metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

impl GatewayConfig {
    /// Returns the module name, defaulting to `"ftg"`.
    pub fn module_name(&self) -> String {
        self.gateway
            .as_ref()
            .and_then(|m| m.module_name.clone())
            .unwrap_or_else(|| "ftg".to_string())
    }

    /// Returns the log path, if configured.
    pub fn log_path(&self) -> Option<String> {
        self.gateway.as_ref().and_then(|m| m.log_path.clone())
    }
}

/// Configuration for one trader session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Human-readable label used in log lines and the worker thread name.
    pub label: Option<String>,

    /// Filesystem path prefix for the engine's local flow/state files.
    /// Engine-owned persisted reconnection state; passed through uninterpreted.
    pub flow_path: String,

    /// Network endpoint of the trading front (e.g. `"tcp://127.0.0.1:17001"`).
    /// Passed through to the engine unvalidated.
    pub front_addr: String,

    /// Event queue bound (default: 8192).
    pub queue_depth: Option<usize>,

    /// CPU core to pin the session event loop thread to.
    pub worker_cpu_core: Option<i32>,
}

impl SessionConfig {
    /// Minimal config for a session — label defaulted, no affinity.
    pub fn new(flow_path: impl Into<String>, front_addr: impl Into<String>) -> Self {
        Self {
            label: None,
            flow_path: flow_path.into(),
            front_addr: front_addr.into(),
            queue_depth: None,
            worker_cpu_core: None,
        }
    }

    /// Returns the effective session label.
    pub fn effective_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| "trader".to_string())
    }

    /// Returns the effective event queue bound.
    pub fn effective_queue_depth(&self) -> usize {
        self.queue_depth.unwrap_or(DEFAULT_QUEUE_DEPTH)
    }
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<GatewayConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: GatewayConfig = serde_json::from_str(&content)
        .map_err(|e| crate::error::GatewayError::Config(format!("{}: {e}", path.display())))?;
    Ok(config)
}
