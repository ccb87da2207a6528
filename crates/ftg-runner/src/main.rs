//! # ftg-runner
//!
//! Main entry point for the FTG trading gateway.
//!
//! Loads a JSON configuration file, creates one trader session per configured
//! entry (against the in-process sim engine), registers a few logging
//! handlers, and manages the lifecycle until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! ftg-runner config.json --log-level info
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ftg_trader::{CallbackRuntime, EngineApi, Session, SimEngine};
use serde_json::json;
use tracing::{error, info, warn};

/// Futures Trading Gateway Runner.
#[derive(Parser)]
#[command(name = "ftg-runner", about = "Futures Trading Gateway Runner")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    ftg_core::logging::init_logging(&cli.log_level, cli.log_dir.as_deref(), "ftg-runner");

    info!("ftg-runner starting — config={}, log_level={}", cli.config.display(), cli.log_level,);

    // 2. Load configuration
    let config = ftg_core::config::load_config(&cli.config)?;
    info!("config loaded — {} session(s)", config.sessions.len(),);

    // 3. Spawn the callback runtime all handlers execute on
    let (runtime, _runtime_thread) = CallbackRuntime::spawn()
        .map_err(|e| ftg_core::error::GatewayError::Runtime(e.to_string()))?;

    // 4. Create sessions from the sessions array
    let mut sessions: Vec<Session> = Vec::new();

    for (idx, session_config) in config.sessions.iter().enumerate() {
        let label = session_config.effective_label();
        match Session::connect(session_config, runtime.clone(), |flow_path| {
            Ok(Box::new(SimEngine::new(flow_path)) as Box<dyn EngineApi>)
        }) {
            Ok(session) => {
                info!(
                    "session[{idx}]: '{label}' created (front={}, api={})",
                    session_config.front_addr,
                    session.api_version(),
                );
                wire_handlers(&session, label.clone());

                // demo login through the facade; the sim echoes RspUserLogin
                let status = session.user_login(&json!({
                    "BrokerID": "9999",
                    "UserID": "sim",
                    "Password": "sim",
                }));
                info!("session[{idx}]: login submitted, status={status:?}");

                sessions.push(session);
            }
            Err(e) => {
                error!("session[{idx}]: failed to create '{label}': {e}");
            }
        }
    }

    info!("all {} session(s) running — press Ctrl+C to stop", sessions.len(),);

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    // 6. Tear down sessions (pushes quit, joins each event loop)
    drop(sessions);

    info!("all sessions stopped — goodbye");
    Ok(())
}

/// Register logging handlers for the interesting event kinds.
fn wire_handlers(session: &Session, label: String) {
    let l1 = label.clone();
    let l2 = label.clone();
    let l3 = label.clone();
    let l4 = label;
    session
        .on("FrontConnected", move |_e| {
            info!("[{l1}] front connected");
        })
        .on("FrontDisconnected", move |e| {
            warn!("[{l2}] front disconnected: {:?}", e.payload);
        })
        .on("RspUserLogin", move |e| {
            info!("[{l3}] login response (request_id={}): {:?}", e.request_id, e.payload);
        })
        .on("RspError", move |e| {
            error!("[{l4}] engine error: {:?}", e.payload);
        });
}
