//! Decoded response records carried in event payloads.
//!
//! These are the engine's response structs decoded into owned values so they
//! can cross from the session event loop into the callback runtime without
//! borrowing queue memory.

use serde::{Deserialize, Serialize};

use super::enums::{Direction, OrderStatus};

// ---------------------------------------------------------------------------
// Response status info
// ---------------------------------------------------------------------------

/// Error/status block attached to response events.
///
/// `error_id == 0` means success; nonzero codes are engine-defined and passed
/// through unmodified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RspInfo {
    pub error_id: i32,
    pub error_msg: String,
}

impl RspInfo {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn error(error_id: i32, error_msg: impl Into<String>) -> Self {
        Self {
            error_id,
            error_msg: error_msg.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLoginInfo {
    pub trading_day: String,
    pub login_time: String,
    pub broker_id: String,
    pub user_id: String,
    /// Front the session landed on.
    pub front_id: i32,
    /// Engine-assigned session identifier.
    pub session_id: i32,
    /// First usable order reference for this session.
    pub max_order_ref: String,
}

// ---------------------------------------------------------------------------
// Orders and trades
// ---------------------------------------------------------------------------

/// An order acknowledgement or status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInfo {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub order_ref: String,
    pub order_sys_id: String,
    pub direction: Direction,
    pub limit_price: f64,
    pub volume_total_original: i32,
    pub volume_traded: i32,
    pub status: OrderStatus,
    pub status_msg: String,
}

/// A trade (fill) report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeInfo {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub trade_id: String,
    pub order_sys_id: String,
    pub direction: Direction,
    pub price: f64,
    pub volume: i32,
    pub trade_time: String,
}

// ---------------------------------------------------------------------------
// Query responses
// ---------------------------------------------------------------------------

/// A position snapshot row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionInfo {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub direction: Direction,
    pub position: i32,
    pub position_cost: f64,
    pub open_cost: f64,
}

/// A trading account funds snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingAccountInfo {
    pub broker_id: String,
    pub account_id: String,
    pub balance: f64,
    pub available: f64,
    pub curr_margin: f64,
    pub frozen_margin: f64,
}

/// An instrument definition row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentInfo {
    pub instrument_id: String,
    pub exchange_id: String,
    pub product_id: String,
    pub volume_multiple: i32,
    pub price_tick: f64,
}
