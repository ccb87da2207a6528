//! The asynchronous event type flowing from the engine to handlers.
//!
//! Ownership: the engine produces an [`Event`], the session event loop
//! consumes it exactly once and drops it after the handler invocation has
//! completed on the callback runtime.

use serde::{Deserialize, Serialize};

use super::enums::EventKind;
use super::trading::*;

/// An asynchronous engine-originated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// What kind of event this is; [`EventKind::name`] is the dispatch key.
    pub kind: EventKind,
    /// Correlates responses with the request id allocated at submit time.
    /// Zero for unsolicited events (connection lifecycle, order returns).
    pub request_id: i32,
    /// Whether this is the final chunk of a multi-part query response.
    pub is_last: bool,
    /// Decoded response payload.
    pub payload: EventPayload,
}

impl Event {
    pub fn new(kind: EventKind, request_id: i32, is_last: bool, payload: EventPayload) -> Self {
        Self {
            kind,
            request_id,
            is_last,
            payload,
        }
    }

    /// Unsolicited event with no correlation id.
    pub fn unsolicited(kind: EventKind, payload: EventPayload) -> Self {
        Self::new(kind, 0, true, payload)
    }

    /// The internal quit sentinel terminating a session's event loop.
    pub fn quit() -> Self {
        Self::new(EventKind::Quit, 0, true, EventPayload::None)
    }
}

/// Decoded payload of an [`Event`] — one variant per response record family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// No payload (front connected, quit).
    None,
    /// Front connection lost; `reason` is the engine's disconnect code.
    Disconnected { reason: i32 },
    /// Heartbeat overdue by `lapse` seconds.
    HeartBeatWarning { lapse: i32 },
    /// Bare status block (simple acks and error responses).
    Rsp(RspInfo),
    /// Login response.
    UserLogin(UserLoginInfo),
    /// Order acknowledgement or status update.
    Order(OrderInfo),
    /// Trade (fill) report.
    Trade(TradeInfo),
    /// Position query row.
    Position(PositionInfo),
    /// Trading account query row.
    TradingAccount(TradingAccountInfo),
    /// Instrument query row.
    Instrument(InstrumentInfo),
    /// Untyped field map for response kinds without a dedicated record.
    Fields(serde_json::Value),
}
