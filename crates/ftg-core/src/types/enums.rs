//! Enumerations used throughout the trading gateway.
//!
//! [`EventKind`] tags every asynchronous engine-originated message; its
//! [`name`](EventKind::name) is the string key handlers are registered under.
//! [`RequestKind`] tags outbound request records.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Kind of an asynchronous engine-originated event.
///
/// The set mirrors the engine SDK's callback surface: connection lifecycle,
/// authentication and login, order flow, query responses, and errors.
/// [`EventKind::Quit`] is an internal sentinel consumed by the session event
/// loop and never dispatched to a registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // Connection lifecycle
    FrontConnected,
    FrontDisconnected,
    HeartBeatWarning,

    // Authentication / login / passwords
    RspAuthenticate,
    RspUserLogin,
    RspUserLogout,
    RspUserPasswordUpdate,
    RspTradingAccountPasswordUpdate,
    RspUserAuthMethod,
    RspGenUserCaptcha,
    RspGenUserText,

    // Order flow
    RspOrderInsert,
    RspOrderAction,
    RspParkedOrderInsert,
    RspParkedOrderAction,
    RspRemoveParkedOrder,
    RspRemoveParkedOrderAction,
    RspSettlementInfoConfirm,
    RspQryMaxOrderVolume,
    RtnOrder,
    RtnTrade,
    ErrRtnOrderInsert,
    ErrRtnOrderAction,

    // Query responses
    RspQryOrder,
    RspQryTrade,
    RspQryInvestorPosition,
    RspQryTradingAccount,
    RspQrySettlementInfo,
    RspQryInstrument,
    RspQryDepthMarketData,

    // Errors
    RspError,

    // Internal sentinel — terminates the session event loop, never dispatched.
    Quit,
}

impl EventKind {
    /// Stable name used as the handler registration key.
    pub fn name(self) -> &'static str {
        match self {
            Self::FrontConnected => "FrontConnected",
            Self::FrontDisconnected => "FrontDisconnected",
            Self::HeartBeatWarning => "HeartBeatWarning",
            Self::RspAuthenticate => "RspAuthenticate",
            Self::RspUserLogin => "RspUserLogin",
            Self::RspUserLogout => "RspUserLogout",
            Self::RspUserPasswordUpdate => "RspUserPasswordUpdate",
            Self::RspTradingAccountPasswordUpdate => "RspTradingAccountPasswordUpdate",
            Self::RspUserAuthMethod => "RspUserAuthMethod",
            Self::RspGenUserCaptcha => "RspGenUserCaptcha",
            Self::RspGenUserText => "RspGenUserText",
            Self::RspOrderInsert => "RspOrderInsert",
            Self::RspOrderAction => "RspOrderAction",
            Self::RspParkedOrderInsert => "RspParkedOrderInsert",
            Self::RspParkedOrderAction => "RspParkedOrderAction",
            Self::RspRemoveParkedOrder => "RspRemoveParkedOrder",
            Self::RspRemoveParkedOrderAction => "RspRemoveParkedOrderAction",
            Self::RspSettlementInfoConfirm => "RspSettlementInfoConfirm",
            Self::RspQryMaxOrderVolume => "RspQryMaxOrderVolume",
            Self::RtnOrder => "RtnOrder",
            Self::RtnTrade => "RtnTrade",
            Self::ErrRtnOrderInsert => "ErrRtnOrderInsert",
            Self::ErrRtnOrderAction => "ErrRtnOrderAction",
            Self::RspQryOrder => "RspQryOrder",
            Self::RspQryTrade => "RspQryTrade",
            Self::RspQryInvestorPosition => "RspQryInvestorPosition",
            Self::RspQryTradingAccount => "RspQryTradingAccount",
            Self::RspQrySettlementInfo => "RspQrySettlementInfo",
            Self::RspQryInstrument => "RspQryInstrument",
            Self::RspQryDepthMarketData => "RspQryDepthMarketData",
            Self::RspError => "RspError",
            Self::Quit => "Quit",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Request kinds
// ---------------------------------------------------------------------------

/// Kind of an outbound request record submitted to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Authenticate,
    UserLogin,
    UserLogout,
    UserPasswordUpdate,
    TradingAccountPasswordUpdate,
    UserAuthMethod,
    GenUserCaptcha,
    GenUserText,
    UserLoginWithCaptcha,
    UserLoginWithText,
    UserLoginWithOtp,
    OrderInsert,
    OrderAction,
    ParkedOrderInsert,
    ParkedOrderAction,
    RemoveParkedOrder,
    RemoveParkedOrderAction,
    SettlementInfoConfirm,
    QryMaxOrderVolume,
    QryOrder,
    QryTrade,
    QryInvestorPosition,
    QryTradingAccount,
    QrySettlementInfo,
    QryInstrument,
    QryDepthMarketData,
}

// ---------------------------------------------------------------------------
// Topic resume policy
// ---------------------------------------------------------------------------

/// Resume policy for the engine's public/private topic feeds.
///
/// Controls where the engine resumes the trading-day event stream after a
/// reconnect. Sessions subscribe with [`ResumePolicy::Quick`] (latest only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumePolicy {
    /// Replay from the start of the trading day.
    Restart,
    /// Resume from the last received position.
    Resume,
    /// Only deliver events from now on.
    Quick,
}

// ---------------------------------------------------------------------------
// Order / trading enums
// ---------------------------------------------------------------------------

/// Buy or sell direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

/// Order status reported in order return events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    AllTraded,
    PartTraded,
    NoTrade,
    Canceled,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_names() {
        assert_eq!(EventKind::FrontConnected.name(), "FrontConnected");
        assert_eq!(EventKind::RspUserLogin.name(), "RspUserLogin");
        assert_eq!(EventKind::RtnTrade.name(), "RtnTrade");
        assert_eq!(EventKind::RspQryInvestorPosition.name(), "RspQryInvestorPosition");
    }

    #[test]
    fn event_kind_display_matches_name() {
        assert_eq!(EventKind::RtnOrder.to_string(), EventKind::RtnOrder.name());
    }
}
