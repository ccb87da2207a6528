//! Trader session — lifecycle, handler registration, and the request facade.
//!
//! A [`Session`] owns one engine connection, one event loop thread, and the
//! handler table. Construction wires them in a fixed order; teardown runs in
//! [`Drop`], so cleanup is not skippable: quit is pushed, the event loop is
//! joined (draining whatever was queued ahead of quit), registrations are
//! released, and the engine is released last.
//!
//! Request methods share one generic implementation: copy the operation's
//! named fields out of a JSON record into a zero-initialized
//! [`RequestRecord`] and submit it under a fresh request id. A non-record
//! argument is a silent no-op (`None`) — the permissive surface callers of
//! this gateway expect.

use std::sync::{
    PoisonError,
    atomic::{AtomicI32, Ordering},
};
use std::thread;

use ftg_core::config::SessionConfig;
use ftg_core::error::GatewayError;
use ftg_core::{Event, RequestKind, RequestRecord, ResumePolicy};
use serde_json::Value;
use tracing::{error, info};

use crate::dispatch::{self, Handler, HandlerTable};
use crate::engine::EngineApi;
use crate::queue::{EventSink, event_queue};
use crate::runtime::RuntimeHandle;

/// Registration keys longer than this are truncated, like every other
/// engine-bound string field.
const MAX_EVENT_NAME_LEN: usize = 64;

/// One trader session over an engine connection.
pub struct Session {
    label: String,
    engine: Box<dyn EngineApi>,
    handlers: HandlerTable,
    sink: EventSink,
    worker: Option<thread::JoinHandle<()>>,
    request_seq: AtomicI32,
}

impl Session {
    /// Construct a session and begin connecting.
    ///
    /// Order matters: the event loop thread is spawned first (a spawn
    /// failure is a construction error), then the engine is created with the
    /// flow path — if that fails the event loop is quiesced (quit + join)
    /// before the error is returned, so no thread leaks. On success the
    /// engine is wired: sink registered, public and private topics
    /// subscribed with the quick policy, front address set, `init` called.
    pub fn connect<F>(
        config: &SessionConfig,
        runtime: RuntimeHandle,
        make_engine: F,
    ) -> Result<Session, GatewayError>
    where
        F: FnOnce(&str) -> Result<Box<dyn EngineApi>, GatewayError>,
    {
        let label = config.effective_label();
        let (sink, rx) = event_queue(config.effective_queue_depth());
        let handlers = dispatch::handler_table();

        let worker = {
            let label = label.clone();
            let handlers = HandlerTable::clone(&handlers);
            let cpu_core = config.worker_cpu_core;
            thread::Builder::new()
                .name(format!("{label}-events"))
                .spawn(move || dispatch::run_event_loop(&label, rx, handlers, runtime, cpu_core))
                .map_err(|e| GatewayError::Thread(e.to_string()))?
        };

        let mut engine = match make_engine(&config.flow_path) {
            Ok(engine) => engine,
            Err(e) => {
                sink.push_quit();
                let _ = worker.join();
                return Err(e);
            }
        };

        engine.register_sink(sink.clone());
        engine.subscribe_public_topic(ResumePolicy::Quick);
        engine.subscribe_private_topic(ResumePolicy::Quick);
        engine.register_front(&config.front_addr);
        engine.init();

        info!("[{label}] session connecting to {}", config.front_addr);

        Ok(Session {
            label,
            engine,
            handlers,
            sink,
            worker: Some(worker),
            request_seq: AtomicI32::new(1),
        })
    }

    /// Engine SDK version string. Pure passthrough, no side effects.
    pub fn api_version(&self) -> String {
        self.engine.api_version()
    }

    /// Register `handler` for the event kind named `event_name`.
    ///
    /// Names are not validated against the known kind set — an unknown name
    /// is accepted and simply never matched. At most one handler per name:
    /// the last registration wins and the previous handler is dropped at
    /// that point. Returns `&self` for call chaining.
    pub fn on<F>(&self, event_name: &str, handler: F) -> &Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let key = bounded_event_name(event_name);
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, std::sync::Arc::new(handler) as Handler);
        self
    }

    // -----------------------------------------------------------------------
    // Request facade
    // -----------------------------------------------------------------------
    //
    // Every operation is the same shape: copy the operation's named fields
    // out of the input record, submit, pass the engine's synchronous status
    // through. Fields absent from the input stay zero; oversized strings are
    // truncated to the engine's field widths.

    /// Terminal authentication, required by some brokers before login.
    pub fn authenticate(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::Authenticate,
            &["BrokerID", "UserID", "UserProductInfo", "AuthCode", "AppID"],
            fields,
        )
    }

    pub fn user_login(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::UserLogin,
            &["BrokerID", "UserID", "Password"],
            fields,
        )
    }

    pub fn user_logout(&self, fields: &Value) -> Option<i32> {
        self.request(RequestKind::UserLogout, &["BrokerID", "UserID"], fields)
    }

    pub fn user_password_update(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::UserPasswordUpdate,
            &["BrokerID", "UserID", "OldPassword", "NewPassword"],
            fields,
        )
    }

    pub fn trading_account_password_update(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::TradingAccountPasswordUpdate,
            &["BrokerID", "AccountID", "OldPassword", "NewPassword"],
            fields,
        )
    }

    pub fn user_auth_method(&self, fields: &Value) -> Option<i32> {
        self.request(RequestKind::UserAuthMethod, &["BrokerID", "UserID"], fields)
    }

    pub fn gen_user_captcha(&self, fields: &Value) -> Option<i32> {
        self.request(RequestKind::GenUserCaptcha, &["BrokerID", "UserID"], fields)
    }

    pub fn gen_user_text(&self, fields: &Value) -> Option<i32> {
        self.request(RequestKind::GenUserText, &["BrokerID", "UserID"], fields)
    }

    pub fn user_login_with_captcha(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::UserLoginWithCaptcha,
            &["BrokerID", "UserID", "Password", "UserProductInfo", "Captcha"],
            fields,
        )
    }

    pub fn user_login_with_text(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::UserLoginWithText,
            &["BrokerID", "UserID", "Password", "UserProductInfo", "Text"],
            fields,
        )
    }

    pub fn user_login_with_otp(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::UserLoginWithOtp,
            &["BrokerID", "UserID", "Password", "UserProductInfo", "OTPPassword"],
            fields,
        )
    }

    /// Submit a new order.
    pub fn order_insert(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::OrderInsert,
            &[
                "BrokerID",
                "InvestorID",
                "InstrumentID",
                "ExchangeID",
                "OrderRef",
                "Direction",
                "CombOffsetFlag",
                "LimitPrice",
                "VolumeTotalOriginal",
            ],
            fields,
        )
    }

    /// Cancel or modify an existing order.
    pub fn order_action(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::OrderAction,
            &[
                "BrokerID",
                "InvestorID",
                "InstrumentID",
                "ExchangeID",
                "OrderRef",
                "OrderSysID",
            ],
            fields,
        )
    }

    pub fn parked_order_insert(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::ParkedOrderInsert,
            &[
                "BrokerID",
                "InvestorID",
                "InstrumentID",
                "ExchangeID",
                "Direction",
                "CombOffsetFlag",
                "LimitPrice",
                "VolumeTotalOriginal",
            ],
            fields,
        )
    }

    pub fn parked_order_action(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::ParkedOrderAction,
            &[
                "BrokerID",
                "InvestorID",
                "InstrumentID",
                "ExchangeID",
                "OrderRef",
                "OrderSysID",
            ],
            fields,
        )
    }

    pub fn remove_parked_order(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::RemoveParkedOrder,
            &["BrokerID", "InvestorID", "ParkedOrderID"],
            fields,
        )
    }

    pub fn remove_parked_order_action(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::RemoveParkedOrderAction,
            &["BrokerID", "InvestorID", "ParkedOrderActionID"],
            fields,
        )
    }

    pub fn settlement_info_confirm(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::SettlementInfoConfirm,
            &["BrokerID", "InvestorID"],
            fields,
        )
    }

    pub fn qry_max_order_volume(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::QryMaxOrderVolume,
            &["BrokerID", "InvestorID", "InstrumentID"],
            fields,
        )
    }

    pub fn qry_order(&self, fields: &Value) -> Option<i32> {
        self.request(RequestKind::QryOrder, &["BrokerID", "InvestorID"], fields)
    }

    pub fn qry_trade(&self, fields: &Value) -> Option<i32> {
        self.request(RequestKind::QryTrade, &["BrokerID", "InvestorID"], fields)
    }

    pub fn qry_investor_position(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::QryInvestorPosition,
            &["BrokerID", "InvestorID", "InstrumentID"],
            fields,
        )
    }

    pub fn qry_trading_account(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::QryTradingAccount,
            &["BrokerID", "InvestorID"],
            fields,
        )
    }

    pub fn qry_settlement_info(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::QrySettlementInfo,
            &["BrokerID", "InvestorID"],
            fields,
        )
    }

    /// All fields optional — an empty record queries every instrument.
    pub fn qry_instrument(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::QryInstrument,
            &["ExchangeID", "InstrumentID"],
            fields,
        )
    }

    pub fn qry_depth_market_data(&self, fields: &Value) -> Option<i32> {
        self.request(
            RequestKind::QryDepthMarketData,
            &["ExchangeID", "InstrumentID"],
            fields,
        )
    }

    /// The generic implementation behind every request method.
    ///
    /// `None` when `fields` is not a JSON object — no submission happens.
    /// Otherwise the engine's synchronous status is passed through
    /// unmodified; 0 means accepted for asynchronous processing, whose
    /// outcome arrives later as an event.
    fn request(&self, kind: RequestKind, field_names: &[&str], fields: &Value) -> Option<i32> {
        let obj = fields.as_object()?;

        let mut req = RequestRecord::new(kind);
        for name in field_names {
            if let Some(value) = obj.get(*name) {
                req.set_field(name, value);
            }
        }

        Some(self.engine.submit(&req, self.next_request_id()))
    }

    /// Allocate the next request id. Wraps on overflow; the engine only uses
    /// it for correlation.
    fn next_request_id(&self) -> i32 {
        self.request_seq.fetch_add(1, Ordering::Relaxed)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.sink.push_quit();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err() {
                error!("[{}] event loop thread panicked during teardown", self.label);
            }
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.engine.release();
        info!("[{}] session destroyed", self.label);
    }
}

/// Truncate a registration key to [`MAX_EVENT_NAME_LEN`] bytes, backing off
/// to the nearest character boundary.
fn bounded_event_name(name: &str) -> String {
    if name.len() <= MAX_EVENT_NAME_LEN {
        return name.to_string();
    }
    let mut end = MAX_EVENT_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::CallbackRuntime;
    use crate::sim::{SimEngine, SimProbe};
    use ftg_core::{EventKind, EventPayload, read_field};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, mpsc};
    use std::time::Duration;

    fn test_config() -> SessionConfig {
        SessionConfig::new("/tmp/flow/", "tcp://127.0.0.1:17001")
    }

    fn connect_sim(sim: SimEngine) -> (Session, SimProbe, RuntimeHandle) {
        let (runtime, _join) = CallbackRuntime::spawn().unwrap();
        let probe = sim.probe();
        let session = Session::connect(&test_config(), runtime.clone(), move |_flow| {
            Ok(Box::new(sim) as Box<dyn EngineApi>)
        })
        .unwrap();
        (session, probe, runtime)
    }

    #[test]
    fn construction_wires_the_engine() {
        let sim = SimEngine::new("unused");
        let (session, probe, _runtime) = connect_sim(sim);

        assert_eq!(probe.flow_path(), "unused");
        assert_eq!(probe.front_addr().as_deref(), Some("tcp://127.0.0.1:17001"));
        assert_eq!(probe.public_topic(), Some(ResumePolicy::Quick));
        assert_eq!(probe.private_topic(), Some(ResumePolicy::Quick));
        assert!(probe.inited());
        assert!(!probe.released());

        drop(session);
        assert!(probe.released());
    }

    #[test]
    fn engine_failure_unwinds_the_worker() {
        let (runtime, _join) = CallbackRuntime::spawn().unwrap();
        let result = Session::connect(&test_config(), runtime, |_flow| {
            Err(GatewayError::Engine("front unreachable".to_string()))
        });
        let err = match result {
            Err(e) => e,
            Ok(_) => panic!("expected construction to fail"),
        };
        match err {
            GatewayError::Engine(msg) => assert_eq!(msg, "front unreachable"),
            other => panic!("unexpected error: {other:?}"),
        }
        // reaching here without hanging means the worker was joined
    }

    #[test]
    fn api_version_passthrough() {
        let (session, _probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());
        assert_eq!(session.api_version(), SimEngine::VERSION);
    }

    #[test]
    fn front_connected_reaches_its_handler_first() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let (tx, rx) = mpsc::channel();
        let other_count = Arc::new(AtomicUsize::new(0));
        let other_count2 = Arc::clone(&other_count);
        session
            .on("FrontConnected", move |e: &Event| {
                tx.send((e.kind, e.is_last)).unwrap();
            })
            .on("RspUserLogin", move |_e: &Event| {
                other_count2.fetch_add(1, Ordering::SeqCst);
            });

        probe.raise(Event::unsolicited(
            EventKind::FrontConnected,
            EventPayload::None,
        ));

        let (kind, is_last) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(kind, EventKind::FrontConnected);
        assert!(is_last);
        assert_eq!(other_count.load(Ordering::SeqCst), 0);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err()); // exactly once
    }

    #[test]
    fn order_insert_populates_named_fields_and_zero_fills_the_rest() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let status = session.order_insert(&json!({
            "BrokerID": "9999",
            "InvestorID": "inv1",
            "InstrumentID": "IF2309",
        }));
        assert_eq!(status, Some(0));

        let submits = probe.submits();
        assert_eq!(submits.len(), 1);
        let req = &submits[0].record;
        assert_eq!(req.kind, RequestKind::OrderInsert);
        assert_eq!(read_field(&req.broker_id), "9999");
        assert_eq!(read_field(&req.investor_id), "inv1");
        assert_eq!(read_field(&req.instrument_id), "IF2309");
        assert_eq!(read_field(&req.user_id), "");
        assert_eq!(read_field(&req.order_ref), "");
        assert_eq!(req.direction, 0);
        assert_eq!(req.limit_price, 0.0);
        assert_eq!(req.volume_total_original, 0);
    }

    #[test]
    fn malformed_input_is_a_silent_no_op() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        assert_eq!(session.order_insert(&json!(42)), None);
        assert_eq!(session.user_login(&json!(null)), None);
        assert_eq!(session.qry_order(&json!(["BrokerID", "9999"])), None);
        assert_eq!(session.authenticate(&json!("BrokerID")), None);
        assert!(probe.submits().is_empty());
    }

    #[test]
    fn synchronous_rejection_passes_through() {
        let sim = SimEngine::new("f").without_front_event().with_status(-3);
        let (session, probe, _runtime) = connect_sim(sim);

        let status = session.user_login(&json!({"BrokerID": "9999", "UserID": "u1"}));
        assert_eq!(status, Some(-3));
        assert_eq!(probe.submits().len(), 1);
    }

    #[test]
    fn request_ids_increase_per_submission() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        session.qry_order(&json!({"BrokerID": "9999"}));
        session.qry_trade(&json!({"BrokerID": "9999"}));
        session.qry_trading_account(&json!({"BrokerID": "9999"}));

        let ids: Vec<i32> = probe.submits().iter().map(|s| s.request_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn login_response_is_dispatched_with_correlation_id() {
        let (session, _probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let (tx, rx) = mpsc::channel();
        session.on("RspUserLogin", move |e: &Event| {
            tx.send(e.clone()).unwrap();
        });

        let status = session.user_login(&json!({
            "BrokerID": "9999",
            "UserID": "u1",
            "Password": "pw",
        }));
        assert_eq!(status, Some(0));

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.kind, EventKind::RspUserLogin);
        assert_eq!(event.request_id, 1);
        assert!(event.is_last);
        match &event.payload {
            EventPayload::UserLogin(info) => {
                assert_eq!(info.broker_id, "9999");
                assert_eq!(info.user_id, "u1");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn last_registration_wins_and_releases_the_loser() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let a_alive = Arc::new(());
        let a_count = Arc::new(AtomicUsize::new(0));
        {
            let a_alive = Arc::clone(&a_alive);
            let a_count = Arc::clone(&a_count);
            session.on("RtnOrder", move |_e: &Event| {
                let _ = &a_alive;
                a_count.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(Arc::strong_count(&a_alive), 2);

        let (tx, rx) = mpsc::channel();
        session.on("RtnOrder", move |_e: &Event| {
            tx.send(()).unwrap();
        });
        // handler A dropped on re-registration
        assert_eq!(Arc::strong_count(&a_alive), 1);

        probe.raise(Event::unsolicited(EventKind::RtnOrder, EventPayload::None));
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(a_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn error_responses_carry_the_status_block() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let (tx, rx) = mpsc::channel();
        session.on("RspError", move |e: &Event| {
            tx.send(e.clone()).unwrap();
        });

        probe.raise(Event::new(
            EventKind::RspError,
            9,
            true,
            EventPayload::Rsp(ftg_core::RspInfo::error(12, "insufficient funds")),
        ));

        let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event.request_id, 9);
        match &event.payload {
            EventPayload::Rsp(info) => {
                assert_eq!(info.error_id, 12);
                assert_eq!(info.error_msg, "insufficient funds");
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn unknown_registration_names_are_accepted_and_never_matched() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        session.on("NotARealEventKind", move |_e: &Event| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        probe.raise(Event::unsolicited(EventKind::RtnTrade, EventPayload::None));
        drop(session); // drains the queue
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn teardown_drains_queued_events_then_stops() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        session.on("RtnTrade", move |_e: &Event| {
            count2.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_micros(200));
        });

        for _ in 0..20 {
            probe.raise(Event::unsolicited(EventKind::RtnTrade, EventPayload::None));
        }
        drop(session);

        // quit was queued behind the 20 events, so all of them were
        // dispatched before the loop stopped
        assert_eq!(count.load(Ordering::SeqCst), 20);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn no_dispatch_after_teardown_completes() {
        let (session, probe, _runtime) = connect_sim(SimEngine::new("f").without_front_event());

        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        session.on("RtnTrade", move |_e: &Event| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        drop(session);
        probe.raise(Event::unsolicited(EventKind::RtnTrade, EventPayload::None));
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dead_runtime_makes_the_session_inert_but_droppable() {
        let (runtime, handle) = CallbackRuntime::new();
        drop(runtime);

        let sim = SimEngine::new("f").without_front_event();
        let probe = sim.probe();
        let session = Session::connect(&test_config(), handle, move |_flow| {
            Ok(Box::new(sim) as Box<dyn EngineApi>)
        })
        .unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::clone(&count);
        session.on("RtnTrade", move |_e: &Event| {
            count2.fetch_add(1, Ordering::SeqCst);
        });

        probe.raise(Event::unsolicited(EventKind::RtnTrade, EventPayload::None));
        drop(session); // must not hang even though the loop died early
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(probe.released());
    }

    #[test]
    fn registration_key_is_truncated_at_64_bytes() {
        let long = "K".repeat(80);
        assert_eq!(bounded_event_name(&long).len(), 64);
        assert_eq!(bounded_event_name("RtnOrder"), "RtnOrder");

        // multi-byte char straddling the cap backs off to a boundary
        let tricky = format!("{}é", "a".repeat(63));
        assert_eq!(bounded_event_name(&tricky), "a".repeat(63));
    }
}
