//! Deterministic in-process engine.
//!
//! Implements [`EngineApi`] without any network or native SDK: every submit
//! is recorded and answered with a configurable synchronous status, `init`
//! raises `FrontConnected`, and a successful login submit is echoed back as
//! an `RspUserLogin` event. Used by the unit tests and by the runner when no
//! real engine is linked in.
//!
//! [`SimProbe`] is the inspection side: take one via [`SimEngine::probe`]
//! before handing the engine to a session, then assert on recorded submits
//! or raise events as if they came from an engine thread.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use ftg_core::{
    Event, EventKind, EventPayload, RequestKind, RequestRecord, ResumePolicy, UserLoginInfo,
    read_field,
};
use tracing::debug;

use crate::engine::EngineApi;
use crate::queue::EventSink;

/// One recorded submit call.
#[derive(Debug, Clone)]
pub struct SubmitRecord {
    pub record: RequestRecord,
    pub request_id: i32,
}

#[derive(Default)]
struct SimState {
    flow_path: Mutex<String>,
    front_addr: Mutex<Option<String>>,
    public_topic: Mutex<Option<ResumePolicy>>,
    private_topic: Mutex<Option<ResumePolicy>>,
    sink: Mutex<Option<EventSink>>,
    submits: Mutex<Vec<SubmitRecord>>,
    inited: AtomicBool,
    released: AtomicBool,
}

fn locked<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deterministic engine double.
pub struct SimEngine {
    state: Arc<SimState>,
    status: i32,
    front_event_on_init: bool,
}

impl SimEngine {
    /// Version string reported by [`EngineApi::api_version`].
    pub const VERSION: &'static str = "1.0.0-sim";

    pub fn new(flow_path: &str) -> Self {
        let state = Arc::new(SimState::default());
        *locked(&state.flow_path) = flow_path.to_string();
        Self {
            state,
            status: 0,
            front_event_on_init: true,
        }
    }

    /// Make every submit return `status` instead of 0.
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Do not raise `FrontConnected` from `init` — tests that need a
    /// deterministic registration-then-event order raise it via the probe.
    pub fn without_front_event(mut self) -> Self {
        self.front_event_on_init = false;
        self
    }

    /// Inspection handle sharing this engine's recorded state.
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            state: Arc::clone(&self.state),
        }
    }

    fn raise(&self, event: Event) {
        if let Some(sink) = locked(&self.state.sink).clone() {
            sink.push(event);
        }
    }
}

impl EngineApi for SimEngine {
    fn api_version(&self) -> String {
        Self::VERSION.to_string()
    }

    fn register_sink(&mut self, sink: EventSink) {
        *locked(&self.state.sink) = Some(sink);
    }

    fn subscribe_public_topic(&mut self, policy: ResumePolicy) {
        *locked(&self.state.public_topic) = Some(policy);
    }

    fn subscribe_private_topic(&mut self, policy: ResumePolicy) {
        *locked(&self.state.private_topic) = Some(policy);
    }

    fn register_front(&mut self, front_addr: &str) {
        *locked(&self.state.front_addr) = Some(front_addr.to_string());
    }

    fn init(&mut self) {
        self.state.inited.store(true, Ordering::SeqCst);
        if self.front_event_on_init {
            self.raise(Event::unsolicited(
                EventKind::FrontConnected,
                EventPayload::None,
            ));
        }
    }

    fn submit(&self, req: &RequestRecord, request_id: i32) -> i32 {
        locked(&self.state.submits).push(SubmitRecord {
            record: req.clone(),
            request_id,
        });
        debug!("sim engine: submit {:?} request_id={request_id}", req.kind);

        if self.status == 0 && req.kind == RequestKind::UserLogin {
            self.raise(Event::new(
                EventKind::RspUserLogin,
                request_id,
                true,
                EventPayload::UserLogin(UserLoginInfo {
                    trading_day: "20260806".to_string(),
                    login_time: "09:00:00".to_string(),
                    broker_id: read_field(&req.broker_id).to_string(),
                    user_id: read_field(&req.user_id).to_string(),
                    front_id: 1,
                    session_id: 1,
                    max_order_ref: "1".to_string(),
                }),
            ));
        }

        self.status
    }

    fn release(&mut self) {
        self.state.released.store(true, Ordering::SeqCst);
    }
}

/// Inspection handle onto a [`SimEngine`]'s recorded state. Stays valid after
/// the engine has been moved into a session.
pub struct SimProbe {
    state: Arc<SimState>,
}

impl SimProbe {
    pub fn flow_path(&self) -> String {
        locked(&self.state.flow_path).clone()
    }

    pub fn front_addr(&self) -> Option<String> {
        locked(&self.state.front_addr).clone()
    }

    pub fn public_topic(&self) -> Option<ResumePolicy> {
        *locked(&self.state.public_topic)
    }

    pub fn private_topic(&self) -> Option<ResumePolicy> {
        *locked(&self.state.private_topic)
    }

    pub fn inited(&self) -> bool {
        self.state.inited.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> bool {
        self.state.released.load(Ordering::SeqCst)
    }

    /// Snapshot of every submit recorded so far.
    pub fn submits(&self) -> Vec<SubmitRecord> {
        locked(&self.state.submits).clone()
    }

    /// Push an event into the session's queue, as an engine thread would.
    pub fn raise(&self, event: Event) {
        if let Some(sink) = locked(&self.state.sink).clone() {
            sink.push(event);
        }
    }
}
