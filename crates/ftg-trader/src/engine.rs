//! The opaque engine SDK boundary.
//!
//! Everything the session needs from the underlying trading engine is behind
//! [`EngineApi`]: connection wiring at construction time, non-blocking request
//! submission while active, and release at teardown. The wire protocol and
//! the engine's internal threading stay on the far side of this trait — the
//! engine delivers events by pushing into the [`EventSink`] it received via
//! [`register_sink`](EngineApi::register_sink), from whatever threads it
//! likes.

use ftg_core::{RequestRecord, ResumePolicy};

use crate::queue::EventSink;

/// Capability set of the engine connection object.
///
/// Wiring methods (`register_sink` through `init`) are called once during
/// session construction, in that order. `submit` may then be called from the
/// owning context; its return value is the engine's immediate synchronous
/// status (0 = accepted for asynchronous processing, nonzero = local
/// rejection such as not-connected or queue-full), unrelated to the
/// asynchronous outcome that arrives later as an event. `release` is called
/// exactly once at teardown.
pub trait EngineApi: Send {
    /// Engine SDK version string.
    fn api_version(&self) -> String;

    /// Hand the engine the sink it must push all events into.
    fn register_sink(&mut self, sink: EventSink);

    /// Subscribe the public topic feed.
    fn subscribe_public_topic(&mut self, policy: ResumePolicy);

    /// Subscribe the private topic feed.
    fn subscribe_private_topic(&mut self, policy: ResumePolicy);

    /// Set the trading front's network endpoint. Passed through unvalidated.
    fn register_front(&mut self, front_addr: &str);

    /// Begin connecting. Connection progress is reported asynchronously
    /// (`FrontConnected` / `FrontDisconnected` events).
    fn init(&mut self);

    /// Submit one request record under the given request id. Non-blocking.
    fn submit(&self, req: &RequestRecord, request_id: i32) -> i32;

    /// Release the engine connection object. No calls are valid afterwards.
    fn release(&mut self);
}
