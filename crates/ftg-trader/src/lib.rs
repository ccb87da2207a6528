//! # ftg-trader
//!
//! Trader session for the FTG gateway — the concurrency bridge between the
//! engine SDK's callback threads and a single-threaded callback runtime.
//!
//! ## Architecture
//!
//! ```text
//! engine threads ──► EventSink (bounded queue) ──► event loop thread
//!                                                       │ lookup by kind name
//!                                                       ▼
//!                                          RuntimeHandle::call_blocking
//!                                                       │
//!                                                       ▼
//!                                    callback runtime thread (handlers)
//! ```
//!
//! Outbound control flow is the reverse: facade calls on [`Session`] populate
//! a fixed-width request record and submit it through the [`EngineApi`] with
//! a fresh request id.
//!
//! ## Modules
//!
//! - [`queue`] — bounded event queue between engine threads and the event loop
//! - [`runtime`] — the single-threaded callback runtime and its blocking
//!   cross-context call primitive
//! - [`dispatch`] — handler table and the session event loop
//! - [`engine`] — the opaque engine SDK boundary trait
//! - [`sim`] — deterministic in-process engine for tests and the runner
//! - [`session`] — session lifecycle and the request facade

pub mod dispatch;
pub mod engine;
pub mod queue;
pub mod runtime;
pub mod session;
pub mod sim;

pub use engine::EngineApi;
pub use queue::{EventSink, event_queue};
pub use runtime::{CallbackRuntime, RuntimeHandle};
pub use session::Session;
pub use sim::{SimEngine, SimProbe};
