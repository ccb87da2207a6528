//! Handler table and the session event loop.
//!
//! The event loop is the queue's single consumer. For each event it looks up
//! the handler registered under the kind's name and invokes it through the
//! callback runtime's blocking cross-context call, so handler execution is
//! strictly serialized and the event's resources are released only after the
//! invocation has completed. The loop runs until the quit sentinel is
//! observed or the runtime goes away.

use std::sync::{Arc, Mutex, PoisonError};

use ahash::AHashMap;
use crossbeam_channel::Receiver;
use ftg_core::{Event, EventKind, cpu_affinity};
use tracing::{info, trace, warn};

use crate::runtime::RuntimeHandle;

/// A registered event handler. Held strongly by the table so it outlives the
/// caller's own references; invoked on the callback runtime thread.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Kind-name → handler table. Mutated from the owning context (`Session::on`),
/// read from the event loop thread.
pub type HandlerTable = Arc<Mutex<AHashMap<String, Handler>>>;

/// Create an empty handler table.
pub fn handler_table() -> HandlerTable {
    Arc::new(Mutex::new(AHashMap::new()))
}

/// Look up the handler for an event kind, if one is registered.
pub(crate) fn lookup(table: &HandlerTable, name: &str) -> Option<Handler> {
    table
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// Run the session event loop on the calling thread.
///
/// Returns when the quit sentinel is observed, when every
/// [`EventSink`](crate::queue::EventSink) is gone, or when a cross-context
/// call fails — the latter is fatal for the session: remaining events are
/// never dispatched.
pub(crate) fn run_event_loop(
    label: &str,
    rx: Receiver<Event>,
    handlers: HandlerTable,
    runtime: RuntimeHandle,
    cpu_core: Option<i32>,
) {
    cpu_affinity::maybe_bind(cpu_core);
    info!("[{label}] event loop started");

    while let Ok(event) = rx.recv() {
        if event.kind == EventKind::Quit {
            break;
        }

        let name = event.kind.name();
        let Some(handler) = lookup(&handlers, name) else {
            trace!("[{label}] no handler for {name}, event dropped");
            continue;
        };

        let event = Arc::new(event);
        let call = {
            let event = Arc::clone(&event);
            runtime.call_blocking(move || (*handler)(&event))
        };
        if call.is_err() {
            warn!("[{label}] callback runtime is gone, stopping event loop");
            break;
        }
        // `event` dropped here: payload resources are released only after the
        // cross-context call has completed.
    }

    info!("[{label}] event loop stopped");
}
