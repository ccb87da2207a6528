//! Bounded event queue between the engine's callback threads and the session
//! event loop.
//!
//! Many producers (whatever internal threading the engine uses), exactly one
//! consumer (the session's event loop thread). A full queue blocks the
//! producer — backpressure is acceptable, silent loss is not. FIFO order is
//! guaranteed per producer stream, which is what makes the quit sentinel
//! terminal: once pushed, it is observed after everything that producer
//! pushed before it.

use crossbeam_channel::{Receiver, Sender, bounded};
use ftg_core::Event;
use tracing::debug;

pub use ftg_core::config::DEFAULT_QUEUE_DEPTH;

/// Producer side of a session's event queue. Cheap to clone; safe to share
/// across engine threads.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<Event>,
}

impl EventSink {
    /// Enqueue one event, blocking while the queue is full.
    ///
    /// Events pushed after the session has torn down are discarded — the
    /// consumer is gone and the quit sentinel has already been processed.
    pub fn push(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!("event pushed after session teardown, discarded");
        }
    }

    /// Enqueue the quit sentinel terminating the session event loop.
    pub fn push_quit(&self) {
        self.push(Event::quit());
    }
}

/// Create a bounded event queue of the given depth.
pub fn event_queue(depth: usize) -> (EventSink, Receiver<Event>) {
    let (tx, rx) = bounded(depth);
    (EventSink { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftg_core::{EventKind, EventPayload};

    #[test]
    fn fifo_per_producer() {
        let (sink, rx) = event_queue(16);
        for id in 1..=3 {
            sink.push(Event::new(EventKind::RtnTrade, id, true, EventPayload::None));
        }
        sink.push_quit();
        let ids: Vec<i32> = (0..3).map(|_| rx.recv().unwrap().request_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(rx.recv().unwrap().kind, EventKind::Quit);
    }

    #[test]
    fn push_after_consumer_gone_is_silent() {
        let (sink, rx) = event_queue(4);
        drop(rx);
        sink.push(Event::unsolicited(EventKind::FrontConnected, EventPayload::None));
        sink.push_quit(); // no panic
    }

    #[test]
    fn producers_share_one_queue() {
        let (sink, rx) = event_queue(256);
        let mut producers = Vec::new();
        for _ in 0..4 {
            let sink = sink.clone();
            producers.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    sink.push(Event::unsolicited(EventKind::RtnOrder, EventPayload::None));
                }
            }));
        }
        for p in producers {
            p.join().unwrap();
        }
        drop(sink);
        assert_eq!(rx.iter().count(), 200);
    }
}
