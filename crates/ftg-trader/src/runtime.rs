//! The single-threaded callback runtime and its cross-context call primitive.
//!
//! Registered handlers must never run concurrently with each other or with
//! other work in the embedding context, so every handler invocation is
//! marshaled onto one dedicated runtime thread. [`RuntimeHandle::call_blocking`]
//! enqueues a job and blocks the calling thread until the job has run to
//! completion over there — at most one cross-context call is in flight per
//! caller, which bounds memory growth and serializes event delivery.

use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use thiserror::Error;
use tracing::info;

/// The callback runtime has shut down (or a job was dropped mid-shutdown);
/// no further cross-context calls can complete.
#[derive(Debug, Error)]
#[error("callback runtime is closed")]
pub struct RuntimeClosed;

struct Job {
    run: Box<dyn FnOnce() + Send>,
    done: Sender<()>,
}

/// Sending half — hand one to every thread that needs to call into the
/// runtime. The runtime stops once all handles are dropped.
#[derive(Clone)]
pub struct RuntimeHandle {
    tx: Sender<Job>,
}

impl RuntimeHandle {
    /// Run `job` on the runtime thread and block until it has completed.
    ///
    /// Returns [`RuntimeClosed`] if the runtime is gone. A job that panics
    /// tears the runtime down; the caller observes [`RuntimeClosed`] and all
    /// later calls fail the same way.
    pub fn call_blocking<F>(&self, job: F) -> Result<(), RuntimeClosed>
    where
        F: FnOnce() + Send + 'static,
    {
        let (done_tx, done_rx) = bounded(1);
        self.tx
            .send(Job {
                run: Box::new(job),
                done: done_tx,
            })
            .map_err(|_| RuntimeClosed)?;
        done_rx.recv().map_err(|_| RuntimeClosed)
    }
}

/// The runtime itself — owns the job queue and executes jobs one at a time.
pub struct CallbackRuntime {
    rx: Receiver<Job>,
}

impl CallbackRuntime {
    /// Create a runtime and its first handle. [`run`](Self::run) must be
    /// driven on the thread that should own all handler execution.
    pub fn new() -> (CallbackRuntime, RuntimeHandle) {
        let (tx, rx) = unbounded();
        (CallbackRuntime { rx }, RuntimeHandle { tx })
    }

    /// Execute jobs until every [`RuntimeHandle`] has been dropped.
    pub fn run(self) {
        while let Ok(job) = self.rx.recv() {
            (job.run)();
            let _ = job.done.send(());
        }
        info!("callback runtime stopped");
    }

    /// Convenience: run the runtime on its own dedicated thread.
    pub fn spawn() -> std::io::Result<(RuntimeHandle, thread::JoinHandle<()>)> {
        let (runtime, handle) = Self::new();
        let join = thread::Builder::new()
            .name("callback-runtime".to_string())
            .spawn(move || runtime.run())?;
        Ok((handle, join))
    }
}
