//! Advisory progress reporting.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

/// Receives the running count of completed units.
///
/// Called from a dedicated delivery thread, never from a worker, with strictly
/// increasing counts. A slow sink only causes intermediate counts to be
/// skipped; the final count is delivered before a fully drained stream ends.
pub trait ProgressSink: Send + Sync {
    fn report(&self, completed: usize);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _completed: usize) {}
}

impl<F> ProgressSink for F
where
    F: Fn(usize) + Send + Sync,
{
    fn report(&self, completed: usize) {
        self(completed)
    }
}

/// Forwards progress over a bounded channel, dropping updates when it is full.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: SyncSender<usize>,
}

impl ChannelProgress {
    /// Create a sink and the receiver that observes it.
    pub fn bounded(capacity: usize) -> (Self, Receiver<usize>) {
        let (sender, receiver) = sync_channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, completed: usize) {
        match self.sender.try_send(completed) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Progress receiver lagging, dropped update {completed}");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

// ============================================================================
// RELAY
// ============================================================================

/// Worker-side handle that records completions for a [`ProgressSink`].
///
/// Workers only bump a counter and post a wake-up; the sink runs on its own
/// thread. Counts that pile up while the sink is busy are coalesced, so the
/// sink sees a strictly increasing subsequence ending at the final count.
#[derive(Clone)]
pub(super) struct ProgressRelay {
    completed: Arc<Mutex<usize>>,
    wake: SyncSender<()>,
}

impl ProgressRelay {
    /// Start the delivery thread for `sink`.
    pub(super) fn spawn<S>(sink: S, thread_name: String) -> io::Result<(Self, JoinHandle<()>)>
    where
        S: ProgressSink + 'static,
    {
        let completed = Arc::new(Mutex::new(0));
        let (wake, signals) = sync_channel(1);
        let observed = Arc::clone(&completed);
        let handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || deliver(sink, &observed, &signals))?;
        Ok((Self { completed, wake }, handle))
    }

    /// Record one finished unit. Never blocks on the sink.
    pub(super) fn complete(&self) {
        *self.completed.lock() += 1;
        // A full slot means a wake-up is already pending and will see this count.
        let _ = self.wake.try_send(());
    }
}

fn deliver<S: ProgressSink>(sink: S, completed: &Mutex<usize>, signals: &Receiver<()>) {
    let mut reported = 0;
    let mut report_latest = || {
        let latest = *completed.lock();
        if latest <= reported {
            return true;
        }
        reported = latest;
        match panic::catch_unwind(AssertUnwindSafe(|| sink.report(latest))) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!("Progress sink panicked; further progress is discarded");
                false
            }
        }
    };

    while signals.recv().is_ok() {
        if !report_latest() {
            return;
        }
    }
    // Every worker is gone; flush the final count.
    report_latest();
}
