//! Concurrent, streaming conversion of a workspace.
//!
//! Units are enumerated up front in project-declaration order and handed to a
//! bounded rayon pool. Each worker translates one unit, folds every failure
//! into that unit's diagnostics and pushes the finished outcome onto a
//! bounded channel. The [`OutcomeStream`] returned to the caller reads that
//! channel, so outcomes arrive in completion order, not enumeration order.
//! Progress is handed to a separate delivery thread after the outcome is sent.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, sync_channel};
use std::thread::JoinHandle;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio_util::sync::CancellationToken;

use super::progress::ProgressRelay;
use super::{ProgressSink, TranslateError, Translator, TranslationOutcome};
use crate::base::constants::WORKER_THREAD_PREFIX;
use crate::base::{BomDetector, Encoding, EncodingDetector};
use crate::config::ConversionOptions;
use crate::error::ConvertError;
use crate::project::{Language, ProjectInfo, TranslatableUnit, Workspace};

/// Drives a [`Translator`] over the selected projects of a workspace.
pub struct ConversionOrchestrator<'w> {
    workspace: &'w Workspace,
    translator: Arc<dyn Translator>,
    detector: Arc<dyn EncodingDetector>,
    options: ConversionOptions,
}

impl<'w> ConversionOrchestrator<'w> {
    pub fn new(workspace: &'w Workspace, translator: Arc<dyn Translator>) -> Self {
        Self {
            workspace,
            translator,
            detector: Arc::new(BomDetector),
            options: ConversionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_detector(mut self, detector: Arc<dyn EncodingDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn workspace(&self) -> &Workspace {
        self.workspace
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Start converting every unit of the projects accepted by `predicate`.
    ///
    /// Work begins immediately; the returned stream yields outcomes as they
    /// complete. Cancelling `cancel` (or dropping the stream) stops further
    /// outcomes from being yielded. Only infrastructure failures are errors.
    pub fn run<P, S>(
        &self,
        predicate: P,
        target: &Language,
        progress: S,
        cancel: &CancellationToken,
    ) -> Result<OutcomeStream, ConvertError>
    where
        P: Fn(&ProjectInfo) -> bool,
        S: ProgressSink + 'static,
    {
        let units = self.workspace.select_units(predicate);
        let total = units.len();
        let workers = self.options.max_workers.max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("{WORKER_THREAD_PREFIX}-{i}"))
            .panic_handler(|payload| {
                tracing::error!(
                    "Conversion worker panicked: {}",
                    panic_message(payload.as_ref())
                );
            })
            .build()
            .map_err(|e| ConvertError::WorkerPool(e.to_string()))?;

        tracing::info!(
            "Converting {} unit(s) to {} with {} worker(s)",
            total,
            target.name(),
            workers
        );

        let (sender, receiver) = sync_channel(self.options.channel_capacity.max(1));
        let cancel = cancel.child_token();
        let (progress, progress_thread) =
            ProgressRelay::spawn(progress, format!("{WORKER_THREAD_PREFIX}-progress"))
                .map_err(|e| ConvertError::WorkerPool(e.to_string()))?;
        let target = Arc::new(target.clone());

        for unit in units {
            let sender = sender.clone();
            let translator = Arc::clone(&self.translator);
            let detector = Arc::clone(&self.detector);
            let progress = progress.clone();
            let target = Arc::clone(&target);
            let cancel = cancel.clone();

            pool.spawn(move || {
                if cancel.is_cancelled() {
                    return;
                }
                let outcome = translate_unit(&*translator, &*detector, &unit, &target, &cancel);
                if cancel.is_cancelled() {
                    tracing::trace!(
                        "Dropping outcome for {} after cancellation",
                        unit.path.display()
                    );
                    return;
                }
                // The receiver is gone only when the stream was dropped.
                let _ = sender.send(outcome);
                progress.complete();
            });
        }

        Ok(OutcomeStream {
            receiver,
            cancel,
            _pool: pool,
            progress_thread: Some(progress_thread),
            summary: RunSummary {
                enumerated: total,
                ..RunSummary::default()
            },
        })
    }
}

/// Translate one unit, capturing errors and panics as diagnostics.
fn translate_unit(
    translator: &dyn Translator,
    detector: &dyn EncodingDetector,
    unit: &TranslatableUnit,
    target: &Language,
    cancel: &CancellationToken,
) -> TranslationOutcome {
    tracing::trace!("Translating {}", unit.path.display());

    let encoding = match guarded(|| detector.detect(&unit.path)) {
        Ok(Ok(encoding)) => encoding,
        Ok(Err(e)) => {
            tracing::warn!("Cannot read {}: {e}", unit.path.display());
            return TranslationOutcome::failed(
                &unit.path,
                Encoding::default(),
                [format!("Failed to read source file: {e}")],
            );
        }
        Err(payload) => {
            return TranslationOutcome::failed(
                &unit.path,
                Encoding::default(),
                [format!(
                    "Encoding detection panicked: {}",
                    panic_message(payload.as_ref())
                )],
            );
        }
    };

    let outcome = match guarded(|| translator.translate(unit, target, cancel)) {
        Ok(Ok(translation)) => {
            TranslationOutcome::from_translation(&unit.path, translation, encoding)
        }
        Ok(Err(TranslateError::Cancelled)) => {
            TranslationOutcome::failed(&unit.path, encoding, ["Translation cancelled"])
        }
        Ok(Err(e)) => TranslationOutcome::failed(&unit.path, encoding, [e.to_string()]),
        Err(payload) => TranslationOutcome::failed(
            &unit.path,
            encoding,
            [format!("Translator panicked: {}", panic_message(payload.as_ref()))],
        ),
    };

    if !outcome.is_success() {
        tracing::warn!(
            "Translation of {} reported {} diagnostic(s)",
            unit.path.display(),
            outcome.diagnostics.len()
        );
    }
    outcome
}

fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, Box<dyn Any + Send>> {
    panic::catch_unwind(AssertUnwindSafe(f))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

// ============================================================================
// OUTCOME STREAM
// ============================================================================

/// Counts observed while draining an [`OutcomeStream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Units enumerated from the selected projects.
    pub enumerated: usize,
    /// Outcomes yielded so far.
    pub yielded: usize,
    /// Yielded outcomes carrying diagnostics.
    pub failed: usize,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.yielded - self.failed
    }

    /// Units that never produced an outcome (cancellation, or not drained yet).
    pub fn unfinished(&self) -> usize {
        self.enumerated.saturating_sub(self.yielded)
    }
}

/// Lazy, completion-ordered sequence of outcomes from one run.
///
/// Owns the worker pool. Dropping the stream cancels any work that has not
/// started and releases the pool once in-flight units finish.
pub struct OutcomeStream {
    receiver: Receiver<TranslationOutcome>,
    cancel: CancellationToken,
    _pool: ThreadPool,
    progress_thread: Option<JoinHandle<()>>,
    summary: RunSummary,
}

impl OutcomeStream {
    /// Counts so far. Final once the stream has returned `None`.
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Stop the run. Outcomes already yielded stay valid.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the last progress count once every worker has finished.
    fn finish_progress(&mut self) {
        if let Some(handle) = self.progress_thread.take() {
            if handle.join().is_err() {
                tracing::warn!("Progress delivery thread panicked");
            }
        }
    }
}

impl Iterator for OutcomeStream {
    type Item = TranslationOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancel.is_cancelled() {
            return None;
        }
        let Ok(outcome) = self.receiver.recv() else {
            self.finish_progress();
            return None;
        };
        if self.cancel.is_cancelled() {
            return None;
        }
        self.summary.yielded += 1;
        if !outcome.is_success() {
            self.summary.failed += 1;
        }
        if self.summary.yielded == self.summary.enumerated {
            tracing::info!(
                "Conversion finished: {} succeeded, {} failed",
                self.summary.succeeded(),
                self.summary.failed
            );
        }
        Some(outcome)
    }
}

impl Drop for OutcomeStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
