//! Frame schedulers driving the reveal animation
//!
//! A scheduler owns at most one run. Starting a run cancels the previous one.
//! Every run reports the elapsed fraction of its duration through `on_tick`,
//! starting at `0.0` and always finishing with exactly `1.0` unless cancelled.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

/// Tick callback receiving the elapsed fraction in `[0, 1]`
pub type TickFn = Arc<dyn Fn(f64) + Send + Sync>;

/// Identifies one animation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunHandle(u64);

impl RunHandle {
    /// Handle for schedulers implemented outside this crate
    #[inline]
    #[must_use]
    pub fn from_sequence(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Raw sequence number
    #[inline]
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Source of animation frames
pub trait FrameScheduler: Send + Sync {
    /// Start a run of `duration`, cancelling any run in progress
    fn start(&self, duration: Duration, on_tick: TickFn) -> RunHandle;

    /// Stop a run; no further ticks are delivered for it
    fn cancel(&self, handle: RunHandle);

    /// Whether the run is still delivering ticks
    fn is_active(&self, handle: RunHandle) -> bool;
}

fn fraction_of(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

struct ActiveRun {
    handle: RunHandle,
    task: JoinHandle<()>,
}

/// Wall-clock scheduler ticking on a tokio interval
///
/// Outside a tokio runtime a run completes immediately with a single tick of
/// `1.0`.
pub struct TokioFrameScheduler {
    frame_interval: Duration,
    next_sequence: AtomicU64,
    active: Arc<Mutex<Option<ActiveRun>>>,
}

impl TokioFrameScheduler {
    /// Create scheduler ticking every `frame_interval`
    #[must_use]
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            next_sequence: AtomicU64::new(1),
            active: Arc::new(Mutex::new(None)),
        }
    }

    fn next_handle(&self) -> RunHandle {
        RunHandle(self.next_sequence.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Debug for TokioFrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioFrameScheduler")
            .field("frame_interval", &self.frame_interval)
            .field("active", &self.active.lock().as_ref().map(|run| run.handle))
            .finish()
    }
}

impl FrameScheduler for TokioFrameScheduler {
    fn start(&self, duration: Duration, on_tick: TickFn) -> RunHandle {
        let handle = self.next_handle();
        let mut slot = self.active.lock();
        if let Some(previous) = slot.take() {
            previous.task.abort();
            debug!(previous = previous.handle.0, "superseded animation run");
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no tokio runtime; completing animation immediately");
            drop(slot);
            on_tick(1.0);
            return handle;
        };

        let frame_interval = self.frame_interval;
        let active = Arc::clone(&self.active);
        let task = runtime.spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let fraction = fraction_of(started.elapsed(), duration);
                trace!(run = handle.0, fraction, "frame");
                on_tick(fraction);
                if fraction >= 1.0 {
                    break;
                }
            }
            let mut slot = active.lock();
            if slot.as_ref().is_some_and(|run| run.handle == handle) {
                *slot = None;
            }
        });
        *slot = Some(ActiveRun { handle, task });
        handle
    }

    fn cancel(&self, handle: RunHandle) {
        let mut slot = self.active.lock();
        if slot.as_ref().is_some_and(|run| run.handle == handle) {
            if let Some(run) = slot.take() {
                run.task.abort();
                debug!(run = handle.0, "cancelled animation run");
            }
        }
    }

    fn is_active(&self, handle: RunHandle) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|run| run.handle == handle && !run.task.is_finished())
    }
}

impl Drop for TokioFrameScheduler {
    fn drop(&mut self) {
        if let Some(run) = self.active.lock().take() {
            run.task.abort();
        }
    }
}

struct ManualRun {
    handle: RunHandle,
    duration: Duration,
    elapsed: Duration,
    on_tick: TickFn,
}

#[derive(Default)]
struct ManualState {
    next_sequence: u64,
    active: Option<ManualRun>,
}

/// Deterministic scheduler advanced by hand
///
/// `start` delivers the `0.0` tick synchronously. Each [`advance`] delivers
/// one tick. Used by tests and by hosts that own their render loop.
///
/// [`advance`]: ManualFrameScheduler::advance
#[derive(Default)]
pub struct ManualFrameScheduler {
    state: Mutex<ManualState>,
}

impl ManualFrameScheduler {
    /// Create idle scheduler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the active run forward by `elapsed` and deliver one tick
    ///
    /// Returns the delivered fraction, or `None` when no run is active.
    pub fn advance(&self, elapsed: Duration) -> Option<f64> {
        let (fraction, on_tick) = {
            let mut state = self.state.lock();
            let run = state.active.as_mut()?;
            run.elapsed = run.elapsed.saturating_add(elapsed);
            let fraction = fraction_of(run.elapsed, run.duration);
            let on_tick = Arc::clone(&run.on_tick);
            if fraction >= 1.0 {
                state.active = None;
            }
            (fraction, on_tick)
        };
        on_tick(fraction);
        Some(fraction)
    }

    /// Advance until the active run completes
    pub fn finish(&self) {
        let remaining = {
            let state = self.state.lock();
            match state.active.as_ref() {
                Some(run) => run.duration.saturating_sub(run.elapsed),
                None => return,
            }
        };
        self.advance(remaining);
    }

    /// Handle of the run in progress
    #[must_use]
    pub fn active_handle(&self) -> Option<RunHandle> {
        self.state.lock().active.as_ref().map(|run| run.handle)
    }
}

impl std::fmt::Debug for ManualFrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualFrameScheduler")
            .field("active", &self.active_handle())
            .finish()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn start(&self, duration: Duration, on_tick: TickFn) -> RunHandle {
        let handle = {
            let mut state = self.state.lock();
            state.next_sequence += 1;
            let handle = RunHandle(state.next_sequence);
            state.active = Some(ManualRun {
                handle,
                duration,
                elapsed: Duration::ZERO,
                on_tick: Arc::clone(&on_tick),
            });
            handle
        };
        on_tick(0.0);
        handle
    }

    fn cancel(&self, handle: RunHandle) {
        let mut state = self.state.lock();
        if state.active.as_ref().is_some_and(|run| run.handle == handle) {
            state.active = None;
        }
    }

    fn is_active(&self, handle: RunHandle) -> bool {
        self.active_handle() == Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<f64>>>, TickFn) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, Arc::new(move |fraction| sink.lock().push(fraction)))
    }

    #[test]
    fn manual_run_ticks_to_exactly_one() {
        let scheduler = ManualFrameScheduler::new();
        let (seen, on_tick) = recorder();
        let handle = scheduler.start(Duration::from_secs(4), on_tick);

        assert!(scheduler.is_active(handle));
        assert_eq!(scheduler.advance(Duration::from_secs(1)), Some(0.25));
        scheduler.advance(Duration::from_secs(8));
        assert!(!scheduler.is_active(handle));
        assert_eq!(scheduler.advance(Duration::from_millis(1)), None);

        assert_eq!(*seen.lock(), vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn manual_start_supersedes_previous_run() {
        let scheduler = ManualFrameScheduler::new();
        let (first_seen, first) = recorder();
        let (second_seen, second) = recorder();

        let old = scheduler.start(Duration::from_millis(100), first);
        let new = scheduler.start(Duration::from_millis(100), second);
        scheduler.finish();

        assert!(old < new);
        assert_eq!(*first_seen.lock(), vec![0.0]);
        assert_eq!(*second_seen.lock(), vec![0.0, 1.0]);
    }

    #[test]
    fn manual_cancel_stops_ticks() {
        let scheduler = ManualFrameScheduler::new();
        let (seen, on_tick) = recorder();
        let handle = scheduler.start(Duration::from_millis(100), on_tick);
        scheduler.cancel(handle);

        assert_eq!(scheduler.advance(Duration::from_millis(50)), None);
        assert_eq!(*seen.lock(), vec![0.0]);
    }

    #[test]
    fn tokio_scheduler_without_runtime_completes_immediately() {
        let scheduler = TokioFrameScheduler::new(Duration::from_millis(16));
        let (seen, on_tick) = recorder();
        let handle = scheduler.start(Duration::from_secs(2), on_tick);

        assert!(!scheduler.is_active(handle));
        assert_eq!(*seen.lock(), vec![1.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_run_ends_at_one() {
        let scheduler = TokioFrameScheduler::new(Duration::from_millis(16));
        let (seen, on_tick) = recorder();
        let handle = scheduler.start(Duration::from_millis(100), on_tick);

        tokio::time::sleep(Duration::from_millis(500)).await;

        let seen = seen.lock().clone();
        assert!(!scheduler.is_active(handle));
        assert_eq!(seen.first().copied(), Some(0.0));
        assert_eq!(seen.last().copied(), Some(1.0));
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_cancel_aborts_run() {
        let scheduler = TokioFrameScheduler::new(Duration::from_millis(16));
        let (seen, on_tick) = recorder();
        let handle = scheduler.start(Duration::from_millis(1000), on_tick);

        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.cancel(handle);
        let ticks_at_cancel = seen.lock().len();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert!(!scheduler.is_active(handle));
        assert_eq!(seen.lock().len(), ticks_at_cancel);
        assert!(seen.lock().iter().all(|&fraction| fraction < 1.0));
    }
}
