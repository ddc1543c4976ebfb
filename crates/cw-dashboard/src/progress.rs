//! Reveal animation progress
//!
//! Progress runs from `0` to `1` after every recompute. A restart supersedes
//! the previous run; ticks still in flight from an older run are dropped by
//! generation, so progress never jumps backwards within a run.

use crate::config::{AnimationConfig, Easing};
use crate::scheduler::{FrameScheduler, RunHandle, TickFn};
use cw_chart::Segment;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct ProgressState {
    generation: u64,
    value: f64,
}

/// Drives a `[0, 1]` progress value through a [`FrameScheduler`]
pub struct ProgressController {
    scheduler: Arc<dyn FrameScheduler>,
    duration: Duration,
    easing: Easing,
    state: Arc<Mutex<ProgressState>>,
    run: Mutex<Option<RunHandle>>,
}

impl ProgressController {
    /// Create controller; progress starts at `0`
    pub fn new(scheduler: Arc<dyn FrameScheduler>, animation: &AnimationConfig) -> Self {
        Self {
            scheduler,
            duration: animation.duration(),
            easing: animation.easing,
            state: Arc::new(Mutex::new(ProgressState::default())),
            run: Mutex::new(None),
        }
    }

    /// Reset progress to `0` and start a new run
    pub fn restart(&self) -> RunHandle {
        let mut run = self.run.lock();
        if let Some(previous) = run.take() {
            self.scheduler.cancel(previous);
        }

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.value = 0.0;
            state.generation
        };

        let state = Arc::clone(&self.state);
        let easing = self.easing;
        let on_tick: TickFn = Arc::new(move |fraction| {
            let mut state = state.lock();
            if state.generation != generation {
                return;
            }
            let eased = easing.apply(fraction);
            if eased > state.value {
                state.value = eased;
            }
        });

        let handle = self.scheduler.start(self.duration, on_tick);
        debug!(generation, run = handle.sequence(), "started reveal animation");
        *run = Some(handle);
        handle
    }

    /// Stop the current run and jump to full progress
    pub fn complete(&self) {
        if let Some(previous) = self.run.lock().take() {
            self.scheduler.cancel(previous);
        }
        let mut state = self.state.lock();
        state.generation += 1;
        state.value = 1.0;
    }

    /// Current progress in `[0, 1]`
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.state.lock().value
    }

    /// Whether a run is still delivering ticks
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.run
            .lock()
            .is_some_and(|handle| self.scheduler.is_active(handle))
    }

    /// End angle of `segment` at the current progress
    #[must_use]
    pub fn partial_end_angle(&self, segment: &Segment) -> f64 {
        segment.partial_end_angle(self.progress())
    }
}

impl std::fmt::Debug for ProgressController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressController")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualFrameScheduler;

    fn controller(easing: Easing) -> (Arc<ManualFrameScheduler>, ProgressController) {
        let scheduler = Arc::new(ManualFrameScheduler::new());
        let animation = AnimationConfig {
            duration_ms: 2000,
            frame_interval_ms: 16,
            easing,
        };
        let controller = ProgressController::new(scheduler.clone(), &animation);
        (scheduler, controller)
    }

    #[test]
    fn linear_progress_follows_time() {
        let (scheduler, progress) = controller(Easing::Linear);
        progress.restart();
        assert_eq!(progress.progress(), 0.0);
        assert!(progress.is_animating());

        scheduler.advance(Duration::from_millis(500));
        assert_eq!(progress.progress(), 0.25);

        scheduler.finish();
        assert_eq!(progress.progress(), 1.0);
        assert!(!progress.is_animating());
    }

    #[test]
    fn restart_resets_to_zero() {
        let (scheduler, progress) = controller(Easing::EaseInOut);
        progress.restart();
        scheduler.finish();
        assert_eq!(progress.progress(), 1.0);

        progress.restart();
        assert_eq!(progress.progress(), 0.0);
    }

    #[test]
    fn complete_skips_animation() {
        let (scheduler, progress) = controller(Easing::EaseInOut);
        let handle = progress.restart();
        progress.complete();

        assert_eq!(progress.progress(), 1.0);
        assert!(!scheduler.is_active(handle));
    }

    #[test]
    fn partial_angles_scale_with_progress() {
        let (scheduler, progress) = controller(Easing::Linear);
        let segment = Segment {
            category_key: "Food".into(),
            value: 1.0,
            proportion: 0.5,
            start_angle: 1.0,
            end_angle: 3.0,
            color_index: 0,
        };
        progress.restart();
        assert_eq!(progress.partial_end_angle(&segment), 1.0);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(progress.partial_end_angle(&segment), 2.0);
    }
}
