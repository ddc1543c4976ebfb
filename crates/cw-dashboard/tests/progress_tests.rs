//! Reveal animation timing and run replacement

use cw_dashboard::{
    AnimationConfig, Dashboard, DashboardConfig, Easing, FrameScheduler, ProgressController,
    RunHandle, TickFn,
};
use cw_test_utils::{owner, scenario_records, seeded_store};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Keeps every run's callback so stale ticks can be replayed by hand
#[derive(Default)]
struct RecordingScheduler {
    runs: Mutex<Vec<TickFn>>,
}

impl RecordingScheduler {
    fn tick(&self, run: usize, fraction: f64) {
        let on_tick = Arc::clone(&self.runs.lock()[run]);
        on_tick(fraction);
    }
}

impl FrameScheduler for RecordingScheduler {
    fn start(&self, _duration: Duration, on_tick: TickFn) -> RunHandle {
        let mut runs = self.runs.lock();
        runs.push(on_tick);
        RunHandle::from_sequence(u64::try_from(runs.len()).unwrap())
    }

    fn cancel(&self, _handle: RunHandle) {}

    fn is_active(&self, _handle: RunHandle) -> bool {
        false
    }
}

fn linear() -> AnimationConfig {
    AnimationConfig {
        duration_ms: 2000,
        frame_interval_ms: 16,
        easing: Easing::Linear,
    }
}

#[test]
fn ticks_from_superseded_run_are_ignored() {
    let scheduler = Arc::new(RecordingScheduler::default());
    let progress = ProgressController::new(scheduler.clone(), &linear());

    progress.restart();
    scheduler.tick(0, 0.6);
    assert_eq!(progress.progress(), 0.6);

    progress.restart();
    assert_eq!(progress.progress(), 0.0);

    scheduler.tick(0, 0.9);
    assert_eq!(progress.progress(), 0.0);

    scheduler.tick(1, 0.25);
    assert_eq!(progress.progress(), 0.25);
}

#[test]
fn progress_never_moves_backwards_within_a_run() {
    let scheduler = Arc::new(RecordingScheduler::default());
    let progress = ProgressController::new(scheduler.clone(), &linear());

    progress.restart();
    scheduler.tick(0, 0.75);
    scheduler.tick(0, 0.5);
    assert_eq!(progress.progress(), 0.75);
}

#[tokio::test(start_paused = true)]
async fn wall_clock_reveal_reaches_one() {
    let mut dashboard = Dashboard::new(
        owner(),
        Arc::new(seeded_store(scenario_records())),
        DashboardConfig::default(),
    )
    .unwrap();
    dashboard.load().await.unwrap();
    assert_eq!(dashboard.progress().progress(), 0.0);
    assert!(dashboard.progress().is_animating());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    let midway = dashboard.progress().progress();
    assert!(midway > 0.0 && midway < 1.0, "midway progress {midway}");

    let segment = dashboard.snapshot().segments[0].clone();
    let partial = dashboard.progress().partial_end_angle(&segment);
    assert!(partial > segment.start_angle && partial < segment.end_angle);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(dashboard.progress().progress(), 1.0);
    assert!(!dashboard.progress().is_animating());
    assert_eq!(dashboard.view().arcs[0].end_angle, segment.end_angle);
}

#[tokio::test(start_paused = true)]
async fn refresh_restarts_from_zero_and_stays_monotonic() {
    let mut dashboard = Dashboard::new(
        owner(),
        Arc::new(seeded_store(scenario_records())),
        DashboardConfig::default(),
    )
    .unwrap();
    dashboard.load().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(dashboard.progress().progress() > 0.5);

    dashboard.refresh().await.unwrap();
    assert_eq!(dashboard.progress().progress(), 0.0);

    let mut last = 0.0;
    for _ in 0..150 {
        tokio::time::sleep(Duration::from_millis(16)).await;
        let now = dashboard.progress().progress();
        assert!(now >= last, "progress went from {last} to {now}");
        last = now;
    }
    assert_eq!(last, 1.0);
}
