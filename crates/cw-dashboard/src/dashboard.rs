//! Dashboard session: the interaction state manager
//!
//! Sequences store requests, recomputes and state transitions so that a
//! deletion always completes before the recompute it triggers, and every
//! recompute restarts the reveal animation.

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::progress::ProgressController;
use crate::scheduler::{FrameScheduler, TokioFrameScheduler};
use crate::store::{OwnerId, RecordStore};
use crate::view_model::DashboardView;
use crate::view_state::ViewState;
use cw_chart::{recompute_raw, ChartSnapshot};
use cw_record::{RecordDetail, RecordId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fetch status of the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// Fetch in flight
    Loading,
    /// Snapshot reflects the store
    Ready,
    /// Last fetch failed; snapshot is empty
    Failed(String),
}

impl LoadState {
    /// Whether a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// One user's dashboard session
pub struct Dashboard {
    owner: OwnerId,
    store: Arc<dyn RecordStore>,
    config: DashboardConfig,
    snapshot: ChartSnapshot,
    state: ViewState,
    load_state: LoadState,
    progress: ProgressController,
}

impl Dashboard {
    /// Create a session driven by wall-clock animation frames
    ///
    /// # Errors
    /// Returns `DashboardError::Config` when `config` fails validation.
    pub fn new(
        owner: OwnerId,
        store: Arc<dyn RecordStore>,
        config: DashboardConfig,
    ) -> Result<Self, DashboardError> {
        let scheduler = Arc::new(TokioFrameScheduler::new(config.animation.frame_interval()));
        Self::with_scheduler(owner, store, config, scheduler)
    }

    /// Create a session with a custom frame scheduler
    ///
    /// # Errors
    /// Returns `DashboardError::Config` when `config` fails validation.
    pub fn with_scheduler(
        owner: OwnerId,
        store: Arc<dyn RecordStore>,
        config: DashboardConfig,
        scheduler: Arc<dyn FrameScheduler>,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        let progress = ProgressController::new(scheduler, &config.animation);
        Ok(Self {
            owner,
            store,
            config,
            snapshot: ChartSnapshot::empty(),
            state: ViewState::new(),
            load_state: LoadState::Idle,
            progress,
        })
    }

    /// Fetch the owner's records and recompute the chart
    ///
    /// Used for the initial load and for explicit refreshes. On failure the
    /// snapshot is emptied; no partial data is kept.
    ///
    /// # Errors
    /// Returns `DashboardError::StoreFetch` when the store cannot list records.
    pub async fn load(&mut self) -> Result<(), DashboardError> {
        self.load_state = LoadState::Loading;
        info!(owner = %self.owner, "loading footprint records");

        match self.store.list(&self.owner).await {
            Ok(raw) => {
                let next = recompute_raw(raw, &self.config.chart.palette);
                info!(
                    owner = %self.owner,
                    records = next.record_count(),
                    categories = next.groups.len(),
                    total = next.total,
                    "footprint records loaded"
                );
                self.apply_snapshot(next);
                self.load_state = LoadState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(owner = %self.owner, error = %err, "failed to load footprint records");
                self.apply_snapshot(ChartSnapshot::empty());
                self.load_state = LoadState::Failed(err.to_string());
                Err(DashboardError::StoreFetch(err))
            }
        }
    }

    /// Alias of [`Dashboard::load`] for explicit user refreshes
    ///
    /// # Errors
    /// See [`Dashboard::load`].
    pub async fn refresh(&mut self) -> Result<(), DashboardError> {
        self.load().await
    }

    fn apply_snapshot(&mut self, next: ChartSnapshot) {
        let previous = std::mem::replace(&mut self.snapshot, next);
        self.state = std::mem::take(&mut self.state).reconcile(&previous, &self.snapshot);
        self.progress.restart();
    }

    /// Delete a record, then recompute from a fresh fetch
    ///
    /// A failed delete leaves every piece of state untouched so the caller can
    /// retry.
    ///
    /// # Errors
    /// Returns `DashboardError::StoreDelete` when the store rejects the delete,
    /// or `DashboardError::StoreFetch` when the follow-up fetch fails.
    pub async fn delete_record(&mut self, id: &RecordId) -> Result<(), DashboardError> {
        info!(owner = %self.owner, record = %id, "deleting footprint record");
        if let Err(err) = self.store.delete(&self.owner, id).await {
            warn!(owner = %self.owner, record = %id, error = %err, "delete failed");
            return Err(DashboardError::StoreDelete(err));
        }
        self.state = std::mem::take(&mut self.state).forget_record(id);
        self.load().await
    }

    /// Delete the record open in the detail view
    ///
    /// # Errors
    /// Returns `DashboardError::NothingSelected` when the detail view is
    /// closed, otherwise the errors of [`Dashboard::delete_record`].
    pub async fn delete_selected(&mut self) -> Result<(), DashboardError> {
        let id = self
            .state
            .selected_record()
            .map(|record| record.id.clone())
            .ok_or(DashboardError::NothingSelected)?;
        self.delete_record(&id).await
    }

    /// Flip a category section
    pub fn toggle_category(&mut self, key: &str) {
        self.state = std::mem::take(&mut self.state).toggle_category(key);
    }

    /// Select a chart segment; out-of-range indices clear the selection
    pub fn select_segment(&mut self, index: usize) {
        self.state = std::mem::take(&mut self.state).select_segment(index, &self.snapshot);
    }

    /// Open a record of the current snapshot in the detail view
    ///
    /// # Errors
    /// Returns `DashboardError::UnknownRecord` when the id is not charted.
    pub fn select_record(&mut self, id: &RecordId) -> Result<(), DashboardError> {
        let record = self
            .snapshot
            .record(id)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownRecord(id.clone()))?;
        debug!(record = %id, "opening record detail");
        self.state = std::mem::take(&mut self.state).select_record(record);
        Ok(())
    }

    /// Close the detail view
    pub fn close_detail(&mut self) {
        self.state = std::mem::take(&mut self.state).close_detail();
    }

    /// Owner of this session
    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Current chart data
    #[must_use]
    pub fn snapshot(&self) -> &ChartSnapshot {
        &self.snapshot
    }

    /// Fetch status
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Reveal animation driver
    #[must_use]
    pub fn progress(&self) -> &ProgressController {
        &self.progress
    }

    /// Interaction state with the live reveal progress
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.state.clone().with_progress(self.progress.progress())
    }

    /// Detail view of the selected record
    #[must_use]
    pub fn detail(&self) -> Option<RecordDetail> {
        self.state.selected_record().map(RecordDetail::from_record)
    }

    /// Render-ready frame
    #[must_use]
    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.snapshot, &self.view_state(), &self.config, &self.load_state)
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("owner", &self.owner)
            .field("load_state", &self.load_state)
            .field("records", &self.snapshot.record_count())
            .field("state", &self.state)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}
