//! CarbonWise Dashboard
//!
//! The interactive side of the footprint chart:
//! - Record store contract with in-memory and JSON file implementations
//! - Reveal animation driven by a pluggable frame scheduler
//! - Per-category expand/collapse and segment/record selection
//! - Delete-then-recompute orchestration
//! - A render-ready view model
//!
//! # Example
//!
//! ```rust,ignore
//! use cw_dashboard::{Dashboard, DashboardConfig, JsonFileStore, OwnerId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(JsonFileStore::new("records.json"));
//! let mut dashboard = Dashboard::new(OwnerId::new("user-1"), store, DashboardConfig::default())?;
//!
//! dashboard.load().await?;
//! dashboard.select_segment(0);
//! println!("{}", dashboard.view().to_text());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod progress;
pub mod scheduler;
pub mod state_machine;
pub mod store;
pub mod view_model;
pub mod view_state;

pub use config::{AnimationConfig, ChartConfig, DashboardConfig, Easing};
pub use dashboard::{Dashboard, LoadState};
pub use error::{ConfigError, DashboardError, StoreError};
pub use progress::ProgressController;
pub use scheduler::{FrameScheduler, ManualFrameScheduler, RunHandle, TickFn, TokioFrameScheduler};
pub use state_machine::{allowed_transitions, next_state, CategoryEvent, CategoryState};
pub use store::{InMemoryStore, JsonFileStore, OwnerId, RecordStore};
pub use view_model::{ArcView, DashboardView, RecordRow, SectionView};
pub use view_state::ViewState;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a dashboard
    pub use crate::{
        Dashboard, DashboardConfig, DashboardError, DashboardView, InMemoryStore, JsonFileStore,
        LoadState, OwnerId, RecordStore, StoreError, ViewState,
    };
    pub use cw_chart::ChartSnapshot;
    pub use cw_record::{RawRecord, Record, RecordId};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
