//! Testing utilities for the CarbonWise workspace
//!
//! Shared fixtures, record builders and fake stores.

#![allow(missing_docs)]

use async_trait::async_trait;
use cw_dashboard::{
    Dashboard, DashboardConfig, InMemoryStore, ManualFrameScheduler, OwnerId, RecordStore,
    StoreError,
};
use cw_record::{RawRecord, RawTimestamp, RecordId, StructuredTime};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_OWNER: &str = "test-owner";

pub fn owner() -> OwnerId {
    OwnerId::new(TEST_OWNER)
}

pub fn at_seconds(seconds: i64) -> RawTimestamp {
    RawTimestamp::Structured(StructuredTime {
        seconds,
        nanoseconds: 0,
    })
}

pub fn raw(id: &str, category: &str, footprint: &str, seconds: i64) -> RawRecord {
    RawRecord::new(id)
        .with_product_name(format!("Product {id}"))
        .with_functionality(category)
        .with_footprint(footprint)
        .with_date(at_seconds(seconds))
}

/// Transport 50 @100, Transport 30 @200, Food 20 @150
pub fn scenario_records() -> Vec<RawRecord> {
    vec![
        raw("t1", "Transport", "50 kg", 100),
        raw("t2", "Transport", "30 kg", 200),
        raw("f1", "Food", "20 kg", 150),
    ]
}

pub fn seeded_store(records: impl IntoIterator<Item = RawRecord>) -> InMemoryStore {
    InMemoryStore::new().with_records(&owner(), records)
}

/// Dashboard over `store` whose animation only moves when the returned
/// scheduler is advanced
pub fn manual_dashboard(store: Arc<dyn RecordStore>) -> (Arc<ManualFrameScheduler>, Dashboard) {
    let scheduler = Arc::new(ManualFrameScheduler::new());
    let dashboard = Dashboard::with_scheduler(
        owner(),
        store,
        DashboardConfig::default(),
        scheduler.clone(),
    )
    .unwrap();
    (scheduler, dashboard)
}

/// In-memory store whose operations can be made to fail on demand
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_list: AtomicBool,
    fail_delete: AtomicBool,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<RawRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("list disabled".into()));
        }
        self.inner.list(owner).await
    }

    async fn delete(&self, owner: &OwnerId, record: &RecordId) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("delete disabled".into()));
        }
        self.inner.delete(owner, record).await
    }
}
