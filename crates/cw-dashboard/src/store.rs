//! Record store contract and the two local implementations
//!
//! The dashboard only needs two operations from persistence: list an owner's
//! records and delete one by id. Anything that can do both plugs in.

use crate::error::StoreError;
use async_trait::async_trait;
use cw_record::{RawRecord, RecordId};
use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use ulid::Ulid;

/// Owner of a record collection
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl OwnerId {
    /// Create owner id
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Persistence collaborator
///
/// `list` returns records in store order; callers must not rely on it.
/// `delete` of a missing id fails with [`StoreError::NotFound`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records belonging to `owner`
    async fn list(&self, owner: &OwnerId) -> Result<Vec<RawRecord>, StoreError>;

    /// Remove one record
    async fn delete(&self, owner: &OwnerId, record: &RecordId) -> Result<(), StoreError>;
}

/// Concurrent in-memory store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: DashMap<OwnerId, Vec<RawRecord>>,
}

impl InMemoryStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an owner's collection
    #[must_use]
    pub fn with_records(self, owner: &OwnerId, records: impl IntoIterator<Item = RawRecord>) -> Self {
        for record in records {
            self.insert(owner, record);
        }
        self
    }

    /// Add a record, assigning a fresh id when it has none
    pub fn insert(&self, owner: &OwnerId, mut record: RawRecord) -> RecordId {
        if record.id.is_empty() {
            record.id = RecordId::new(Ulid::new().to_string());
        }
        let id = record.id.clone();
        self.collections.entry(owner.clone()).or_default().push(record);
        id
    }

    /// Number of records held for `owner`
    #[must_use]
    pub fn len(&self, owner: &OwnerId) -> usize {
        self.collections.get(owner).map_or(0, |records| records.len())
    }

    /// Whether `owner` has no records
    #[must_use]
    pub fn is_empty(&self, owner: &OwnerId) -> bool {
        self.len(owner) == 0
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<RawRecord>, StoreError> {
        Ok(self
            .collections
            .get(owner)
            .map(|records| records.value().clone())
            .unwrap_or_default())
    }

    async fn delete(&self, owner: &OwnerId, record: &RecordId) -> Result<(), StoreError> {
        let mut records = self
            .collections
            .get_mut(owner)
            .ok_or_else(|| StoreError::not_found(owner, record))?;
        let position = records
            .iter()
            .position(|r| &r.id == record)
            .ok_or_else(|| StoreError::not_found(owner, record))?;
        records.remove(position);
        debug!(%owner, %record, "deleted record from memory store");
        Ok(())
    }
}

type Collections = IndexMap<OwnerId, Vec<Value>>;

/// JSON document store: `{ "<owner>": [ { ...record... } ] }`
///
/// Documents stay raw JSON on disk and are typed only when listed, so a
/// delete removes one document and writes every other one back unchanged.
/// Deletes rewrite the whole file through a temporary sibling and a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store backed by `path`; the file is read lazily
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_collections(&self) -> Result<Collections, StoreError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))?;
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    async fn write_collections(&self, collections: &Collections) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(collections).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, text)
            .await
            .map_err(|e| StoreError::io_error(&staging, e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))
    }
}

fn document_id(document: &Value) -> Option<RecordId> {
    document.get("id").and_then(RecordId::from_json)
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<RawRecord>, StoreError> {
        let mut collections = self.read_collections().await?;
        let documents = collections.swap_remove(owner).unwrap_or_default();
        let total = documents.len();
        let records: Vec<RawRecord> = documents
            .into_iter()
            .filter_map(RawRecord::from_document)
            .collect();
        if records.len() < total {
            warn!(
                %owner,
                skipped = total - records.len(),
                path = %self.path.display(),
                "skipped documents that are not JSON objects"
            );
        }
        debug!(%owner, count = records.len(), path = %self.path.display(), "listed records");
        Ok(records)
    }

    async fn delete(&self, owner: &OwnerId, record: &RecordId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut collections = self.read_collections().await?;

        let documents = collections
            .get_mut(owner)
            .ok_or_else(|| StoreError::not_found(owner, record))?;
        let position = documents
            .iter()
            .position(|document| document_id(document).as_ref() == Some(record))
            .ok_or_else(|| StoreError::not_found(owner, record))?;
        documents.remove(position);

        self.write_collections(&collections).await?;
        info!(%owner, %record, path = %self.path.display(), "deleted record from file store");
        Ok(())
    }
}
