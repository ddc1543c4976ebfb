//! Error types for the dashboard
//!
//! Provides error handling for:
//! - Record store failures (fetch and delete)
//! - Configuration problems
//! - Interaction requests that reference missing data
//!
//! Parse failures of individual records never show up here; the normalizer
//! recovers them before records reach the dashboard.

use crate::store::OwnerId;
use cw_record::RecordId;
use std::path::PathBuf;

/// Main dashboard error type
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Listing records failed; the dashboard shows no data
    #[error("failed to fetch records: {0}")]
    StoreFetch(#[source] StoreError),

    /// Deleting a record failed; nothing changed
    #[error("failed to delete record: {0}")]
    StoreDelete(#[source] StoreError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Interaction referenced a record that is not in the current snapshot
    #[error("record not found in current view: {0}")]
    UnknownRecord(RecordId),

    /// Delete requested with no record open in the detail view
    #[error("no record selected")]
    NothingSelected,
}

impl DashboardError {
    /// Check if error came from the record store
    #[inline]
    #[must_use]
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::StoreFetch(_) | Self::StoreDelete(_))
    }

    /// Check if retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreFetch(err) | Self::StoreDelete(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Record store collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Record does not exist (deletes are not idempotent)
    #[error("record {record} not found for owner {owner}")]
    NotFound {
        /// Collection owner
        owner: OwnerId,
        /// Missing record
        record: RecordId,
    },

    /// Backend temporarily unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Backing file could not be read or written
    #[error("io error on {path}: {source}")]
    Io {
        /// Backing file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Backing data is not a valid record document
    #[error("corrupt store data in {path}: {message}")]
    Corrupt {
        /// Backing file
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

impl StoreError {
    /// Create not-found error
    #[inline]
    pub fn not_found(owner: &OwnerId, record: &RecordId) -> Self {
        Self::NotFound {
            owner: owner.clone(),
            record: record.clone(),
        }
    }

    /// Create IO error for path
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if retrying may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io { .. })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Animation must take time
    #[error("animation duration must be greater than zero")]
    ZeroDuration,

    /// Scheduler must tick
    #[error("frame interval must be greater than zero")]
    ZeroFrameInterval,

    /// Radii must satisfy `0 <= inner < outer <= selected`
    #[error("invalid radii: inner {inner}, outer {outer}, selected {selected}")]
    InvalidRadii {
        /// Hole radius
        inner: f64,
        /// Slice radius
        outer: f64,
        /// Selected slice radius
        selected: f64,
    },

    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
