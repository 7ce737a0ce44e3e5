//! Persistence capability for appointment records.
//!
//! The controller talks to a `Store` and nothing else; whether records
//! live in the local snapshot file or behind the hosted record service is
//! decided at construction time (`AnyStore`). `MockStore` is the
//! scriptable double used by controller tests.

pub mod local;
pub mod mock;
pub mod remote;

pub use local::LocalStore;
pub use mock::MockStore;
pub use remote::RemoteStore;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AppointmentFilter, RawRecord, RecordFields};

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Cannot reach record service at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Record service error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Operation rejected by record service: {0}")]
    Rejected(String),

    #[error("Record not found: {id}")]
    NotFound { id: String },

    #[error("Malformed record {id}: {reason}")]
    Malformed { id: String, reason: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

// ─── Record ids ───────────────────────────────────────────────────────────────

/// Opaque record identifier. The local backend derives these from a
/// timestamp at creation; the remote service assigns its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ─── Capability trait ─────────────────────────────────────────────────────────

/// Asynchronous CRUD over appointment records.
///
/// Implementations are interchangeable; callers must not depend on which
/// backend they hold. Every failure surfaces as a `StoreError`; there is
/// no retry layer here.
#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync {
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<RawRecord>, StoreError>;

    async fn get(&self, id: &RecordId) -> Result<Option<RawRecord>, StoreError>;

    async fn create(&self, fields: RecordFields) -> Result<RawRecord, StoreError>;

    async fn update(&self, id: &RecordId, fields: RecordFields) -> Result<RawRecord, StoreError>;

    /// Returns whether a record was actually removed.
    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError>;

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, StoreError>;
}

impl<T: Store> Store for Arc<T> {
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<RawRecord>, StoreError> {
        (**self).list(filter).await
    }

    async fn get(&self, id: &RecordId) -> Result<Option<RawRecord>, StoreError> {
        (**self).get(id).await
    }

    async fn create(&self, fields: RecordFields) -> Result<RawRecord, StoreError> {
        (**self).create(fields).await
    }

    async fn update(&self, id: &RecordId, fields: RecordFields) -> Result<RawRecord, StoreError> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, StoreError> {
        (**self).count(filter).await
    }
}

// ─── Runtime backend selection ────────────────────────────────────────────────

/// Store chosen from configuration at startup. Delegates everything.
pub enum AnyStore {
    Local(LocalStore),
    Remote(RemoteStore),
}

impl Store for AnyStore {
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<RawRecord>, StoreError> {
        match self {
            Self::Local(store) => store.list(filter).await,
            Self::Remote(store) => store.list(filter).await,
        }
    }

    async fn get(&self, id: &RecordId) -> Result<Option<RawRecord>, StoreError> {
        match self {
            Self::Local(store) => store.get(id).await,
            Self::Remote(store) => store.get(id).await,
        }
    }

    async fn create(&self, fields: RecordFields) -> Result<RawRecord, StoreError> {
        match self {
            Self::Local(store) => store.create(fields).await,
            Self::Remote(store) => store.create(fields).await,
        }
    }

    async fn update(&self, id: &RecordId, fields: RecordFields) -> Result<RawRecord, StoreError> {
        match self {
            Self::Local(store) => store.update(id, fields).await,
            Self::Remote(store) => store.update(id, fields).await,
        }
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
        match self {
            Self::Local(store) => store.delete(id).await,
            Self::Remote(store) => store.delete(id).await,
        }
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, StoreError> {
        match self {
            Self::Local(store) => store.count(filter).await,
            Self::Remote(store) => store.count(filter).await,
        }
    }
}
