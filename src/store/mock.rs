//! Scriptable in-memory store for tests.
//!
//! Seed it with records, inject per-operation failures, count calls, and
//! optionally park one operation on an async gate to hold a request
//! in flight while the test observes intermediate state.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::models::{AppointmentFilter, AppointmentStatus, RawRecord, RecordFields};

use super::{RecordId, Store, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StoreOp {
    List,
    Get,
    Create,
    Update,
    Delete,
    Count,
}

pub struct MockStore {
    records: Mutex<Vec<RawRecord>>,
    next_id: AtomicI64,
    failing: Mutex<BTreeSet<StoreOp>>,
    gate: Mutex<Option<(StoreOp, Arc<Notify>)>>,
    calls: Mutex<BTreeMap<StoreOp, usize>>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::default(),
            next_id: AtomicI64::new(1),
            failing: Mutex::default(),
            gate: Mutex::default(),
            calls: Mutex::default(),
        }
    }

    pub fn seeded(records: Vec<RawRecord>) -> Self {
        let store = Self::new();
        *store.records.lock().unwrap() = records;
        store
    }

    /// Makes every subsequent call to `op` fail until cleared.
    pub fn fail_on(&self, op: StoreOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Parks the next calls to `op` until the returned handle is notified.
    /// `Notify` stores a permit, so notifying before the call arrives is
    /// safe.
    pub fn gate_on(&self, op: StoreOp) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some((op, notify.clone()));
        notify
    }

    /// How many times `op` was invoked (gated and failing calls included).
    pub fn calls(&self, op: StoreOp) -> usize {
        self.calls.lock().unwrap().get(&op).copied().unwrap_or(0)
    }

    pub fn records(&self) -> Vec<RawRecord> {
        self.records.lock().unwrap().clone()
    }

    async fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;

        let gate = self.gate.lock().unwrap().clone();
        if let Some((gated_op, notify)) = gate {
            if gated_op == op {
                notify.notified().await;
            }
        }

        if self.failing.lock().unwrap().contains(&op) {
            return Err(StoreError::Api {
                status: 500,
                body: "injected failure".into(),
            });
        }
        Ok(())
    }

    fn matches(filter: &AppointmentFilter, status: &str) -> bool {
        status
            .parse::<AppointmentStatus>()
            .map(|s| filter.matches(s))
            .unwrap_or(filter.status.is_empty())
    }
}

impl Store for MockStore {
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<RawRecord>, StoreError> {
        self.enter(StoreOp::List).await?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| Self::matches(filter, &r.status))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<RawRecord>, StoreError> {
        self.enter(StoreOp::Get).await?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.id == id)
            .cloned())
    }

    async fn create(&self, fields: RecordFields) -> Result<RawRecord, StoreError> {
        self.enter(StoreOp::Create).await?;
        let id = RecordId::from(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        let record = RawRecord::from_fields(id, fields);
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, fields: RecordFields) -> Result<RawRecord, StoreError> {
        self.enter(StoreOp::Update).await?;
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        *slot = RawRecord::from_fields(id.clone(), fields);
        Ok(slot.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
        self.enter(StoreOp::Delete).await?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| &r.id != id);
        Ok(records.len() < before)
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, StoreError> {
        self.enter(StoreOp::Count).await?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| Self::matches(filter, &r.status))
            .count() as u64)
    }
}
