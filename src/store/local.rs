//! Snapshot-file store.
//!
//! The whole record array lives in one JSON file: read once at `open`,
//! held in memory, and rewritten in full after every successful mutation.
//! There are no partial writes, no versioning, and no migration of older
//! snapshot shapes. `reload`/`flush` expose the persistence points
//! explicitly for embedders that manage the file themselves.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use chrono::Utc;

use crate::models::{AppointmentFilter, AppointmentStatus, RawRecord, RecordFields};

use super::{RecordId, Store, StoreError};

pub struct LocalStore {
    path: PathBuf,
    records: Mutex<Vec<RawRecord>>,
}

impl LocalStore {
    /// Opens the snapshot at `path`. A missing file is an empty store;
    /// the file is not created until the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = read_snapshot(&path)?;
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the snapshot file, discarding in-memory state.
    pub fn reload(&self) -> Result<(), StoreError> {
        let records = read_snapshot(&self.path)?;
        *self.lock() = records;
        Ok(())
    }

    /// Rewrites the snapshot from in-memory state.
    pub fn flush(&self) -> Result<(), StoreError> {
        write_snapshot(&self.path, &self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RawRecord>> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Client-generated id: current time in milliseconds, bumped past any
    /// collision so the unique-id invariant holds even for back-to-back
    /// creates within one millisecond.
    fn next_id(records: &[RawRecord]) -> RecordId {
        let mut candidate = Utc::now().timestamp_millis();
        loop {
            let id = RecordId::from(candidate.to_string());
            if !records.iter().any(|r| r.id == id) {
                return id;
            }
            candidate += 1;
        }
    }
}

impl Store for LocalStore {
    async fn list(&self, filter: &AppointmentFilter) -> Result<Vec<RawRecord>, StoreError> {
        let records = self.lock();
        let mut matched: Vec<RawRecord> = records
            .iter()
            .filter(|r| status_matches(filter, &r.status))
            .cloned()
            .collect();
        // Same order the record service returns: ascending by date, then
        // time. ISO strings compare correctly as text.
        matched.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));

        let offset = filter.offset.unwrap_or(0) as usize;
        let matched: Vec<RawRecord> = match filter.limit {
            Some(limit) => matched.into_iter().skip(offset).take(limit as usize).collect(),
            None if offset > 0 => matched.into_iter().skip(offset).collect(),
            None => matched,
        };
        Ok(matched)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<RawRecord>, StoreError> {
        Ok(self.lock().iter().find(|r| &r.id == id).cloned())
    }

    async fn create(&self, fields: RecordFields) -> Result<RawRecord, StoreError> {
        let mut records = self.lock();
        let id = Self::next_id(&records);
        let record = RawRecord::from_fields(id, fields);
        records.push(record.clone());
        write_snapshot(&self.path, &records)?;
        Ok(record)
    }

    async fn update(&self, id: &RecordId, fields: RecordFields) -> Result<RawRecord, StoreError> {
        let mut records = self.lock();
        let slot = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        *slot = RawRecord::from_fields(id.clone(), fields);
        let updated = slot.clone();
        write_snapshot(&self.path, &records)?;
        Ok(updated)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, StoreError> {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        write_snapshot(&self.path, &records)?;
        Ok(true)
    }

    async fn count(&self, filter: &AppointmentFilter) -> Result<u64, StoreError> {
        let records = self.lock();
        Ok(records
            .iter()
            .filter(|r| status_matches(filter, &r.status))
            .count() as u64)
    }
}

fn status_matches(filter: &AppointmentFilter, status: &str) -> bool {
    match AppointmentStatus::from_str(status) {
        Ok(parsed) => filter.matches(parsed),
        // Unknown statuses only survive an unfiltered listing; the
        // controller's mapping decides what to do with them.
        Err(_) => filter.status.is_empty(),
    }
}

fn read_snapshot(path: &Path) -> Result<Vec<RawRecord>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&contents)?)
}

fn write_snapshot(path: &Path, records: &[RawRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(records)?)?;
    Ok(())
}
