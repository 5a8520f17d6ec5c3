//! Record-store contract for review requests
//!
//! The engine treats persistence as a collaborator: `load` returns the
//! authoritative record, `save` either returns the authoritative post-save
//! record or a distinguishable error. Saves carry an optimistic-concurrency
//! check — the caller's revision must match the stored revision, otherwise
//! the save fails with a conflict instead of silently overwriting a
//! concurrent writer.

#![deny(unsafe_code)]

use review_types::{RequestId, ReviewRequest};
use std::collections::HashMap;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures a record store can report
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("request '{0}' not found")]
    NotFound(RequestId),

    #[error("stale record: save expected revision {expected}, store holds {actual}")]
    Conflict { expected: u64, actual: u64 },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The persistence contract consumed by the transition engine
pub trait RecordStore {
    /// Load the authoritative record
    fn load(&self, id: &RequestId) -> StoreResult<ReviewRequest>;

    /// Persist a record. The caller's `revision` must match the stored
    /// revision (or the record must be new at revision 0). On success the
    /// returned record carries the bumped revision and is authoritative.
    fn save(&mut self, request: &ReviewRequest) -> StoreResult<ReviewRequest>;
}

/// In-memory store used in tests and single-process deployments
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<RequestId, ReviewRequest>,
    fail_next_save: Option<StoreError>,
    save_count: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next save fail with `err`; used to exercise the engine's
    /// persistence-failure path
    pub fn fail_next_save(&mut self, err: StoreError) {
        self.fail_next_save = Some(err);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful saves, used by tests to assert a denied
    /// transition never reached the store
    pub fn save_count(&self) -> u64 {
        self.save_count
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, id: &RequestId) -> StoreResult<ReviewRequest> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&mut self, request: &ReviewRequest) -> StoreResult<ReviewRequest> {
        if let Some(err) = self.fail_next_save.take() {
            return Err(err);
        }

        if let Some(existing) = self.records.get(&request.id) {
            if existing.revision != request.revision {
                return Err(StoreError::Conflict {
                    expected: request.revision,
                    actual: existing.revision,
                });
            }
        } else if request.revision != 0 {
            return Err(StoreError::NotFound(request.id.clone()));
        }

        let mut stored = request.clone();
        stored.revision += 1;
        self.records.insert(stored.id.clone(), stored.clone());
        self.save_count += 1;
        Ok(stored)
    }
}
