//! History ring — bounded, most-recent-first log of projection records.

use std::collections::VecDeque;

use crate::error::{PersonaError, Result};
use crate::projection::ProjectionRecord;

#[derive(Debug, Clone)]
pub struct HistoryRing {
    records: VecDeque<ProjectionRecord>,
    capacity: usize,
}

/// Upper bound on up-front allocation; larger rings grow on demand.
const PREALLOCATE_MAX: usize = 64;

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(PREALLOCATE_MAX)),
            capacity,
        }
    }

    /// Prepend; the oldest record falls off once over capacity.
    pub fn push(&mut self, record: ProjectionRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Record at `index`, where 0 is the most recent.
    pub fn get(&self, index: usize) -> Result<&ProjectionRecord> {
        self.records.get(index).ok_or(PersonaError::OutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectionRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<ProjectionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
