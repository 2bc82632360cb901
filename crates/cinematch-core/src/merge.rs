//! Incremental dataset maintenance.
//!
//! The input list is authoritative: prior records whose key is no longer in
//! the input are dropped, prior records still in the input survive verbatim,
//! and only keys missing from the prior dataset are resolved again.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::error::{CinematchError, Result};
use crate::models::{EnrichedRecord, RecordKey};

/// Ordered collection of output records with unique keys.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<EnrichedRecord>,
    index: HashMap<RecordKey, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. A second record with the same key is a merge defect.
    pub fn insert(&mut self, record: EnrichedRecord) -> Result<()> {
        let key = record.key();
        if self.index.contains_key(&key) {
            return Err(CinematchError::MergeCollision(key));
        }
        self.index.insert(key, self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn contains_key(&self, key: &RecordKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &RecordKey) -> Option<&EnrichedRecord> {
        self.index.get(key).map(|&idx| &self.records[idx])
    }

    pub fn get_mut(&mut self, key: &RecordKey) -> Option<&mut EnrichedRecord> {
        self.index.get(key).map(|&idx| &mut self.records[idx])
    }

    pub fn keys(&self) -> impl Iterator<Item = RecordKey> + '_ {
        self.records.iter().map(EnrichedRecord::key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EnrichedRecord> {
        self.records
    }

    /// Reorder into output order (see [`output_order`]).
    pub fn sort_for_output(&mut self) {
        self.records.sort_by(output_order);
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.key(), idx))
            .collect();
    }
}

/// Split of an incremental run into work to do and records to keep.
#[derive(Debug, Clone, Default)]
pub struct Diff {
    pub keys_to_resolve: HashSet<RecordKey>,
    pub survivors: Dataset,
}

/// Compare the new input keys against a prior dataset.
pub fn diff(input_keys: &HashSet<RecordKey>, prior_output: Vec<EnrichedRecord>) -> Diff {
    let mut prior_keys = HashSet::with_capacity(prior_output.len());
    let mut survivors = Dataset::new();

    for record in prior_output {
        let key = record.key();
        if !prior_keys.insert(key.clone()) {
            warn!("Prior dataset lists {key} more than once, keeping the last entry");
            if let Some(slot) = survivors.get_mut(&key) {
                *slot = record;
            }
            continue;
        }
        if input_keys.contains(&key) {
            // First sighting of this key, so the insert cannot collide.
            survivors.insert(record).ok();
        }
    }

    let keys_to_resolve = input_keys.difference(&prior_keys).cloned().collect();
    Diff {
        keys_to_resolve,
        survivors,
    }
}

/// Combine newly resolved records with survivors. The two sides are disjoint
/// by construction; any shared key aborts the merge.
pub fn merge(resolved: Dataset, survivors: Dataset) -> Result<Dataset> {
    let mut merged = resolved;
    for record in survivors.into_records() {
        merged.insert(record)?;
    }
    Ok(merged)
}

/// Descending by `(year, masterpiece, my_best, award count, director)`.
pub fn output_order(a: &EnrichedRecord, b: &EnrichedRecord) -> Ordering {
    let key = |r: &EnrichedRecord| {
        (
            r.year,
            r.masterpiece,
            r.my_best,
            r.awards.len(),
            r.director.clone(),
        )
    };
    key(b).cmp(&key(a))
}
