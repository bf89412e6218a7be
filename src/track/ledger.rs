use crate::error::TrackError;
use crate::track::record::TimeRecord;
use std::collections::BTreeMap;

/// The append-ordered sequence of time records, the system of record.
///
/// Backward same-project references are positions into the record vector,
/// maintained through a per-project index of the most recent record. The
/// index and the sequence are only ever replaced together.
#[derive(Debug, Default)]
pub struct Ledger {
    records: Vec<TimeRecord>,
    latest_by_project: BTreeMap<String, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, wiring its backward reference to the most recent
    /// earlier record of the same project. End markers neither carry nor
    /// become the target of such a reference.
    pub fn append(&mut self, mut record: TimeRecord) {
        record.previous = if record.is_end_marker() {
            None
        } else {
            self.latest_by_project.get(&record.project).copied()
        };
        let pos = self.records.len();
        let project = record.project.clone();
        self.records.push(record);
        if !project.is_empty() {
            self.latest_by_project.insert(project, pos);
        }
    }

    /// Drops the most recently appended record, rolling the per-project index
    /// back to the removed record's backward reference.
    pub fn remove_last(&mut self) -> Result<TimeRecord, TrackError> {
        let record = self.records.pop().ok_or(TrackError::EmptyLedger)?;
        if !record.is_end_marker()
            && self.latest_by_project.get(&record.project) == Some(&self.records.len())
        {
            match record.previous {
                Some(pos) => {
                    self.latest_by_project.insert(record.project.clone(), pos);
                }
                None => {
                    self.latest_by_project.remove(&record.project);
                }
            }
        }
        Ok(record)
    }

    /// Full rebuild: sequence and index are swapped in together, so no
    /// partial state is observable. Incoming backward references are ignored
    /// and re-derived from the append order.
    pub fn replace_all(&mut self, records: Vec<TimeRecord>) {
        let mut fresh = Ledger::default();
        for record in records {
            fresh.append(record);
        }
        *self = fresh;
    }

    pub fn records(&self) -> &[TimeRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [TimeRecord] {
        &mut self.records
    }

    pub fn last(&self) -> Option<&TimeRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest_for(&self, project: &str) -> Option<usize> {
        self.latest_by_project.get(project).copied()
    }

    pub fn project_names(&self) -> Vec<String> {
        self.latest_by_project.keys().cloned().collect()
    }
}
