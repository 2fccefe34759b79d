use crate::filter::PatientQuery;
use crate::patient::{PatientRecord, StatusTag};

/// The in-memory patient list for the current session.
///
/// Replaced wholesale on every successful fetch, never edited in place.
#[derive(Clone, Debug, Default)]
pub struct PatientStore {
    records: Vec<PatientRecord>,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }

    pub fn replace(&mut self, records: Vec<PatientRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, query: &PatientQuery) -> Vec<PatientRecord> {
        query.apply(&self.records)
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_records(&self.records)
    }
}

/// Per-status counts shown on the dashboard cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub total: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl StatusSummary {
    pub fn from_records(records: &[PatientRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for r in records {
            match StatusTag::from_label(&r.status) {
                Some(StatusTag::Low) => summary.low += 1,
                Some(StatusTag::Medium) => summary.medium += 1,
                Some(StatusTag::High) => summary.high += 1,
                None => {}
            }
        }
        summary
    }

    pub fn count(&self, tag: StatusTag) -> usize {
        match tag {
            StatusTag::Low => self.low,
            StatusTag::Medium => self.medium,
            StatusTag::High => self.high,
        }
    }
}
