use crate::patient::PatientRecord;

/// Normalized search criteria: lowercase free text plus an optional exact status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientQuery {
    text: String,
    status: Option<String>,
}

impl PatientQuery {
    pub fn new(text: &str, status: Option<&str>) -> Self {
        Self {
            text: text.to_lowercase(),
            status: status.map(str::to_string),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Name, age text or gender contains the query (any of them), and the
    /// status, when set, is equal to the record's status.
    pub fn matches(&self, record: &PatientRecord) -> bool {
        let name_match = record.name.to_lowercase().contains(&self.text);
        let age_match = record
            .age
            .as_deref()
            .is_some_and(|age| age.contains(&self.text));
        let gender_match = record.gender.to_lowercase().contains(&self.text);
        let status_match = match self.status.as_deref() {
            Some(status) => record.status == status,
            None => true,
        };

        (name_match || age_match || gender_match) && status_match
    }

    pub fn apply(&self, records: &[PatientRecord]) -> Vec<PatientRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

/// Stable filter over `records`; input order is preserved.
pub fn filter_patients(
    records: &[PatientRecord],
    query: &str,
    status: Option<&str>,
) -> Vec<PatientRecord> {
    PatientQuery::new(query, status).apply(records)
}
