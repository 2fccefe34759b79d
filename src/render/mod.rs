use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::patient::{BirthDate, PatientRecord, StatusTag};

/// Visual category of a status tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Delivered,
    Pending,
    Return,
    Default,
}

impl StatusClass {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Pending => "pending",
            Self::Return => "return",
            Self::Default => "default",
        }
    }
}

/// Maps a stored status to its visual category. Unknown values fall back to
/// [`StatusClass::Default`].
pub fn status_class(status: &str) -> StatusClass {
    match StatusTag::from_label(status) {
        Some(StatusTag::Low) => StatusClass::Delivered,
        Some(StatusTag::Medium) => StatusClass::Pending,
        Some(StatusTag::High) => StatusClass::Return,
        None => StatusClass::Default,
    }
}

/// Whole years between `birth` and `today`, minus one when this year's
/// birthday has not happened yet.
pub fn calculate_age(birth: BirthDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year;
    if today.month() < birth.month || (today.month() == birth.month && today.day() < birth.day) {
        age -= 1;
    }
    age
}

/// One table row, ready to paint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub name: String,
    pub age: Option<i32>,
    pub gender: String,
    pub status: String,
    pub status_class: StatusClass,
}

impl DisplayRow {
    pub fn from_record(record: &PatientRecord, today: NaiveDate) -> Self {
        let age = record
            .date_of_birth
            .as_deref()
            .and_then(BirthDate::parse)
            .map(|birth| calculate_age(birth, today));
        Self {
            name: record.name.clone(),
            age,
            gender: record.gender.clone(),
            status: record.status.clone(),
            status_class: status_class(&record.status),
        }
    }

    pub fn age_text(&self) -> String {
        self.age.map(|a| a.to_string()).unwrap_or_default()
    }
}

pub fn compute_rows(records: &[PatientRecord], today: NaiveDate) -> Vec<DisplayRow> {
    records
        .iter()
        .map(|r| DisplayRow::from_record(r, today))
        .collect()
}

/// Where rows get painted: a terminal table, an HTML table body, a buffer.
pub trait DisplaySurface {
    fn clear(&mut self);
    fn append_row(&mut self, row: &DisplayRow);
}

/// Replaces everything on `surface` with one row per record, in input order.
pub fn render<S: DisplaySurface + ?Sized>(
    records: &[PatientRecord],
    today: NaiveDate,
    surface: &mut S,
) {
    surface.clear();
    for row in compute_rows(records, today) {
        surface.append_row(&row);
    }
}
