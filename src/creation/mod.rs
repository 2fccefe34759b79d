use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::patient::{BirthDate, StatusTag};
use crate::render::calculate_age;

/// Raw values typed into the creation form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub gender: String,
    /// `DD/MM/YYYY`
    pub date_of_birth: String,
    pub cpf: String,
    pub card_number: String,
}

impl PatientForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Body of `POST /user`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    pub gender: String,
    pub cpf: String,
    pub card_number: String,
    pub age: String,
    pub status: StatusTag,
    pub date_of_birth: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("date of birth '{value}' is not in DD/MM/YYYY form")]
    InvalidDateFormat { value: String },
}

/// Picks the status of a new patient. The form has no status field.
pub trait StatusAssigner {
    fn assign(&mut self) -> StatusTag;
}

impl<T: StatusAssigner + ?Sized> StatusAssigner for Box<T> {
    fn assign(&mut self) -> StatusTag {
        (**self).assign()
    }
}

/// Uniform choice among the three tags.
#[derive(Clone, Debug, Default)]
pub struct RandomStatus;

impl StatusAssigner for RandomStatus {
    fn assign(&mut self) -> StatusTag {
        let index = rand::thread_rng().gen_range(0..StatusTag::ALL.len());
        StatusTag::ALL[index]
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedStatus(pub StatusTag);

impl StatusAssigner for FixedStatus {
    fn assign(&mut self) -> StatusTag {
        self.0
    }
}

/// `DD/MM/YYYY` to `YYYY-MM-DD` by swapping the slash-separated tokens.
///
/// Tokens are not checked against the calendar: `31/02/2024` becomes `2024-02-31`.
pub fn format_date(value: &str) -> Result<String, FormError> {
    let parts: Vec<&str> = value.trim().split('/').collect();
    match parts.as_slice() {
        [day, month, year] if !day.is_empty() && !month.is_empty() && !year.is_empty() => {
            Ok(format!("{year}-{month}-{day}"))
        }
        _ => Err(FormError::InvalidDateFormat {
            value: value.to_string(),
        }),
    }
}

/// Builds the creation payload. Age is derived from the normalized date and
/// sent as text; status comes from `assigner`.
pub fn build_new_patient<A: StatusAssigner + ?Sized>(
    form: &PatientForm,
    today: NaiveDate,
    assigner: &mut A,
) -> Result<NewPatient, FormError> {
    let date_of_birth = format_date(&form.date_of_birth)?;
    let birth = BirthDate::parse(&date_of_birth).ok_or_else(|| FormError::InvalidDateFormat {
        value: form.date_of_birth.clone(),
    })?;
    let age = calculate_age(birth, today);

    Ok(NewPatient {
        name: form.name.clone(),
        gender: form.gender.clone(),
        cpf: form.cpf.clone(),
        card_number: form.card_number.clone(),
        age: age.to_string(),
        status: assigner.assign(),
        date_of_birth,
    })
}
